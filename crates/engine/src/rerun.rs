// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `rerun` script left in each run directory

use std::path::Path;

/// Shell command reproducing an invocation from `cwd` with `args`
/// (excluding the program name)
pub fn rerun_script(cwd: &Path, args: &[String]) -> String {
    let quoted: Vec<String> = args.iter().map(|arg| shell_quote(arg)).collect();
    format!(
        "pushd {} && wr {}; popd",
        shell_quote(&cwd.to_string_lossy()),
        quoted.join(" ")
    )
}

/// Quote `text` as one POSIX shell word
pub fn shell_quote(text: &str) -> String {
    if text.is_empty() {
        return "''".into();
    }
    let safe = text
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c));
    if safe {
        return text.to_string();
    }
    format!("'{}'", text.replace('\'', r#"'"'"'"#))
}

#[cfg(test)]
#[path = "rerun_tests.rs"]
mod tests;
