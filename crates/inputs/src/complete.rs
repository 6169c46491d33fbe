// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use wr_core::Executable;

/// Shell completions for an input token being typed: required input
/// names suffixed with `=`, narrowed to `prefix` when it has no `=` yet.
/// Optional inputs are offered only when no required one matches.
pub fn complete_input_names(target: &Executable<'_>, prefix: &str) -> Vec<String> {
    let required: Vec<String> = target
        .required_inputs()
        .names()
        .map(|name| format!("{}=", name))
        .collect();
    if prefix.is_empty() || prefix.contains('=') {
        return required;
    }
    let matching: Vec<String> = required
        .into_iter()
        .filter(|name| name.starts_with(prefix))
        .collect();
    if !matching.is_empty() {
        return matching;
    }
    target
        .available_inputs()
        .names()
        .filter(|name| name.starts_with(prefix))
        .map(|name| format!("{}=", name))
        .collect()
}

#[cfg(test)]
#[path = "complete_tests.rs"]
mod tests;
