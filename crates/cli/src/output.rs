// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output of the run result JSON

use anyhow::{Context, Result};
use serde_json::{Map, Value as Json};
use std::io::Write;
use std::path::Path;

/// Where and how `run` reports its result
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputTarget<'a> {
    /// `-o FILE`
    pub file: Option<&'a Path>,
    /// `--error-json`
    pub error_json: bool,
    /// Compact rather than pretty
    pub compact: bool,
}

impl OutputTarget<'_> {
    /// Emit `content` to the `-o` file or standard output. Error objects are
    /// only emitted with `--error-json` or `-o`.
    pub fn emit(&self, content: &Json) -> Result<()> {
        let is_error = content.get("error").is_some();
        if is_error && !self.error_json && self.file.is_none() {
            return Ok(());
        }
        let text = render(content, self.compact)?;
        match self.file {
            Some(path) => write_atomic(path, &text),
            None => {
                println!("{}", text);
                Ok(())
            }
        }
    }
}

/// Serialize with keys sorted
pub fn render(content: &Json, compact: bool) -> Result<String> {
    let sorted = sort_keys(content);
    let text = if compact {
        serde_json::to_string(&sorted)?
    } else {
        serde_json::to_string_pretty(&sorted)?
    };
    Ok(text)
}

fn sort_keys(json: &Json) -> Json {
    match json {
        Json::Object(obj) => {
            let mut entries: Vec<_> = obj.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Json::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_keys(v)))
                    .collect::<Map<_, _>>(),
            )
        }
        Json::Array(items) => Json::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Replace `path` with `text` in one rename
pub fn write_atomic(path: &Path, text: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("unable to write {}", path.display()))?;
    writeln!(tmp, "{}", text)?;
    tmp.persist(path)
        .with_context(|| format!("unable to write {}", path.display()))?;
    Ok(())
}
