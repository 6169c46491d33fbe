// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Frozen copy of a document and its imports

use crate::source::is_remote;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use wr_core::Document;

/// Write the source of `doc` and every import beneath `dir`, keeping the
/// layout of local files relative to their common ancestor directory.
/// Remote documents land under their URL's file name.
pub fn copy_source(doc: &Document, dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut sources = BTreeMap::new();
    collect(doc, &mut sources);

    let local: Vec<&Path> = sources
        .keys()
        .filter(|p| !is_remote(p))
        .map(|p| Path::new(p.as_str()))
        .collect();
    let base = common_parent(&local);

    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for (abspath, text) in &sources {
        let rel = if is_remote(abspath) {
            PathBuf::from(url_basename(abspath))
        } else {
            let path = Path::new(abspath.as_str());
            base.as_deref()
                .and_then(|b| path.strip_prefix(b).ok())
                .map(Path::to_path_buf)
                .or_else(|| path.file_name().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("document"))
        };
        let dest = dir.join(rel);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&dest, text)?;
        written.push(dest);
    }
    tracing::debug!(dir = %dir.display(), files = written.len(), "archived document source");
    Ok(written)
}

fn collect<'a>(doc: &'a Document, sources: &mut BTreeMap<String, &'a str>) {
    if sources.contains_key(&doc.abspath) {
        return;
    }
    sources.insert(doc.abspath.clone(), &doc.source_text);
    for import in &doc.imports {
        if let Some(imported) = &import.doc {
            collect(imported, sources);
        }
    }
}

fn common_parent(paths: &[&Path]) -> Option<PathBuf> {
    let mut iter = paths.iter().filter_map(|p| p.parent());
    let mut base = iter.next()?.to_path_buf();
    for parent in iter {
        while !parent.starts_with(&base) {
            if !base.pop() {
                return None;
            }
        }
    }
    Some(base)
}

fn url_basename(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut s| s.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "document".to_string())
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
