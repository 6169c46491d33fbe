// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reading document sources
//!
//! [`FileSourceReader`] resolves local files against the importer and the
//! search path. [`CliSourceReader`] wraps it with http(s) fetching and the
//! optional policy denying imports from outside the main document's tree.

use crate::error::DocumentError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use wr_core::paths::{absolutize, path_really_within};

/// Text of a document and where it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    pub text: String,
    /// URI as given, or the fetched URL
    pub uri: String,
    /// Absolute local path, or the URL for remote documents
    pub abspath: String,
}

#[async_trait]
pub trait SourceReader: Send + Sync {
    /// Read `uri`; `importer` is the abspath of the importing document
    async fn read(
        &self,
        uri: &str,
        search_paths: &[PathBuf],
        importer: Option<&str>,
    ) -> Result<SourceText, DocumentError>;
}

pub fn is_remote(uri: &str) -> bool {
    uri.starts_with("http:") || uri.starts_with("https:")
}

/// Local files only
#[derive(Debug, Clone, Default)]
pub struct FileSourceReader;

impl FileSourceReader {
    fn resolve(uri: &str, search_paths: &[PathBuf], importer: Option<&str>) -> Option<PathBuf> {
        let path = Path::new(uri.strip_prefix("file://").unwrap_or(uri));
        if path.is_absolute() {
            return path.is_file().then(|| path.to_path_buf());
        }
        let importer_dir = importer
            .filter(|i| !is_remote(i))
            .and_then(|i| Path::new(i).parent().map(Path::to_path_buf));
        importer_dir
            .into_iter()
            .chain(search_paths.iter().cloned())
            .chain(std::iter::once(PathBuf::from(".")))
            .map(|dir| dir.join(path))
            .find(|candidate| candidate.is_file())
    }
}

#[async_trait]
impl SourceReader for FileSourceReader {
    async fn read(
        &self,
        uri: &str,
        search_paths: &[PathBuf],
        importer: Option<&str>,
    ) -> Result<SourceText, DocumentError> {
        let path = Self::resolve(uri, search_paths, importer)
            .ok_or_else(|| DocumentError::NotFound(uri.to_string()))?;
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| DocumentError::Read {
                uri: uri.to_string(),
                reason: e.to_string(),
            })?;
        Ok(SourceText {
            text,
            uri: uri.to_string(),
            abspath: absolutize(&path).to_string_lossy().into_owned(),
        })
    }
}

/// Source reader used by the command line
pub struct CliSourceReader<R = FileSourceReader> {
    inner: R,
    no_outside_imports: bool,
    top_dir: Mutex<Option<PathBuf>>,
}

impl CliSourceReader<FileSourceReader> {
    pub fn new(no_outside_imports: bool) -> Self {
        Self::wrap(FileSourceReader, no_outside_imports)
    }
}

impl<R: SourceReader> CliSourceReader<R> {
    pub fn wrap(inner: R, no_outside_imports: bool) -> Self {
        Self {
            inner,
            no_outside_imports,
            top_dir: Mutex::new(None),
        }
    }

    async fn fetch(&self, url: &str) -> Result<SourceText, DocumentError> {
        tracing::debug!(url, "fetching document");
        let owned = url.to_string();
        let text = tokio::task::spawn_blocking(move || {
            let mut response = ureq::get(&owned).call().map_err(|e| e.to_string())?;
            response
                .body_mut()
                .read_to_string()
                .map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| e.to_string())
        .and_then(|r| r)
        .map_err(|reason| DocumentError::Read {
            uri: url.to_string(),
            reason,
        })?;
        Ok(SourceText {
            text,
            uri: url.to_string(),
            abspath: url.to_string(),
        })
    }

    fn check_within(&self, ans: &SourceText, search_paths: &[PathBuf]) -> Result<(), DocumentError> {
        let abspath = Path::new(&ans.abspath);
        let parent = abspath.parent().unwrap_or(abspath).to_path_buf();
        let top = {
            let mut top_dir = self
                .top_dir
                .lock()
                .map_err(|_| DocumentError::Permission("import policy state poisoned".into()))?;
            top_dir.get_or_insert_with(|| parent.clone()).clone()
        };
        let allowed = std::iter::once(&top)
            .chain(search_paths.iter())
            .any(|dir| path_really_within(abspath, dir));
        if allowed {
            Ok(())
        } else {
            Err(DocumentError::Permission(format!(
                "denied import from outside main WDL file's directory; \
                 strike --no-outside-imports or add to --path: {}",
                parent.display()
            )))
        }
    }
}

#[async_trait]
impl<R: SourceReader> SourceReader for CliSourceReader<R> {
    async fn read(
        &self,
        uri: &str,
        search_paths: &[PathBuf],
        importer: Option<&str>,
    ) -> Result<SourceText, DocumentError> {
        if is_remote(uri) {
            return self.fetch(uri).await;
        }
        if let Some(base) = importer.filter(|i| is_remote(i)) {
            if Path::new(uri).is_absolute() {
                return Err(DocumentError::Permission(format!(
                    "absolute import {} from downloaded document {}",
                    uri, base
                )));
            }
            let joined = url::Url::parse(base)
                .and_then(|b| b.join(uri))
                .map_err(|e| DocumentError::Read {
                    uri: uri.to_string(),
                    reason: e.to_string(),
                })?;
            return self.fetch(joined.as_str()).await;
        }
        let ans = self.inner.read(uri, search_paths, importer).await?;
        if self.no_outside_imports {
            self.check_within(&ans, search_paths)?;
        }
        Ok(ans)
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
