// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authorization of File and Directory input paths

use std::path::{Path, PathBuf};
use wr_core::paths::{absolutize, path_really_within};
use walkdir::WalkDir;
use wr_core::InputError;

type Downloadable = Box<dyn Fn(&str, bool) -> bool + Send + Sync>;

/// Where local input paths may live, and which strings are remote URIs
/// exempt from local checks
pub struct PathPolicy {
    root: PathBuf,
    downloadable: Option<Downloadable>,
}

impl std::fmt::Debug for PathPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathPolicy")
            .field("root", &self.root)
            .field("downloadable", &self.downloadable.is_some())
            .finish()
    }
}

impl PathPolicy {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            downloadable: None,
        }
    }

    /// `f(uri, is_directory)` accepts strings the engine can download
    pub fn with_downloadable(
        mut self,
        f: impl Fn(&str, bool) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.downloadable = Some(Box::new(f));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the authorized form of `path`: unchanged when downloadable,
    /// otherwise absolute after checking existence, kind, containment
    /// within the root, and (for directories) every contained symlink.
    pub fn validate(&self, path: &str, directory: bool) -> Result<String, InputError> {
        if self
            .downloadable
            .as_ref()
            .is_some_and(|able| able(path, directory))
        {
            return Ok(path.to_string());
        }

        let candidate = Path::new(path);
        if directory && !candidate.is_dir() {
            return Err(InputError::DirectoryNotFound(path.to_string()));
        }
        if !directory && !candidate.is_file() {
            return Err(InputError::FileNotFound(path.to_string()));
        }

        let abspath = absolutize(candidate);
        let display = abspath.to_string_lossy().into_owned();
        if !path_really_within(&abspath, &self.root) {
            return Err(InputError::OutsideRoot {
                root: self.root.to_string_lossy().into_owned(),
                path: display,
            });
        }

        if directory {
            check_symlinks(&abspath)?;
        }
        Ok(display)
    }
}

/// Reject any symlink beneath `top` that is broken, absolute, or resolves
/// outside `top`. Links are never followed.
fn check_symlinks(top: &Path) -> Result<(), InputError> {
    let read_error = |reason: String| InputError::Read {
        uri: top.to_string_lossy().into_owned(),
        reason,
    };
    for entry in WalkDir::new(top).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| read_error(e.to_string()))?;
        let path = entry.path();
        let metadata = std::fs::symlink_metadata(path).map_err(|e| read_error(e.to_string()))?;
        if !metadata.file_type().is_symlink() {
            continue;
        }
        let target = std::fs::read_link(path).map_err(|e| read_error(e.to_string()))?;
        let broken = std::fs::metadata(path).is_err();
        if broken || target.is_absolute() || !path_really_within(path, top) {
            tracing::debug!(link = %path.display(), "unusable symlink in input directory");
            return Err(InputError::UnusableSymlink(
                top.to_string_lossy().into_owned(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
