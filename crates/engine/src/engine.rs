// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The execution engine seam

use crate::config::RunConfig;
use crate::failure::FailureRecord;
use async_trait::async_trait;
use fs2::FileExt;
use serde_json::{Map, Value as Json};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// The executable to run, by document location and name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTarget {
    /// Absolute path or URL of the main document
    pub document: String,
    pub name: String,
    pub is_workflow: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSuccess {
    pub run_dir: PathBuf,
    /// Outputs keyed by unqualified name
    pub outputs: Map<String, Json>,
}

/// A failed run: the cause chain, outermost first
#[derive(Debug, Clone, PartialEq)]
pub struct RunFailure {
    pub chain: Vec<FailureRecord>,
}

impl From<FailureRecord> for RunFailure {
    fn from(record: FailureRecord) -> Self {
        Self {
            chain: vec![record],
        }
    }
}

/// Executes workflows and tasks
#[async_trait]
pub trait Engine: Send + Sync {
    /// Whether the engine downloads `uri` itself, exempting it from local
    /// path checks
    fn downloadable(&self, config: &RunConfig, uri: &str, directory: bool) -> bool;

    /// Open the cache scope for one run. Run directory locks taken through
    /// the handle are held until it drops.
    async fn open_cache(&self, config: &RunConfig) -> io::Result<CacheHandle>;

    /// Run `target` with unqualified `inputs`. `run_dir` is a parent
    /// directory for a new timestamped run directory, or the run
    /// directory itself when it ends in `/.`.
    async fn run(
        &self,
        config: &RunConfig,
        target: &RunTarget,
        inputs: &Map<String, Json>,
        run_dir: Option<&Path>,
        cache: &CacheHandle,
    ) -> Result<RunSuccess, RunFailure>;
}

/// Cache scope held across a run
#[derive(Debug, Default)]
pub struct CacheHandle {
    download_dir: Option<PathBuf>,
    call_dir: Option<PathBuf>,
    // NOTE(lifetime): Held to maintain exclusive file locks; released on drop
    locks: Mutex<Vec<File>>,
}

impl CacheHandle {
    /// Create the enabled cache directories
    pub fn open(config: &RunConfig) -> io::Result<Self> {
        let prepare = |section: &crate::config::CacheSection| -> io::Result<Option<PathBuf>> {
            if !section.enabled() {
                return Ok(None);
            }
            std::fs::create_dir_all(&section.dir)?;
            Ok(Some(section.dir.clone()))
        };
        let handle = Self {
            download_dir: prepare(&config.download_cache)?,
            call_dir: prepare(&config.call_cache)?,
            locks: Mutex::new(Vec::new()),
        };
        tracing::debug!(
            download_dir = ?handle.download_dir,
            call_dir = ?handle.call_dir,
            "opened cache"
        );
        Ok(handle)
    }

    pub fn download_dir(&self) -> Option<&Path> {
        self.download_dir.as_deref()
    }

    pub fn call_dir(&self) -> Option<&Path> {
        self.call_dir.as_deref()
    }

    /// Take an exclusive lock on `path`, creating it, until the handle
    /// drops
    pub fn hold_lock(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        file.try_lock_exclusive()?;
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| io::Error::other("cache lock list poisoned"))?;
        locks.push(file);
        Ok(())
    }

    pub fn held_locks(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }
}

impl Drop for CacheHandle {
    fn drop(&mut self) {
        tracing::trace!(locks = self.held_locks(), "releasing cache");
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
