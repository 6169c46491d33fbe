// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake engine for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::config::RunConfig;
use crate::engine::{CacheHandle, Engine, RunFailure, RunSuccess, RunTarget};
use crate::failure::FailureRecord;
use crate::process::new_run_dir;
use async_trait::async_trait;
use serde_json::{Map, Value as Json};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Recorded run
#[derive(Debug, Clone)]
pub struct EngineCall {
    pub target: RunTarget,
    pub inputs: Map<String, Json>,
    pub run_dir: Option<PathBuf>,
    /// Locks held by the cache handle when the run was made
    pub held_locks: usize,
}

#[derive(Debug, Clone)]
enum Scripted {
    Outputs(Map<String, Json>),
    Fails(Vec<FailureRecord>),
    /// Fails before any run directory exists
    FailsEarly(Vec<FailureRecord>),
}

/// Fake engine: creates the run directory like the process engine, then
/// returns scripted outputs or failures. `{dir}` in failure records'
/// directories is replaced with the run directory.
#[derive(Clone)]
pub struct FakeEngine {
    scripted: Arc<Mutex<Scripted>>,
    calls: Arc<Mutex<Vec<EngineCall>>>,
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeEngine {
    /// Engine succeeding with no outputs
    pub fn new() -> Self {
        Self {
            scripted: Arc::new(Mutex::new(Scripted::Outputs(Map::new()))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_outputs(self, outputs: Map<String, Json>) -> Self {
        *self.scripted.lock().unwrap_or_else(|e| e.into_inner()) = Scripted::Outputs(outputs);
        self
    }

    pub fn with_failure(self, chain: Vec<FailureRecord>) -> Self {
        *self.scripted.lock().unwrap_or_else(|e| e.into_inner()) = Scripted::Fails(chain);
        self
    }

    pub fn with_early_failure(self, chain: Vec<FailureRecord>) -> Self {
        *self.scripted.lock().unwrap_or_else(|e| e.into_inner()) = Scripted::FailsEarly(chain);
        self
    }

    /// Get all recorded runs
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Engine for FakeEngine {
    fn downloadable(&self, _config: &RunConfig, uri: &str, _directory: bool) -> bool {
        uri.starts_with("https://")
    }

    async fn open_cache(&self, _config: &RunConfig) -> io::Result<CacheHandle> {
        Ok(CacheHandle::default())
    }

    async fn run(
        &self,
        _config: &RunConfig,
        target: &RunTarget,
        inputs: &Map<String, Json>,
        run_dir: Option<&Path>,
        cache: &CacheHandle,
    ) -> Result<RunSuccess, RunFailure> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(EngineCall {
                target: target.clone(),
                inputs: inputs.clone(),
                run_dir: run_dir.map(Path::to_path_buf),
                held_locks: cache.held_locks(),
            });
        let scripted = self.scripted.lock().unwrap_or_else(|e| e.into_inner()).clone();
        if let Scripted::FailsEarly(chain) = scripted {
            return Err(RunFailure { chain });
        }

        let dir = new_run_dir(run_dir, &target.name, chrono::Local::now())
            .map_err(|e| RunFailure::from(FailureRecord::new("RunDirError", e.to_string())))?;
        cache
            .hold_lock(&dir.join(".lock"))
            .map_err(|e| RunFailure::from(FailureRecord::new("RunDirError", e.to_string())))?;
        let dir_text = dir.to_string_lossy().into_owned();
        match scripted {
            Scripted::Outputs(outputs) => Ok(RunSuccess {
                run_dir: dir,
                outputs,
            }),
            Scripted::Fails(chain) | Scripted::FailsEarly(chain) => Err(RunFailure {
                chain: chain
                    .into_iter()
                    .map(|mut record| {
                        if let crate::failure::FailureKind::RunFailed {
                            run_dir: Some(run_dir),
                        } = &mut record.kind
                        {
                            *run_dir = run_dir.replace("{dir}", &dir_text);
                        }
                        record
                    })
                    .collect(),
            }),
        }
    }
}
