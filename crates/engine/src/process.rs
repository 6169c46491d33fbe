// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine running as an external process
//!
//! The configured `engine.command` is invoked as
//! `COMMAND [ARGS..] run --document URI --target NAME --inputs FILE
//! --config FILE --dir RUN_DIR`. On success it leaves `outputs.json` in the
//! run directory; on failure, `error.json` holding the nested cause chain.

use crate::config::RunConfig;
use crate::engine::{CacheHandle, Engine, RunFailure, RunSuccess, RunTarget};
use crate::failure::FailureRecord;
use async_trait::async_trait;
use serde_json::{Map, Value as Json};
use std::io;
use std::path::{Path, PathBuf};
use tokio::process::Command;

pub const OUTPUTS_FILE: &str = "outputs.json";
pub const ERROR_FILE: &str = "error.json";
const LOCK_FILE: &str = ".lock";

#[derive(Debug, Clone, Default)]
pub struct ProcessEngine;

#[async_trait]
impl Engine for ProcessEngine {
    fn downloadable(&self, config: &RunConfig, uri: &str, directory: bool) -> bool {
        config.download.able(uri, directory)
    }

    async fn open_cache(&self, config: &RunConfig) -> io::Result<CacheHandle> {
        CacheHandle::open(config)
    }

    async fn run(
        &self,
        config: &RunConfig,
        target: &RunTarget,
        inputs: &Map<String, Json>,
        run_dir: Option<&Path>,
        cache: &CacheHandle,
    ) -> Result<RunSuccess, RunFailure> {
        let run_dir = new_run_dir(run_dir, &target.name, chrono::Local::now())
            .map_err(|e| fault("RunDirError", e))?;
        let dir_text = run_dir.to_string_lossy().into_owned();
        let scope = || FailureRecord::run_failed(dir_text.clone(), format!("{} failed", target.name));
        let scope_failed = |record: FailureRecord| RunFailure {
            chain: vec![scope(), record],
        };
        cache
            .hold_lock(&run_dir.join(LOCK_FILE))
            .map_err(|e| scope_failed(fault_record("RunDirError", e)))?;

        let inputs_file = run_dir.join("inputs.json");
        let config_file = run_dir.join("config.json");
        write_json(&inputs_file, &Json::Object(inputs.clone()))
            .and_then(|_| write_json(&config_file, &config_json(config)))
            .map_err(|e| scope_failed(fault_record("RunDirError", e)))?;

        tracing::info!(dir = %run_dir.display(), target = %target.name, "starting run");
        let mut command = Command::new(&config.engine.command);
        command
            .args(&config.engine.args)
            .arg("run")
            .arg("--document")
            .arg(&target.document)
            .arg("--target")
            .arg(&target.name)
            .arg("--inputs")
            .arg(&inputs_file)
            .arg("--config")
            .arg(&config_file)
            .arg("--dir")
            .arg(&run_dir);
        let status = command.status().await.map_err(|e| {
            scope_failed(FailureRecord::new(
                "EngineUnavailable",
                format!("{}: {}", config.engine.command, e),
            ))
        })?;

        if status.success() {
            let outputs = match read_json(&run_dir.join(OUTPUTS_FILE)) {
                Ok(Json::Object(outputs)) => outputs,
                Ok(_) => {
                    return Err(scope_failed(FailureRecord::new(
                        "OutputError",
                        "engine outputs are not a JSON object",
                    )))
                }
                Err(e) => return Err(scope_failed(fault_record("OutputError", e))),
            };
            tracing::info!(dir = %run_dir.display(), "run succeeded");
            return Ok(RunSuccess { run_dir, outputs });
        }

        match read_json(&run_dir.join(ERROR_FILE)) {
            Ok(json) => {
                let mut chain = FailureRecord::chain_from_json(&json);
                if !chain.first().is_some_and(|r| r.error == "RunFailed") {
                    chain.insert(0, scope());
                }
                Err(RunFailure { chain })
            }
            Err(_) => Err(scope_failed(FailureRecord::new(
                "EngineExited",
                format!("engine exited with {} and no error report", status),
            ))),
        }
    }
}

/// Choose and create the run directory: `hint` itself when it ends in
/// `/.`, otherwise a new `YYYYMMDD_HHMMSS_<name>` directory beneath it (or
/// beneath the working directory)
pub fn new_run_dir(
    hint: Option<&Path>,
    name: &str,
    now: chrono::DateTime<chrono::Local>,
) -> io::Result<PathBuf> {
    let hint_text = hint.map(|h| h.to_string_lossy().into_owned());
    if let Some(exact) = hint_text.as_deref().and_then(|h| h.strip_suffix("/.")) {
        let dir = PathBuf::from(if exact.is_empty() { "/" } else { exact });
        std::fs::create_dir_all(&dir)?;
        return Ok(wr_core::paths::absolutize(&dir));
    }
    let parent = match hint {
        Some(parent) => parent.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let stamp = now.format("%Y%m%d_%H%M%S");
    let mut dir = parent.join(format!("{}_{}", stamp, name));
    let mut attempt = 1;
    while dir.exists() {
        attempt += 1;
        dir = parent.join(format!("{}_{}_{}", stamp, name, attempt));
    }
    std::fs::create_dir_all(&dir)?;
    Ok(wr_core::paths::absolutize(&dir))
}

fn config_json(config: &RunConfig) -> Json {
    serde_json::to_value(config).unwrap_or(Json::Null)
}

fn write_json(path: &Path, json: &Json) -> io::Result<()> {
    let text = serde_json::to_string_pretty(json).map_err(io::Error::other)?;
    std::fs::write(path, text)
}

fn read_json(path: &Path) -> io::Result<Json> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn fault_record(error: &str, e: io::Error) -> FailureRecord {
    FailureRecord::new(error, e.to_string())
}

fn fault(error: &str, e: io::Error) -> RunFailure {
    fault_record(error, e).into()
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
