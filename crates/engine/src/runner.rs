// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run orchestration
//!
//! Opens the cache scope, runs the target, leaves the `rerun` script and a
//! copy of the document source in the run directory, and classifies the
//! outcome.

use crate::config::RunConfig;
use crate::engine::{Engine, RunTarget};
use crate::error::EngineError;
use crate::failure::{classify, FailureKind, FailureReport};
use serde_json::{Map, Value as Json};
use std::path::{Path, PathBuf};
use wr_core::Document;

/// One run of a resolved target
#[derive(Debug)]
pub struct RunRequest<'a> {
    pub doc: &'a Document,
    pub target: RunTarget,
    /// Inputs keyed by unqualified name
    pub inputs: Map<String, Json>,
    pub run_dir: Option<PathBuf>,
    /// Contents of the `rerun` script
    pub rerun: String,
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Outputs qualified with the target name
    Success { dir: PathBuf, outputs: Map<String, Json> },
    Failure(FailureReport),
}

impl RunOutcome {
    pub fn exit_status(&self) -> i32 {
        match self {
            RunOutcome::Success { .. } => 0,
            RunOutcome::Failure(report) => report.exit_status,
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        match self {
            RunOutcome::Success { dir, .. } => Some(dir),
            RunOutcome::Failure(report) => report.dir.as_deref().map(Path::new),
        }
    }

    /// `{"outputs": .., "dir": ..}` on success, the classified report on
    /// failure
    pub fn to_json(&self) -> Json {
        match self {
            RunOutcome::Success { dir, outputs } => {
                let mut obj = Map::new();
                obj.insert("outputs".into(), Json::Object(outputs.clone()));
                obj.insert("dir".into(), Json::String(dir.to_string_lossy().into_owned()));
                Json::Object(obj)
            }
            RunOutcome::Failure(report) => Json::Object(report.report.clone()),
        }
    }
}

/// Run `request.target` on `engine`
pub async fn run_target(
    engine: &dyn Engine,
    config: &RunConfig,
    request: RunRequest<'_>,
) -> Result<RunOutcome, EngineError> {
    let cache = engine.open_cache(config).await.map_err(EngineError::Cache)?;
    let result = engine
        .run(
            config,
            &request.target,
            &request.inputs,
            request.run_dir.as_deref(),
            &cache,
        )
        .await;

    let outcome = match result {
        Ok(success) => RunOutcome::Success {
            outputs: qualify(&request.target.name, success.outputs),
            dir: success.run_dir,
        },
        Err(failure) => {
            let report = classify(&failure.chain, request.verbose);
            tracing::error!(
                error = report.report.get("error").and_then(Json::as_str).unwrap_or("Error"),
                dir = report.dir.as_deref().unwrap_or_default(),
                from_dir = report.from_dir.as_deref().unwrap_or_default(),
                "{}",
                report.message
            );
            let command_failed = failure
                .chain
                .iter()
                .any(|r| matches!(r.kind, FailureKind::CommandFailed { .. }));
            if command_failed && !request.verbose {
                tracing::info!(
                    "run with --verbose to include task standard error streams in this log"
                );
            }
            RunOutcome::Failure(report)
        }
    };

    // Written while the cache scope still holds the run directory lock
    if let Some(dir) = outcome.dir().filter(|d| d.is_dir()) {
        leave_artifacts(dir, request.doc, &request.rerun)?;
    }
    drop(cache);
    Ok(outcome)
}

fn leave_artifacts(dir: &Path, doc: &Document, rerun: &str) -> Result<(), EngineError> {
    let artifacts = |source| EngineError::Artifacts {
        dir: dir.to_path_buf(),
        source,
    };
    std::fs::write(dir.join("rerun"), format!("{}\n", rerun)).map_err(artifacts)?;
    wr_document::copy_source(doc, &dir.join("wdl")).map_err(artifacts)?;
    Ok(())
}

fn qualify(namespace: &str, outputs: Map<String, Json>) -> Map<String, Json> {
    outputs
        .into_iter()
        .map(|(name, value)| (format!("{}.{}", namespace, name), value))
        .collect()
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
