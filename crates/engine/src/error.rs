// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for configuration and runs

use std::path::PathBuf;
use thiserror::Error;

/// Errors loading or overriding the configuration, or violating its
/// root policy
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("--cfg file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unable to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid --runtime-defaults: {0}")]
    RuntimeDefaults(String),

    #[error("invalid byte size: {0}")]
    ByteSize(String),

    #[error("invalid --env argument: {0}")]
    EnvArgument(String),

    #[error("working directory or --dir must be within the configured `file_io.root' directory")]
    OutsideRoot { dir: PathBuf, root: PathBuf },

    #[error("configuration error: 'download_cache.dir' must be within the `file_io.root' directory")]
    CacheOutsideRoot { dir: PathBuf, root: PathBuf },
}

/// Errors in the orchestrator's own work around a run
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unable to open cache: {0}")]
    Cache(#[source] std::io::Error),

    #[error("unable to prepare run directory {}: {source}", path.display())]
    RunDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to write run artifacts in {}: {source}", dir.display())]
    Artifacts {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("self test failed: {0}")]
    SelfTest(String),
}
