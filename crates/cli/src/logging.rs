// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log setup: standard error, optionally JSON, plus an optional file

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;

/// Environment variable enabling JSON logs
pub const LOG_JSON_ENV: &str = "WR__LOGGING__JSON";

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub verbose: bool,
    pub debug: bool,
    pub json: bool,
    pub no_color: bool,
    pub file: Option<PathBuf>,
}

impl LogOptions {
    fn default_directive(&self) -> &'static str {
        if self.debug {
            "trace"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

/// Whether `WR__LOGGING__JSON` asks for JSON logs
pub fn json_from_env() -> bool {
    std::env::var(LOG_JSON_ENV).is_ok_and(|v| truthy(&v))
}

fn truthy(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "t" | "y" | "1" | "true" | "yes"
    )
}

/// Install the global subscriber. The returned guard flushes the log file
/// when dropped.
pub fn init(options: &LogOptions) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.default_directive()));
    let ansi = !options.no_color
        && std::env::var_os("NO_COLOR").is_none()
        && console::user_attended_stderr();

    let (file_layer, guard) = match &options.file {
        Some(path) => {
            let (dir, name) = split_log_path(path)?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };
    let json_layer = options
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!options.json).then(|| {
        fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .try_init()?;
    Ok(guard)
}

fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf)> {
    let name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("invalid --log-file {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;
    Ok((dir, PathBuf::from(name)))
}
