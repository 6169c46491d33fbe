// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner configuration
//!
//! Loaded from TOML (`--cfg`, else `WR_CFG`, else `<config dir>/wr/wr.toml`)
//! with command-line overrides applied on top.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use wr_core::paths::path_really_within;

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "WR_CFG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub file_io: FileIo,
    pub scheduler: Scheduler,
    pub task_runtime: TaskRuntime,
    pub download_cache: CacheSection,
    pub call_cache: CacheSection,
    pub download: Download,
    pub engine: EngineSection,
    pub logging: Logging,
    pub lint: Lint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileIo {
    /// Input files and run directories must live beneath this directory
    pub root: PathBuf,
    pub copy_input_files: bool,
    pub copy_input_files_for: Vec<String>,
}

impl Default for FileIo {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
            copy_input_files: false,
            copy_input_files_for: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scheduler {
    /// Maximum concurrent tasks; 0 for one per CPU
    pub task_concurrency: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskRuntime {
    /// Runtime settings applied to every task unless it sets its own
    pub defaults: Map<String, Json>,
    /// Maximum CPUs per task; 0 for the host's count
    pub cpu_max: i64,
    /// Maximum memory bytes per task; 0 for the host's, -1 for unlimited
    pub memory_max: i64,
    /// Run task commands as the invoking user
    pub as_user: bool,
    /// Environment passed through to tasks; `None` passes the invoking
    /// environment's value
    pub env: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub get: bool,
    pub put: bool,
    pub dir: PathBuf,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            get: false,
            put: false,
            dir: std::env::temp_dir().join("wr_cache"),
        }
    }
}

impl CacheSection {
    pub fn enabled(&self) -> bool {
        self.get || self.put
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Download {
    /// URI schemes the engine downloads File inputs from
    pub schemes: Vec<String>,
    /// URI schemes the engine downloads Directory inputs from
    pub directory_schemes: Vec<String>,
}

impl Default for Download {
    fn default() -> Self {
        Self {
            schemes: ["http", "https", "s3", "gs"].map(String::from).to_vec(),
            directory_schemes: ["s3", "gs"].map(String::from).to_vec(),
        }
    }
}

impl Download {
    /// Whether the engine can fetch `uri` itself
    pub fn able(&self, uri: &str, directory: bool) -> bool {
        let Some((scheme, rest)) = uri.split_once("://") else {
            return false;
        };
        let schemes = if directory {
            &self.directory_schemes
        } else {
            &self.schemes
        };
        !rest.is_empty() && schemes.iter().any(|s| s == scheme)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    /// Executable implementing the engine contract
    pub command: String,
    /// Arguments placed before the `run` subcommand
    pub args: Vec<String>,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            command: "wr-engine".into(),
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub json: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lint {
    pub exit_on_severity: Option<String>,
}

/// Settings given on the `run` command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub max_tasks: Option<usize>,
    pub copy_input_files: bool,
    pub copy_input_files_for: Vec<String>,
    pub as_me: bool,
    /// JSON object literal, or a file containing one
    pub runtime_defaults: Option<String>,
    pub runtime_cpu_max: Option<i64>,
    /// Byte size such as `4G`, or `-1`
    pub runtime_memory_max: Option<String>,
    /// `NAME` or `NAME=VALUE`
    pub env: Vec<String>,
    pub no_cache: bool,
    pub log_json: bool,
}

impl RunConfig {
    /// Load the configuration file, if any
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }
        let candidate = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join("wr").join("wr.toml")));
        match candidate {
            Some(path) if path.is_file() => Ok((Self::load(&path)?, Some(path))),
            _ => Ok((Self::default(), None)),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Merge command-line settings into the loaded configuration
    pub fn apply(&mut self, overrides: &ConfigOverrides) -> Result<(), ConfigError> {
        if let Some(n) = overrides.max_tasks {
            self.scheduler.task_concurrency = n;
        }
        if overrides.copy_input_files {
            self.file_io.copy_input_files = true;
        }
        if !overrides.copy_input_files_for.is_empty() {
            self.file_io.copy_input_files_for = overrides.copy_input_files_for.clone();
        }
        if overrides.as_me {
            self.task_runtime.as_user = true;
        }
        if let Some(defaults) = &overrides.runtime_defaults {
            self.task_runtime.defaults = runtime_defaults(defaults)?;
        }
        if let Some(cpu) = overrides.runtime_cpu_max {
            self.task_runtime.cpu_max = cpu;
        }
        if let Some(memory) = &overrides.runtime_memory_max {
            self.task_runtime.memory_max = match memory.trim() {
                "-1" => -1,
                text => parse_byte_size(text)?,
            };
        }
        if !overrides.env.is_empty() {
            env_override(&mut self.task_runtime.env, &overrides.env)?;
        }
        if overrides.no_cache {
            self.download_cache.get = false;
            self.call_cache.get = false;
        }
        if overrides.log_json {
            self.logging.json = true;
        }
        Ok(())
    }

    /// Root that File and Directory inputs must lie within
    pub fn input_root(&self) -> PathBuf {
        if self.file_io.copy_input_files {
            PathBuf::from("/")
        } else {
            self.file_io.root.clone()
        }
    }

    /// Check the run directory (or working directory) and an absolute
    /// download cache directory lie within `file_io.root`
    pub fn check_roots(&self, run_dir: &Path) -> Result<(), ConfigError> {
        let root = &self.file_io.root;
        if !path_really_within(run_dir, root) {
            return Err(ConfigError::OutsideRoot {
                dir: run_dir.to_path_buf(),
                root: root.clone(),
            });
        }
        let cache_dir = &self.download_cache.dir;
        if self.download_cache.enabled()
            && cache_dir.is_absolute()
            && !path_really_within(cache_dir, root)
        {
            return Err(ConfigError::CacheOutsideRoot {
                dir: cache_dir.clone(),
                root: root.clone(),
            });
        }
        Ok(())
    }

    /// Lint severity threshold from `lint.exit_on_severity`
    pub fn lint_exit_on_severity(&self) -> Option<&str> {
        self.lint.exit_on_severity.as_deref().filter(|s| !s.trim().is_empty())
    }
}

fn runtime_defaults(arg: &str) -> Result<Map<String, Json>, ConfigError> {
    let text = if arg.trim_start().starts_with('{') {
        arg.to_string()
    } else {
        std::fs::read_to_string(arg).map_err(|source| ConfigError::Read {
            path: PathBuf::from(arg),
            source,
        })?
    };
    match serde_json::from_str(&text) {
        Ok(Json::Object(obj)) => Ok(obj),
        Ok(_) => Err(ConfigError::RuntimeDefaults("expected JSON object".into())),
        Err(e) => Err(ConfigError::RuntimeDefaults(e.to_string())),
    }
}

/// Add `NAME` (pass through) or `NAME=VALUE` (set) entries
pub fn env_override(
    env: &mut BTreeMap<String, Option<String>>,
    args: &[String],
) -> Result<(), ConfigError> {
    for arg in args {
        match arg.split_once('=') {
            Some(("", _)) => return Err(ConfigError::EnvArgument(arg.clone())),
            Some((name, value)) => {
                env.insert(name.to_string(), Some(value.to_string()));
            }
            None => {
                env.insert(arg.clone(), None);
            }
        }
    }
    Ok(())
}

/// Parse a byte size such as `512M`, `4 GiB` or `1.5G`. Bare and `B`
/// suffixes are bytes; `K`/`KB` multiply by 1000 and `Ki`/`KiB` by 1024,
/// likewise for M, G and T.
pub fn parse_byte_size(text: &str) -> Result<i64, ConfigError> {
    let bad = || ConfigError::ByteSize(text.to_string());
    let trimmed = text.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);
    let number: f64 = number.parse().map_err(|_| bad())?;
    let unit = unit.trim().to_ascii_uppercase();
    let unit = unit.strip_suffix('B').unwrap_or(&unit);
    let (prefix, base) = match unit.strip_suffix('I') {
        Some(prefix) if !prefix.is_empty() => (prefix, 1024f64),
        _ => (unit, 1000f64),
    };
    let exponent = match prefix {
        "" => 0,
        "K" => 1,
        "M" => 2,
        "G" => 3,
        "T" => 4,
        _ => return Err(bad()),
    };
    let bytes = number * base.powi(exponent);
    if !bytes.is_finite() || bytes >= i64::MAX as f64 {
        return Err(bad());
    }
    Ok(bytes as i64)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
