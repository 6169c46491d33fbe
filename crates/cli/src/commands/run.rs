// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wr run <uri> [name=value]...` - Run a workflow or task

use super::{document_error, read_document, CommonArgs};
use crate::error::CliError;
use crate::output::OutputTarget;
use anyhow::Result;
use clap::Args;
use serde_json::{json, Value as Json};
use std::path::PathBuf;
use wr_document::CliSourceReader;
use wr_engine::{
    rerun_script, run_target, ConfigOverrides, Engine, ProcessEngine, RunConfig, RunOutcome,
    RunRequest, RunTarget,
};
use wr_inputs::{resolve_inputs, resolve_target, usage, CliInputs, PathPolicy};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Document to run
    #[arg(value_name = "URI")]
    pub uri: String,

    /// Inputs as name=value; repeat an array input's name to add items
    #[arg(value_name = "NAME=VALUE")]
    pub inputs: Vec<String>,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Input JSON: an object literal, a file or URL, or - for standard input
    #[arg(short = 'i', long = "input", value_name = "INPUT.json")]
    pub input_file: Option<String>,

    /// Set an Array or String input to be empty
    #[arg(long, value_name = "NAME")]
    pub empty: Vec<String>,

    /// Set an optional input to null, overriding any default
    #[arg(long, value_name = "NAME")]
    pub none: Vec<String>,

    /// Run this task instead of the workflow
    #[arg(long)]
    pub task: Option<String>,

    /// Print the input JSON and exit without running
    #[arg(short = 'j', long = "json")]
    pub json_only: bool,

    /// Directory for the run's new timestamped subdirectory, or the run
    /// directory itself when ending in /.
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub run_dir: Option<PathBuf>,

    /// Print the error JSON on standard output upon failure
    #[arg(long)]
    pub error_json: bool,

    /// Write the result JSON to this file instead of standard output
    #[arg(short = 'o', value_name = "OUT.json")]
    pub stdout_file: Option<PathBuf>,

    /// Include more detail, and task standard error, in the log
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,

    /// Write log messages as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Also write the log to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Configuration file
    #[arg(long, value_name = "FILE")]
    pub cfg: Option<PathBuf>,

    /// Maximum number of tasks to run concurrently
    #[arg(short = '@', value_name = "N")]
    pub max_tasks: Option<usize>,

    /// Maximum CPUs for any one task, -1 for unlimited
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub runtime_cpu_max: Option<i64>,

    /// Maximum memory for any one task, such as 4G, or -1 for unlimited
    #[arg(long, value_name = "SIZE", allow_hyphen_values = true)]
    pub runtime_memory_max: Option<String>,

    /// Default runtime settings as a JSON object or file
    #[arg(long, value_name = "JSON")]
    pub runtime_defaults: Option<String>,

    /// Disable the download and call caches for this run
    #[arg(long)]
    pub no_cache: bool,

    /// Pass an environment variable through to tasks, or set it
    #[arg(long, value_name = "NAME[=VALUE]")]
    pub env: Vec<String>,

    /// Copy input files for every task instead of mounting them
    #[arg(long)]
    pub copy_input_files: bool,

    /// Copy input files for the named task
    #[arg(long, value_name = "TASK")]
    pub copy_input_files_for: Vec<String>,

    /// Run tasks as the invoking user
    #[arg(long)]
    pub as_me: bool,
}

impl RunArgs {
    fn overrides(&self, log_json: bool) -> ConfigOverrides {
        ConfigOverrides {
            max_tasks: self.max_tasks,
            copy_input_files: self.copy_input_files,
            copy_input_files_for: self.copy_input_files_for.clone(),
            as_me: self.as_me,
            runtime_defaults: self.runtime_defaults.clone(),
            runtime_cpu_max: self.runtime_cpu_max,
            runtime_memory_max: self.runtime_memory_max.clone(),
            env: self.env.clone(),
            no_cache: self.no_cache,
            log_json,
        }
    }

    fn cli_inputs(&self) -> CliInputs {
        CliInputs {
            tokens: self.inputs.clone(),
            empty: self.empty.clone(),
            none: self.none.clone(),
        }
    }
}

fn error_json(error: &str, message: impl std::fmt::Display) -> Json {
    json!({"error": error, "message": message.to_string()})
}

/// Run the document, returning the process exit status
pub async fn run(args: RunArgs, log_json: bool) -> Result<i32> {
    let output = OutputTarget {
        file: args.stdout_file.as_deref(),
        error_json: args.error_json,
        compact: log_json,
    };

    let (mut config, config_file) =
        RunConfig::discover(args.cfg.as_deref()).map_err(CliError::from)?;
    config
        .apply(&args.overrides(log_json))
        .map_err(CliError::from)?;
    tracing::debug!(file = ?config_file, config = ?config, "effective configuration");
    if !config.task_runtime.env.is_empty() {
        tracing::warn!("--env is a non-standard side channel; relying on it is probably not portable");
    }

    let cwd = std::env::current_dir()?;
    let run_parent = args.run_dir.clone().unwrap_or_else(|| cwd.clone());
    if let Err(err) = config.check_roots(&run_parent) {
        tracing::error!(dir = %run_parent.display(), root = %config.file_io.root.display(), "{}", err);
        return Err(CliError::from(err).into());
    }

    let doc = match read_document(&args.uri, &args.common).await {
        Ok(doc) => doc,
        Err(err) => {
            output.emit(&error_json(err.name(), &err))?;
            return Err(document_error(err, &args.common).into());
        }
    };

    let engine = ProcessEngine;
    let downloadable_config = config.clone();
    let policy = PathPolicy::new(config.input_root()).with_downloadable(move |uri, directory| {
        ProcessEngine.downloadable(&downloadable_config, uri, directory)
    });
    let reader = CliSourceReader::new(false);
    let resolved = resolve_inputs(
        &doc,
        args.task.as_deref(),
        args.input_file.as_deref(),
        &args.cli_inputs(),
        &policy,
        &reader,
        true,
    )
    .await;
    let (target, merged) = match resolved {
        Ok(resolved) => resolved,
        Err(err) => {
            output.emit(&error_json("InputError", &err))?;
            let styled = console::user_attended_stderr();
            let task = args.task.as_deref();
            return Err(CliError::input(err, || {
                resolve_target(&doc, task)
                    .map(|target| usage(&target, styled))
                    .unwrap_or_default()
            })
            .into());
        }
    };

    if args.json_only {
        let json = Json::Object(merged.json);
        let text = if log_json {
            serde_json::to_string(&json)?
        } else {
            serde_json::to_string_pretty(&json)?
        };
        println!("{}", text);
        return Ok(0);
    }

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let request = RunRequest {
        doc: &doc,
        target: RunTarget {
            document: doc.abspath.clone(),
            name: target.name().to_string(),
            is_workflow: target.is_workflow(),
        },
        inputs: merged.env.to_json(None),
        run_dir: args.run_dir.clone(),
        rerun: rerun_script(&cwd, &argv),
        verbose: args.verbose || args.common.debug,
    };
    let outcome = run_target(&engine, &config, request)
        .await
        .map_err(CliError::from)?;
    output.emit(&outcome.to_json())?;

    match outcome {
        RunOutcome::Success { .. } => Ok(0),
        RunOutcome::Failure(report) if args.common.debug => Err(anyhow::anyhow!(
            "{}",
            serde_json::to_string_pretty(&Json::Object(report.report))?
        )),
        RunOutcome::Failure(report) => Ok(report.exit_status),
    }
}
