// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wr - workflow runner

mod commands;
mod completions;
mod error;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, complete_inputs, input_template, run, run_self_test};
use completions::CompletionsArgs;
use error::CliError;
use logging::LogOptions;
use std::path::Path;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "wr",
    version,
    about = "Check and run workflows and tasks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a document and outline it with lint findings
    Check(check::CheckArgs),
    /// Run a workflow or task
    Run(Box<run::RunArgs>),
    /// Print a template input JSON for a workflow or task
    InputTemplate(input_template::InputTemplateArgs),
    /// Run a short built-in workflow to test the engine configuration
    RunSelfTest(run_self_test::RunSelfTestArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
    /// List input names for completing `wr run`
    #[command(hide = true)]
    CompleteInputs(complete_inputs::CompleteInputsArgs),
}

impl Commands {
    fn debug(&self) -> bool {
        match self {
            Commands::Check(args) => args.common.debug,
            Commands::Run(args) => args.common.debug,
            Commands::InputTemplate(args) => args.common.debug,
            Commands::CompleteInputs(args) => args.common.debug,
            Commands::RunSelfTest(_) | Commands::Completions(_) => false,
        }
    }

    /// `self_test_dir` receives the self-test log
    fn log_options(&self, self_test_dir: Option<&Path>) -> LogOptions {
        let debug = self.debug();
        match self {
            Commands::RunSelfTest(args) => LogOptions {
                verbose: true,
                json: args.log_json || logging::json_from_env(),
                file: self_test_dir.map(|dir| dir.join(run_self_test::LOG_FILE)),
                ..LogOptions::default()
            },
            Commands::Run(args) => LogOptions {
                verbose: args.verbose,
                debug,
                json: args.log_json || logging::json_from_env(),
                no_color: args.no_color,
                file: args.log_file.clone(),
            },
            _ => LogOptions {
                debug,
                json: logging::json_from_env(),
                ..LogOptions::default()
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let debug = cli.command.debug();
    let self_test_dir = match &cli.command {
        Commands::RunSelfTest(args) => Some(args.prepare_dir()?),
        _ => None,
    };
    let log_options = cli.command.log_options(self_test_dir.as_deref());
    let _guard = logging::init(&log_options)?;

    let result = match cli.command {
        Commands::Check(args) => check::check(args).await,
        Commands::Run(args) => run::run(*args, log_options.json).await,
        Commands::InputTemplate(args) => input_template::input_template(args).await,
        Commands::RunSelfTest(args) => match &self_test_dir {
            Some(dir) => run_self_test::run_self_test(args, dir, log_options.json).await,
            None => Err(anyhow::anyhow!("no self test directory")),
        },
        Commands::CompleteInputs(args) => complete_inputs::complete_inputs(args).await,
        Commands::Completions(args) => {
            completions::write_completions::<Cli>(args.shell, &mut std::io::stdout())
                .map(|()| 0)
                .map_err(anyhow::Error::from)
        }
    };

    match result {
        Ok(status) => Ok(exit_code(status)),
        Err(err) if debug => Err(err),
        Err(err) => match err.downcast::<CliError>() {
            Ok(cli_err) => {
                eprint!("{}", cli_err.report());
                Ok(exit_code(cli_err.exit_code))
            }
            Err(other) => Err(other),
        },
    }
}

fn exit_code(status: i32) -> ExitCode {
    ExitCode::from(status_byte(status))
}

/// A status that would read as success modulo 256 becomes 2
fn status_byte(status: i32) -> u8 {
    match u8::try_from(status.rem_euclid(256)) {
        Ok(0) if status != 0 => 2,
        Ok(code) => code,
        Err(_) => 2,
    }
}
