// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wr complete-inputs <uri> [prefix]` - Input names for shell completion

use super::{load_document, CommonArgs};
use anyhow::Result;
use clap::Args;
use wr_inputs::{complete_input_names, resolve_target};

#[derive(Args, Debug)]
pub struct CompleteInputsArgs {
    #[arg(value_name = "URI")]
    pub uri: String,

    /// Partial word being completed
    #[arg(default_value = "")]
    pub prefix: String,

    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(long)]
    pub task: Option<String>,
}

/// Print one candidate per line. Failures print nothing, leaving the shell
/// to its default completion.
pub async fn complete_inputs(args: CompleteInputsArgs) -> Result<i32> {
    let Ok(doc) = load_document(&args.uri, &args.common).await else {
        return Ok(0);
    };
    match resolve_target(&doc, args.task.as_deref()) {
        Ok(target) => {
            for name in complete_input_names(&target, &args.prefix) {
                println!("{}", name);
            }
        }
        Err(err) => tracing::debug!(error = %err, "no completions"),
    }
    Ok(0)
}
