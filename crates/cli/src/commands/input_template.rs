// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wr input-template <uri>` - Skeleton input JSON for the required inputs

use super::{load_document, CommonArgs};
use crate::error::CliError;
use anyhow::Result;
use clap::Args;
use serde_json::Value as Json;
use wr_inputs::{input_template as template, resolve_target};

#[derive(Args, Debug)]
pub struct InputTemplateArgs {
    /// Document to read
    #[arg(value_name = "URI")]
    pub uri: String,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Name of the task to use (required if the document has several
    /// tasks and no workflow)
    #[arg(long)]
    pub task: Option<String>,

    /// Omit the workflow name prefix from input keys
    #[arg(long)]
    pub no_namespace: bool,
}

pub async fn input_template(args: InputTemplateArgs) -> Result<i32> {
    let doc = load_document(&args.uri, &args.common).await?;
    let target = resolve_target(&doc, args.task.as_deref())
        .map_err(|err| CliError::new(err.to_string()).with_source(err))?;
    let obj = template(&target, !args.no_namespace);
    println!("{}", serde_json::to_string_pretty(&Json::Object(obj))?);
    Ok(0)
}
