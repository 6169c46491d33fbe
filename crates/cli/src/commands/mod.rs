// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod check;
pub mod complete_inputs;
pub mod input_template;
pub mod run;

use crate::error::CliError;
use clap::Args;
use std::path::PathBuf;
use wr_core::Document;
use wr_document::{render, CliSourceReader, DocumentError, DocumentLoader, JsonDocumentLoader};

/// Options shared by every command that loads a document
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Local directory to search for imports
    #[arg(short = 'p', long = "path", value_name = "DIR")]
    pub path: Vec<PathBuf>,

    /// Disallow imports from outside the main document's directory (and
    /// any --path directories)
    #[arg(long)]
    pub no_outside_imports: bool,

    /// Relax static validation of optional (?) and nonempty (+) type
    /// quantifiers
    #[arg(long)]
    pub no_quant_check: bool,

    /// Show full error details instead of a summary
    #[arg(long)]
    pub debug: bool,
}

impl CommonArgs {
    pub fn check_quant(&self) -> bool {
        !self.no_quant_check
    }
}

/// Load `uri` and its imports, rendering document errors for the user
pub async fn load_document(uri: &str, common: &CommonArgs) -> Result<Document, CliError> {
    read_document(uri, common)
        .await
        .map_err(|err| document_error(err, common))
}

pub async fn read_document(uri: &str, common: &CommonArgs) -> Result<Document, DocumentError> {
    let reader = CliSourceReader::new(common.no_outside_imports);
    JsonDocumentLoader
        .load(uri, &common.path, common.check_quant(), &reader)
        .await
}

pub fn document_error(err: DocumentError, common: &CommonArgs) -> CliError {
    let report = render(&err);
    CliError::document(err, report, common.check_quant())
}
