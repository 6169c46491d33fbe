// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Input errors
//!
//! Raised while resolving the target and assembling its inputs. All of
//! them are the user's to fix, so the CLI reports them without a trace.

use crate::value::ValueError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("no such task {0} in document")]
    NoSuchTask(String),

    #[error("specify --task for WDL document with multiple tasks and no workflow")]
    AmbiguousTarget,

    #[error("Empty WDL document")]
    EmptyDocument,

    #[error("No such input to {target}: {name}")]
    NoSuchInput { target: String, name: String },

    #[error("Invalid input name=value pair: {0}")]
    InvalidPair(String),

    #[error("non-array input {0} duplicated")]
    Duplicated(String),

    #[error("missing required inputs for {target}: {}", names.join(", "))]
    Missing { target: String, names: Vec<String> },

    #[error("Cannot set input {ty} {name} to empty array")]
    EmptyNonempty { ty: String, name: String },

    #[error(
        "Cannot set {ty} {name} to empty array or string{}",
        if *optional { format!("; perhaps you want --none {}", name) } else { String::new() }
    )]
    NotEmptiable {
        ty: String,
        name: String,
        optional: bool,
    },

    #[error("Cannot set non-optional input {ty} {name} to None")]
    NotOptional { ty: String, name: String },

    #[error("Boolean input should be true or false instead of `{0}'")]
    Boolean(String),

    #[error("{ty} input should be a number instead of `{text}'")]
    Number { ty: String, text: String },

    #[error("Invalid JSON for input of type {ty}, check syntax and shell quoting: {reason}")]
    InvalidJson { ty: String, reason: String },

    #[error("No command-line support yet for inputs of type {0}; workaround: specify in JSON file with --input")]
    Unsupported(String),

    #[error("Invalid value for input of type {ty}: {source}")]
    Coercion {
        ty: String,
        #[source]
        source: ValueError,
    },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("File & Directory inputs must be located within the configured `file_io.root' directory `{root}' unlike `{path}'")]
    OutsideRoot { root: String, path: String },

    #[error("Input Directory contains unusable symlink: {0}")]
    UnusableSymlink(String),

    #[error("check JSON input; {0}")]
    Json(String),

    #[error("unable to read {uri}: {reason}")]
    Read { uri: String, reason: String },
}

impl InputError {
    /// Whether the target's usage summary helps the user fix this error
    pub fn wants_usage(&self) -> bool {
        matches!(
            self,
            InputError::NoSuchInput { .. }
                | InputError::InvalidPair(_)
                | InputError::Duplicated(_)
                | InputError::Missing { .. }
        )
    }
}
