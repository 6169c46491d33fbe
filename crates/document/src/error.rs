// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors loading a document

use thiserror::Error;
use wr_core::{SourcePosition, Type};

/// Where in which document an error was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub uri: String,
    pub pos: SourcePosition,
    /// Source of the document, for excerpts
    pub source_text: String,
    /// Version the document declares, if any
    pub version: Option<String>,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("{message}")]
    Syntax { at: Located, message: String },

    #[error("Failed to import {import}")]
    Import {
        at: Located,
        import: String,
        #[source]
        cause: Box<DocumentError>,
    },

    #[error("{message}")]
    Validation { at: Located, message: String },

    #[error("Expected {expected} instead of {actual}")]
    TypeMismatch {
        at: Located,
        expected: Type,
        actual: Type,
    },

    #[error("{} validation errors", .0.len())]
    Multiple(Vec<DocumentError>),

    #[error("{0}")]
    Permission(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("unable to read {uri}: {reason}")]
    Read { uri: String, reason: String },
}

impl DocumentError {
    pub fn located(&self) -> Option<&Located> {
        match self {
            DocumentError::Syntax { at, .. }
            | DocumentError::Import { at, .. }
            | DocumentError::Validation { at, .. }
            | DocumentError::TypeMismatch { at, .. } => Some(at),
            _ => None,
        }
    }

    /// Error class name for machine-readable reports
    pub fn name(&self) -> &'static str {
        match self {
            DocumentError::Syntax { .. } => "SyntaxError",
            DocumentError::Import { .. } => "ImportError",
            DocumentError::Validation { .. } | DocumentError::TypeMismatch { .. } => {
                "ValidationError"
            }
            DocumentError::Multiple(_) => "MultipleValidationErrors",
            DocumentError::Permission(_) => "PermissionError",
            DocumentError::NotFound(_) => "FileNotFoundError",
            DocumentError::Read { .. } => "ReadSourceError",
        }
    }
}
