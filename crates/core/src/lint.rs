// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lint findings attached to document nodes

use crate::document::SourcePosition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Minor,
    Moderate,
    Major,
    Critical,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid severity level '{0}'")]
pub struct SeverityParseError(pub String);

impl FromStr for Severity {
    type Err = SeverityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MINOR" => Ok(Severity::Minor),
            "MODERATE" => Ok(Severity::Moderate),
            "MAJOR" => Ok(Severity::Major),
            "CRITICAL" => Ok(Severity::Critical),
            _ => Err(SeverityParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Minor => "MINOR",
            Severity::Moderate => "MODERATE",
            Severity::Major => "MAJOR",
            Severity::Critical => "CRITICAL",
        };
        write!(f, "{}", name)
    }
}

/// One finding from the external lint engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub pos: SourcePosition,
    pub class: String,
    pub message: String,
    #[serde(default)]
    pub suppressed: bool,
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// Structural nodes that can carry lint findings
pub trait Linted {
    fn findings(&self) -> &[Finding];
}
