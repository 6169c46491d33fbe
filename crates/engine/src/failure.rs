// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classification of nested run failures
//!
//! The engine reports a failure as a chain of records, outermost first:
//! scope wrappers carrying their run directories, then the root cause and
//! anything beneath it.

use serde_json::{Map, Value as Json};

/// Error names the engine raises deliberately. Anything else is an
/// unexpected fault and is reported with a traceback.
const CLASSIFIED: &[&str] = &[
    "CommandFailed",
    "DownloadFailed",
    "EvalError",
    "InputError",
    "Interrupted",
    "OutputError",
    "RunFailed",
    "RuntimeError",
    "Terminated",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// A workflow or task scope failed; the cause follows in the chain
    RunFailed { run_dir: Option<String> },
    /// A task command exited nonzero
    CommandFailed { exit_status: i32 },
    /// Another deliberately raised runtime error
    Classified,
    Unclassified,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailureRecord {
    /// Error name, e.g. `CommandFailed`
    pub error: String,
    pub kind: FailureKind,
    pub message: String,
    /// Structured detail beyond the name and message
    pub fields: Map<String, Json>,
}

impl FailureRecord {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        let error = error.into();
        let kind = if CLASSIFIED.contains(&error.as_str()) {
            FailureKind::Classified
        } else {
            FailureKind::Unclassified
        };
        Self {
            error,
            kind,
            message: message.into(),
            fields: Map::new(),
        }
    }

    pub fn run_failed(run_dir: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::RunFailed {
                run_dir: Some(run_dir.into()),
            },
            ..Self::new("RunFailed", message)
        }
    }

    pub fn command_failed(exit_status: i32, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::CommandFailed { exit_status },
            ..Self::new("CommandFailed", message)
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Json>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    fn is_wrapper(&self) -> bool {
        matches!(self.kind, FailureKind::RunFailed { .. })
    }

    /// Decode the engine's nested `error.json` into a chain, outermost first
    pub fn chain_from_json(json: &Json) -> Vec<FailureRecord> {
        let mut ans = Vec::new();
        let mut next = Some(json);
        while let Some(Json::Object(obj)) = next {
            let mut fields = obj.clone();
            let error = take_string(&mut fields, "error").unwrap_or_else(|| "Error".into());
            let message = take_string(&mut fields, "message").unwrap_or_default();
            next = obj.get("cause");
            fields.remove("cause");
            let mut record = FailureRecord::new(error, message);
            match record.error.as_str() {
                "RunFailed" => {
                    let run_dir = take_string(&mut fields, "dir");
                    record.kind = FailureKind::RunFailed { run_dir };
                }
                "CommandFailed" => {
                    let exit_status = fields
                        .get("exit_status")
                        .and_then(Json::as_i64)
                        .and_then(|s| i32::try_from(s).ok())
                        .unwrap_or(0);
                    record.kind = FailureKind::CommandFailed { exit_status };
                }
                _ => {}
            }
            record.fields = fields;
            ans.push(record);
        }
        ans
    }
}

fn take_string(obj: &mut Map<String, Json>, key: &str) -> Option<String> {
    match obj.remove(key) {
        Some(Json::String(s)) => Some(s),
        Some(other) => {
            obj.insert(key.to_string(), other);
            None
        }
        None => None,
    }
}

/// What to tell the user about a failed run
#[derive(Debug, Clone, PartialEq)]
pub struct FailureReport {
    pub exit_status: i32,
    /// Root cause message
    pub message: String,
    /// Outermost run directory
    pub dir: Option<String>,
    /// Innermost scope's run directory, where it differs from `dir`
    pub from_dir: Option<String>,
    /// `{error, message, ...fields, dir, from_dir, traceback}`
    pub report: Map<String, Json>,
}

/// Unwrap a failure chain to its root cause.
///
/// The outermost scope naming a run directory is authoritative; the
/// innermost scope is where the failure came from. The exit status is that
/// of the first failed command at or beneath the root cause, else 2. A
/// traceback of the whole chain is attached when `verbose` or when the
/// root cause is unclassified.
pub fn classify(chain: &[FailureRecord], verbose: bool) -> FailureReport {
    let mut dir: Option<String> = None;
    let mut from_dir: Option<String> = None;
    let mut root_idx = chain.len().saturating_sub(1);
    for (idx, record) in chain.iter().enumerate() {
        match &record.kind {
            FailureKind::RunFailed { run_dir } => {
                if dir.is_none() {
                    dir = run_dir.clone();
                }
                if run_dir.is_some() {
                    from_dir = run_dir.clone();
                }
            }
            _ => {
                root_idx = idx;
                break;
            }
        }
    }

    let exit_status = chain
        .iter()
        .skip(root_idx)
        .find_map(|record| match record.kind {
            FailureKind::CommandFailed { exit_status } if exit_status != 0 => Some(exit_status),
            _ => None,
        })
        .unwrap_or(2);

    let mut report = Map::new();
    let (message, unclassified) = match chain.get(root_idx) {
        Some(root) => {
            report.insert("error".into(), Json::String(root.error.clone()));
            for (key, value) in &root.fields {
                report.insert(key.clone(), value.clone());
            }
            (
                root.message.clone(),
                root.kind == FailureKind::Unclassified,
            )
        }
        None => ("run failed".to_string(), true),
    };
    report.insert("message".into(), Json::String(message.clone()));
    if let Some(dir) = &dir {
        report.insert("dir".into(), Json::String(dir.clone()));
    }
    let from_dir = from_dir.filter(|from| Some(from) != dir.as_ref());
    if let Some(from) = &from_dir {
        report.insert("from_dir".into(), Json::String(from.clone()));
    }
    if verbose || unclassified {
        let traceback = chain
            .iter()
            .map(|record| Json::String(format!("{}: {}", record.error, record.message)))
            .collect();
        report.insert("traceback".into(), Json::Array(traceback));
    }

    FailureReport {
        exit_status,
        message,
        dir,
        from_dir,
        report,
    }
}

#[cfg(test)]
#[path = "failure_tests.rs"]
mod tests;
