// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing errors.
//!
//! A [`CliError`] ends the process with its exit code after printing:
//! - context lines (usage summary, error excerpts)
//! - the message, wrapped and set off by blank lines
//! - hints for how to fix it

use console::style;
use std::fmt;
use wr_core::InputError;
use wr_document::{DocumentError, ErrorReport};
use wr_engine::{ConfigError, EngineError};

const MESSAGE_WIDTH: usize = 100;

/// Error with context and hints, reported without a backtrace
#[derive(Debug)]
pub struct CliError {
    /// What went wrong; may be empty when the context says it all
    pub message: String,
    /// Printed before the message
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    pub exit_code: i32,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            exit_code: 2,
            source: None,
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// An input error, preceded by the target's usage summary when that
    /// helps
    pub fn input(err: InputError, usage: impl FnOnce() -> Vec<String>) -> Self {
        let context = if err.wants_usage() { usage() } else { Vec::new() };
        Self {
            context,
            ..Self::new(err.to_string()).with_source(err)
        }
    }

    /// A document error rendered with source excerpts. Headlines are
    /// red on a terminal.
    pub fn document(err: DocumentError, report: ErrorReport, check_quant: bool) -> Self {
        let mut ans = Self::new("");
        for line in &report.lines {
            ans.context.push(if line.headline {
                style(&line.text).red().bold().for_stderr().to_string()
            } else {
                line.text.clone()
            });
        }
        if check_quant && report.quant_hint {
            ans.suggestions.push(
                "for compatibility with older existing WDL code, try setting --no-quant-check \
                 to relax quantifier validation rules."
                    .into(),
            );
        }
        if report.version_hint {
            ans.suggestions
                .push("document should begin with WDL version declaration".into());
        }
        ans.with_source(err)
    }

    /// Render for standard error
    pub fn report(&self) -> String {
        let mut out = String::new();
        for line in &self.context {
            out.push_str(line);
            out.push('\n');
        }
        if !self.message.is_empty() {
            let wrapped = textwrap::wrap(&self.message, MESSAGE_WIDTH).join("\n");
            out.push('\n');
            out.push_str(&style(wrapped).red().bold().for_stderr().to_string());
            out.push_str("\n\n");
        }
        for suggestion in &self.suggestions {
            out.push_str("* Hint: ");
            out.push_str(suggestion);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            match &self.source {
                Some(source) => write!(f, "{}", source),
                None => write!(f, "error"),
            }
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let message = err.to_string();
        let root_detail = match &err {
            ConfigError::OutsideRoot { dir, root } | ConfigError::CacheOutsideRoot { dir, root } => {
                Some(format!("dir: {}, root: {}", dir.display(), root.display()))
            }
            _ => None,
        };
        let ans = Self::new(message).with_source(err);
        match root_detail {
            Some(detail) => ans.with_context(detail),
            None => ans,
        }
    }
}

impl From<EngineError> for CliError {
    fn from(err: EngineError) -> Self {
        Self::new(err.to_string()).with_source(err)
    }
}
