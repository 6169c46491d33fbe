// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable rendering of document errors

use crate::error::{DocumentError, Located};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub text: String,
    /// Error headline rather than a source excerpt
    pub headline: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorReport {
    pub lines: Vec<ReportLine>,
    /// Some mismatch would pass with quantifier checks relaxed
    pub quant_hint: bool,
    /// The failing document declares no version
    pub version_hint: bool,
}

impl ErrorReport {
    fn headline(&mut self, text: String) {
        self.lines.push(ReportLine {
            text,
            headline: true,
        });
    }

    fn excerpt(&mut self, text: String) {
        self.lines.push(ReportLine {
            text,
            headline: false,
        });
    }
}

pub fn render(err: &DocumentError) -> ErrorReport {
    let mut report = ErrorReport {
        version_hint: lacks_version(err),
        ..ErrorReport::default()
    };
    render_into(err, &mut report);
    report
}

/// Import failures name the importer, whose own version is beside the point
fn lacks_version(err: &DocumentError) -> bool {
    match err {
        DocumentError::Syntax { at, .. }
        | DocumentError::Validation { at, .. }
        | DocumentError::TypeMismatch { at, .. } => at.version.is_none(),
        DocumentError::Multiple(errors) => errors.first().is_some_and(lacks_version),
        _ => false,
    }
}

fn render_into(err: &DocumentError, report: &mut ErrorReport) {
    if let DocumentError::Multiple(errors) = err {
        for inner in errors {
            render_into(inner, report);
        }
        return;
    }
    match err.located() {
        Some(at) => report.headline(format!(
            "({} Ln {} Col {}) {}",
            at.uri, at.pos.line, at.pos.column, err
        )),
        None => report.headline(err.to_string()),
    }
    match err {
        DocumentError::Import { cause, .. } => render_into(cause, report),
        DocumentError::Syntax { at, .. } | DocumentError::Validation { at, .. } => {
            source_excerpt(at, report)
        }
        DocumentError::TypeMismatch {
            at,
            expected,
            actual,
        } => {
            source_excerpt(at, report);
            if actual.coerces(expected, false) {
                report.quant_hint = true;
            }
        }
        _ => {}
    }
}

/// The offending source line with a caret run under the span
fn source_excerpt(at: &Located, report: &mut ErrorReport) {
    if at.source_text.is_empty() || at.pos.line == 0 {
        return;
    }
    let Some(line) = at.source_text.split('\n').nth(at.pos.line as usize - 1) else {
        return;
    };
    let line: Vec<char> = line.replace('\t', " ").chars().collect();
    let column = at.pos.column.max(1) as usize;
    let mut end_column = at.pos.end_column as usize;
    if at.pos.end_line > at.pos.line {
        end_column = line.len() + 1;
    }
    while end_column > column + 1 && line.get(end_column - 2) == Some(&' ') {
        end_column -= 1;
    }
    let carets = end_column.saturating_sub(column).max(1);
    report.excerpt(format!("    {}", line.iter().collect::<String>()));
    report.excerpt(format!("    {}{}", " ".repeat(column - 1), "^".repeat(carets)));
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
