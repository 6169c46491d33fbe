// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Document outline with lint findings
//!
//! Walks a loaded document depth-first and renders one line per structural
//! node, with each node's findings listed just beneath it. While rendering,
//! the report tracks what it needs to decide the exit status: how many
//! findings were shown, and whether any reached the severity threshold.

use std::collections::HashSet;
use wr_core::{Document, Finding, Linted, Severity, Task, Workflow, WorkflowNode};

#[derive(Debug, Clone, Default)]
pub struct OutlineOptions {
    /// Finding classes hidden everywhere
    pub suppress: HashSet<String>,
    /// Show findings that carry an inline suppression
    pub show_all: bool,
    /// Mark tasks and workflows nobody calls
    pub show_called: bool,
    pub exit_on_severity: Option<Severity>,
}

/// First finding that reached the severity threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintTrigger {
    pub threshold: Severity,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct OutlineReport {
    pub lines: Vec<String>,
    /// Number of findings shown
    pub shown: usize,
    pub trigger: Option<LintTrigger>,
}

impl OutlineReport {
    /// `Err` with the reason to exit non-zero
    pub fn verdict(&self, strict: bool) -> Result<(), String> {
        if strict && self.shown > 0 {
            return Err("Lint findings detected (--strict mode)".to_string());
        }
        match &self.trigger {
            Some(trigger) => Err(format!(
                "Found lint issues with severity >= {}",
                trigger.threshold
            )),
            None => Ok(()),
        }
    }
}

/// Append the outline of `doc` to `report`
pub fn outline(doc: &Document, options: &OutlineOptions, report: &mut OutlineReport) {
    Outliner { options, report }.document(doc, 0);
}

struct Outliner<'a> {
    options: &'a OutlineOptions,
    report: &'a mut OutlineReport,
}

fn indent(level: usize) -> String {
    " ".repeat(level * 4)
}

impl Outliner<'_> {
    fn document(&mut self, doc: &Document, level: usize) {
        if let Some(workflow) = &doc.workflow {
            self.workflow(workflow, level + 1);
        }
        let mut tasks: Vec<&Task> = doc.tasks.iter().collect();
        tasks.sort_by(|a, b| (!a.called, &a.name).cmp(&(!b.called, &b.name)));
        for task in tasks {
            self.task(task, level + 1);
        }
        let mut imports: Vec<_> = doc.imports.iter().collect();
        imports.sort_by(|a, b| a.namespace.cmp(&b.namespace));
        for import in imports {
            let basename = import.uri.rsplit('/').next().unwrap_or(&import.uri);
            self.report.lines.push(format!(
                "    {}{} : {}",
                indent(level),
                import.namespace,
                basename
            ));
            if let Some(imported) = &import.doc {
                self.document(imported, level + 1);
            }
        }
    }

    fn not_called(&self, called: bool) -> &'static str {
        if self.options.show_called && !called {
            " (not called)"
        } else {
            ""
        }
    }

    fn workflow(&mut self, workflow: &Workflow, level: usize) {
        let line = format!(
            "{}workflow {}{}",
            indent(level),
            workflow.name,
            self.not_called(workflow.called)
        );
        self.report.lines.push(line);
        self.findings(workflow, level);
        for decl in workflow.inputs.iter().flatten() {
            self.findings(decl, level);
        }
        for node in &workflow.body {
            self.node(node, level);
        }
        for decl in workflow.outputs.iter().flatten() {
            self.findings(decl, level);
        }
    }

    fn task(&mut self, task: &Task, level: usize) {
        let line = format!(
            "{}task {}{}",
            indent(level),
            task.name,
            self.not_called(task.called)
        );
        self.report.lines.push(line);
        self.findings(task, level);
        for decl in task
            .inputs
            .iter()
            .flatten()
            .chain(&task.postinputs)
            .chain(&task.outputs)
        {
            self.findings(decl, level);
        }
    }

    /// Declarations share their parent's nesting; everything else nests
    /// one level deeper.
    fn node(&mut self, node: &WorkflowNode, parent: usize) {
        let level = parent + 1;
        let s = indent(level);
        match node {
            WorkflowNode::Decl(decl) => self.findings(decl, parent),
            WorkflowNode::Call(call) => {
                let callee_id = call.callee_id();
                let line = if callee_id.last().copied() != Some(call.name()) {
                    format!("{}call {} as {}", s, callee_id.join("."), call.name())
                } else {
                    format!("{}call {}", s, callee_id.join("."))
                };
                self.report.lines.push(line);
                self.findings(call, level);
            }
            WorkflowNode::Scatter(scatter) => {
                self.report
                    .lines
                    .push(format!("{}scatter {}", s, scatter.variable));
                self.findings(scatter, level);
                for child in &scatter.body {
                    self.node(child, level);
                }
            }
            WorkflowNode::Conditional(cond) => {
                self.report.lines.push(format!("{}if", s));
                self.findings(cond, level);
                for child in &cond.body {
                    self.node(child, level);
                }
            }
        }
    }

    fn findings(&mut self, node: &dyn Linted, level: usize) {
        let mut findings: Vec<&Finding> = node.findings().iter().collect();
        findings.sort_by_key(|f| f.pos);
        for finding in findings {
            if self.options.suppress.contains(&finding.class)
                || (finding.suppressed && !self.options.show_all)
            {
                continue;
            }
            let severity = finding
                .severity
                .map(|sev| format!(" [{}]", sev))
                .unwrap_or_default();
            self.report.lines.push(format!(
                "{}    (Ln {}, Col {}) {}{}{}, {}",
                indent(level),
                finding.pos.line,
                finding.pos.column,
                finding.class,
                if finding.suppressed { " (suppressed)" } else { "" },
                severity,
                finding.message
            ));
            self.report.shown += 1;

            if let (Some(threshold), Some(severity)) =
                (self.options.exit_on_severity, finding.severity)
            {
                if severity >= threshold && !finding.suppressed && self.report.trigger.is_none() {
                    self.report.trigger = Some(LintTrigger {
                        threshold,
                        reason: format!("Found {} with severity {}", finding.class, severity),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "outline_tests.rs"]
mod tests;
