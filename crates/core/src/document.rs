// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed document model
//!
//! Documents arrive already parsed and typechecked. This module holds the
//! structure (workflow, tasks, imports) and derives the parameter schema of
//! each executable from it.

use crate::env::Bindings;
use crate::lint::{Finding, Linted};
use crate::types::Type;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Line/column span in a document's source
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
    #[serde(default)]
    pub end_line: u32,
    #[serde(default)]
    pub end_column: u32,
}

/// A declaration: an input, a body value, or an output
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Decl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    /// Source text of the bound expression, if any
    #[serde(default)]
    pub expr: Option<String>,
    /// Type the typechecker inferred for `expr`
    #[serde(default)]
    pub expr_type: Option<Type>,
    #[serde(default)]
    pub pos: SourcePosition,
    #[serde(default)]
    pub lint: Vec<Finding>,
}

impl Decl {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            expr: None,
            expr_type: None,
            pos: SourcePosition::default(),
            lint: Vec::new(),
        }
    }

    pub fn with_expr(mut self, expr: impl Into<String>) -> Self {
        self.expr = Some(expr.into());
        self
    }

    /// No default and not optional
    pub fn is_required(&self) -> bool {
        self.expr.is_none() && !self.ty.optional
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Call {
    /// Dotted callee path, e.g. `lib.align`
    pub callee: String,
    #[serde(default)]
    pub alias: Option<String>,
    /// Callee inputs supplied in the call body
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub pos: SourcePosition,
    #[serde(default)]
    pub lint: Vec<Finding>,
}

impl Call {
    pub fn callee_id(&self) -> Vec<&str> {
        self.callee.split('.').collect()
    }

    /// Name the call binds in the workflow
    pub fn name(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.callee.rsplit('.').next().unwrap_or(&self.callee),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scatter {
    pub variable: String,
    #[serde(default)]
    pub expr: Option<String>,
    #[serde(default)]
    pub body: Vec<WorkflowNode>,
    #[serde(default)]
    pub pos: SourcePosition,
    #[serde(default)]
    pub lint: Vec<Finding>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Conditional {
    #[serde(default)]
    pub expr: Option<String>,
    #[serde(default)]
    pub body: Vec<WorkflowNode>,
    #[serde(default)]
    pub pos: SourcePosition,
    #[serde(default)]
    pub lint: Vec<Finding>,
}

/// Element of a workflow body
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WorkflowNode {
    Decl(Decl),
    Call(Call),
    Scatter(Scatter),
    #[serde(rename = "if")]
    Conditional(Conditional),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Workflow {
    pub name: String,
    #[serde(default)]
    pub inputs: Option<Vec<Decl>>,
    #[serde(default)]
    pub body: Vec<WorkflowNode>,
    #[serde(default)]
    pub outputs: Option<Vec<Decl>>,
    #[serde(default)]
    pub parameter_meta: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub pos: SourcePosition,
    #[serde(default)]
    pub lint: Vec<Finding>,
    #[serde(skip)]
    pub called: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Task {
    pub name: String,
    #[serde(default)]
    pub inputs: Option<Vec<Decl>>,
    #[serde(default)]
    pub postinputs: Vec<Decl>,
    #[serde(default)]
    pub outputs: Vec<Decl>,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub runtime: IndexMap<String, String>,
    #[serde(default)]
    pub parameter_meta: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub pos: SourcePosition,
    #[serde(default)]
    pub lint: Vec<Finding>,
    #[serde(skip)]
    pub called: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Import {
    pub namespace: String,
    pub uri: String,
    #[serde(default)]
    pub pos: SourcePosition,
    /// Filled in by the loader
    #[serde(skip)]
    pub doc: Option<Box<Document>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub workflow: Option<Workflow>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub structs: IndexMap<String, IndexMap<String, Type>>,
    /// Canonical URI the document was read from
    #[serde(skip)]
    pub uri: String,
    /// Absolute path or URL of the document
    #[serde(skip)]
    pub abspath: String,
    #[serde(skip)]
    pub source_text: String,
}

/// A workflow or task that can be run or called
#[derive(Debug, Clone, Copy)]
pub enum Executable<'a> {
    Workflow {
        workflow: &'a Workflow,
        doc: &'a Document,
    },
    Task {
        task: &'a Task,
        doc: &'a Document,
    },
}

/// Synthetic input carrying arbitrary runtime overrides
pub const RUNTIME_INPUT: &str = "_runtime";

impl Document {
    /// Resolve a dotted callee path relative to this document
    pub fn callee(&self, callee_id: &[&str]) -> Option<Executable<'_>> {
        match callee_id {
            [] => None,
            [name] => self
                .tasks
                .iter()
                .find(|t| t.name == *name)
                .map(|task| Executable::Task { task, doc: self })
                .or_else(|| {
                    self.workflow
                        .as_ref()
                        .filter(|w| w.name == *name)
                        .map(|workflow| Executable::Workflow {
                            workflow,
                            doc: self,
                        })
                }),
            [namespace, rest @ ..] => self
                .imports
                .iter()
                .find(|i| i.namespace == *namespace)
                .and_then(|i| i.doc.as_deref())
                .and_then(|doc| doc.callee(rest)),
        }
    }
}

impl<'a> Executable<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Executable::Workflow { workflow, .. } => &workflow.name,
            Executable::Task { task, .. } => &task.name,
        }
    }

    pub fn is_workflow(&self) -> bool {
        matches!(self, Executable::Workflow { .. })
    }

    pub fn doc(&self) -> &'a Document {
        match self {
            Executable::Workflow { doc, .. } | Executable::Task { doc, .. } => doc,
        }
    }

    pub fn pos(&self) -> SourcePosition {
        match self {
            Executable::Workflow { workflow, .. } => workflow.pos,
            Executable::Task { task, .. } => task.pos,
        }
    }

    pub fn parameter_meta(&self) -> &'a IndexMap<String, serde_json::Value> {
        match self {
            Executable::Workflow { workflow, .. } => &workflow.parameter_meta,
            Executable::Task { task, .. } => &task.parameter_meta,
        }
    }

    /// Whether the executable declares an explicit input section
    pub fn has_input_section(&self) -> bool {
        match self {
            Executable::Workflow { workflow, .. } => workflow.inputs.is_some(),
            Executable::Task { task, .. } => task.inputs.is_some(),
        }
    }

    fn own_inputs(&self) -> Vec<&'a Decl> {
        match self {
            Executable::Workflow { workflow, .. } => match &workflow.inputs {
                Some(inputs) => inputs.iter().collect(),
                None => workflow
                    .body
                    .iter()
                    .filter_map(|node| match node {
                        WorkflowNode::Decl(decl) => Some(decl),
                        _ => None,
                    })
                    .collect(),
            },
            Executable::Task { task, .. } => match &task.inputs {
                Some(inputs) => inputs.iter().collect(),
                None => task.postinputs.iter().collect(),
            },
        }
    }

    /// Every parameter a caller may supply, by dotted name
    pub fn available_inputs(&self) -> Bindings<Decl> {
        self.schema(false)
    }

    /// Parameters with neither a default nor an optional type
    pub fn required_inputs(&self) -> Bindings<Decl> {
        self.schema(true)
    }

    fn schema(&self, required_only: bool) -> Bindings<Decl> {
        let mut ans: Bindings<Decl> = self
            .own_inputs()
            .into_iter()
            .filter(|decl| !required_only || decl.is_required())
            .map(|decl| (decl.name.clone(), decl.clone()))
            .collect();
        match self {
            Executable::Task { .. } => {
                if !required_only {
                    ans.bind(
                        RUNTIME_INPUT,
                        Decl::new(RUNTIME_INPUT, Type::any().optional(true)),
                    );
                }
            }
            Executable::Workflow { workflow, doc } => {
                for call in calls(&workflow.body) {
                    let Some(callee) = doc.callee(&call.callee_id()) else {
                        continue;
                    };
                    let callee_inputs = callee.schema(required_only);
                    for (name, decl) in callee_inputs.qualify(call.name()) {
                        let supplied = name
                            .split_once('.')
                            .is_some_and(|(_, rest)| call.inputs.iter().any(|i| i == rest));
                        if !supplied {
                            ans.bind(name, decl);
                        }
                    }
                }
            }
        }
        ans
    }

    /// Output names and types, synthesizing them from calls when a
    /// workflow has no output section
    pub fn effective_outputs(&self) -> Bindings<Type> {
        match self {
            Executable::Task { task, .. } => task
                .outputs
                .iter()
                .map(|decl| (decl.name.clone(), decl.ty.clone()))
                .collect(),
            Executable::Workflow { workflow, doc } => match &workflow.outputs {
                Some(outputs) => outputs
                    .iter()
                    .map(|decl| (decl.name.clone(), decl.ty.clone()))
                    .collect(),
                None => {
                    let mut ans = Bindings::new();
                    for call in calls(&workflow.body) {
                        if let Some(callee) = doc.callee(&call.callee_id()) {
                            for (name, ty) in callee.effective_outputs().qualify(call.name()) {
                                ans.bind(name, ty);
                            }
                        }
                    }
                    ans
                }
            },
        }
    }
}

/// All calls in a workflow body, descending into scatters and conditionals
pub fn calls(body: &[WorkflowNode]) -> Vec<&Call> {
    let mut ans = Vec::new();
    for node in body {
        match node {
            WorkflowNode::Call(call) => ans.push(call),
            WorkflowNode::Scatter(scatter) => ans.extend(calls(&scatter.body)),
            WorkflowNode::Conditional(cond) => ans.extend(calls(&cond.body)),
            WorkflowNode::Decl(_) => {}
        }
    }
    ans
}

macro_rules! impl_linted {
    ($($node:ty),*) => {
        $(impl Linted for $node {
            fn findings(&self) -> &[Finding] {
                &self.lint
            }
        })*
    };
}

impl_linted!(Decl, Call, Scatter, Conditional, Workflow, Task);

impl Linted for WorkflowNode {
    fn findings(&self) -> &[Finding] {
        match self {
            WorkflowNode::Decl(decl) => decl.findings(),
            WorkflowNode::Call(call) => call.findings(),
            WorkflowNode::Scatter(scatter) => scatter.findings(),
            WorkflowNode::Conditional(cond) => cond.findings(),
        }
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
