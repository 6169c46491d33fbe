// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loading typed documents and their imports
//!
//! The typed document format is the JSON an external typechecker emits:
//! the workflow, tasks, imports and struct definitions, with each
//! declaration's type and lint findings already attached. Loading reads
//! every import recursively, resolves struct types, and re-validates the
//! cross-document references this front-end relies on.

use crate::error::{DocumentError, Located};
use crate::source::SourceReader;
use async_trait::async_trait;
use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use wr_core::{Decl, Document, SourcePosition, Type, TypeKind, WorkflowNode};

/// Imports nested deeper than this are treated as a cycle
const MAX_IMPORT_DEPTH: usize = 32;

type StructTable = indexmap::IndexMap<String, indexmap::IndexMap<String, Type>>;

#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(
        &self,
        uri: &str,
        search_paths: &[PathBuf],
        check_quant: bool,
        reader: &dyn SourceReader,
    ) -> Result<Document, DocumentError>;
}

#[derive(Debug, Clone, Default)]
pub struct JsonDocumentLoader;

#[async_trait]
impl DocumentLoader for JsonDocumentLoader {
    async fn load(
        &self,
        uri: &str,
        search_paths: &[PathBuf],
        check_quant: bool,
        reader: &dyn SourceReader,
    ) -> Result<Document, DocumentError> {
        let doc = load_document(uri, search_paths, None, check_quant, reader, 0).await?;
        tracing::debug!(
            uri = %doc.uri,
            tasks = doc.tasks.len(),
            imports = doc.imports.len(),
            "loaded document"
        );
        Ok(doc)
    }
}

fn load_document<'a>(
    uri: &'a str,
    search_paths: &'a [PathBuf],
    importer: Option<&'a str>,
    check_quant: bool,
    reader: &'a dyn SourceReader,
    depth: usize,
) -> Pin<Box<dyn Future<Output = Result<Document, DocumentError>> + Send + 'a>> {
    Box::pin(async move {
        let source = reader.read(uri, search_paths, importer).await?;
        let mut doc: Document =
            serde_json::from_str(&source.text).map_err(|e| DocumentError::Syntax {
                at: Located {
                    uri: source.uri.clone(),
                    pos: SourcePosition {
                        line: e.line() as u32,
                        column: e.column() as u32,
                        end_line: e.line() as u32,
                        end_column: e.column() as u32 + 1,
                    },
                    source_text: source.text.clone(),
                    version: declared_version(&source.text),
                },
                message: e.to_string(),
            })?;
        doc.uri = source.uri;
        doc.abspath = source.abspath;
        doc.source_text = source.text;

        let abspath = doc.abspath.clone();
        for i in 0..doc.imports.len() {
            let (import_uri, pos) = (doc.imports[i].uri.clone(), doc.imports[i].pos);
            let at = located(&doc, pos);
            if depth >= MAX_IMPORT_DEPTH {
                return Err(DocumentError::Validation {
                    at,
                    message: format!("import cycle or nesting too deep at {}", import_uri),
                });
            }
            let imported = load_document(
                &import_uri,
                search_paths,
                Some(&abspath),
                check_quant,
                reader,
                depth + 1,
            )
            .await
            .map_err(|cause| DocumentError::Import {
                at,
                import: import_uri.clone(),
                cause: Box::new(cause),
            })?;
            doc.imports[i].doc = Some(Box::new(imported));
        }

        validate(&mut doc, check_quant)?;
        mark_called(&mut doc);
        Ok(doc)
    })
}

fn located(doc: &Document, pos: SourcePosition) -> Located {
    Located {
        uri: doc.uri.clone(),
        pos,
        source_text: doc.source_text.clone(),
        version: doc.version.clone().filter(|v| !v.trim().is_empty()),
    }
}

/// The `version` of a document that failed to load, when its JSON is at
/// least well-formed
fn declared_version(text: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(text).ok()?;
    json.get("version")?
        .as_str()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn validate(doc: &mut Document, check_quant: bool) -> Result<(), DocumentError> {
    let mut errors = Vec::new();

    let mut table = doc.structs.clone();
    for import in &doc.imports {
        if let Some(imported) = &import.doc {
            for (name, members) in &imported.structs {
                table.entry(name.clone()).or_insert_with(|| members.clone());
            }
        }
    }
    let mut unresolved = Vec::new();
    for_each_decl_mut(doc, &mut |decl| {
        if let Err(name) = resolve_structs(&mut decl.ty, &table, 0) {
            unresolved.push((decl.pos, name));
        }
    });
    for (pos, name) in unresolved {
        errors.push(DocumentError::Validation {
            at: located(doc, pos),
            message: format!("Unknown type {}", name),
        });
    }

    let mut seen = HashSet::new();
    for import in &doc.imports {
        if !seen.insert(import.namespace.as_str()) {
            errors.push(DocumentError::Validation {
                at: located(doc, import.pos),
                message: format!("Multiple imports with namespace {}", import.namespace),
            });
        }
    }
    let mut seen = HashSet::new();
    for task in &doc.tasks {
        if !seen.insert(task.name.as_str()) {
            errors.push(DocumentError::Validation {
                at: located(doc, task.pos),
                message: format!("Multiple tasks named {}", task.name),
            });
        }
    }

    if let Some(workflow) = &doc.workflow {
        let mut call_names = HashSet::new();
        for call in wr_core::calls(&workflow.body) {
            if !call_names.insert(call.name()) {
                errors.push(DocumentError::Validation {
                    at: located(doc, call.pos),
                    message: format!("Multiple calls named {}", call.name()),
                });
            }
            match doc.callee(&call.callee_id()) {
                None => errors.push(DocumentError::Validation {
                    at: located(doc, call.pos),
                    message: format!("No such task/workflow: {}", call.callee),
                }),
                Some(callee) => {
                    let available = callee.available_inputs();
                    for name in call.inputs.iter().filter(|n| !available.contains(n)) {
                        errors.push(DocumentError::Validation {
                            at: located(doc, call.pos),
                            message: format!("No such input {} to {}", name, call.callee),
                        });
                    }
                }
            }
        }
    }

    let mut mismatches = Vec::new();
    for_each_decl_mut(doc, &mut |decl| {
        if let Some(actual) = &decl.expr_type {
            if !actual.coerces(&decl.ty, check_quant) {
                mismatches.push((decl.pos, decl.ty.clone(), actual.clone()));
            }
        }
    });
    for (pos, expected, actual) in mismatches {
        errors.push(DocumentError::TypeMismatch {
            at: located(doc, pos),
            expected,
            actual,
        });
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(DocumentError::Multiple(errors)),
    }
}

/// Fill in struct members by name; `Err` carries an unknown struct name
fn resolve_structs(ty: &mut Type, table: &StructTable, depth: usize) -> Result<(), String> {
    match &mut ty.kind {
        TypeKind::Array { item, .. } => resolve_structs(item, table, depth),
        TypeKind::Map { key, value } => {
            resolve_structs(key, table, depth)?;
            resolve_structs(value, table, depth)
        }
        TypeKind::Pair { left, right } => {
            resolve_structs(left, table, depth)?;
            resolve_structs(right, table, depth)
        }
        TypeKind::Struct { name, members } => {
            let definition = table.get(name.as_str()).ok_or_else(|| name.clone())?;
            if depth >= MAX_IMPORT_DEPTH {
                return Err(name.clone());
            }
            let mut resolved = Vec::with_capacity(definition.len());
            for (member, member_ty) in definition {
                let mut member_ty = member_ty.clone();
                resolve_structs(&mut member_ty, table, depth + 1)?;
                resolved.push((member.clone(), member_ty));
            }
            *members = resolved;
            Ok(())
        }
        _ => Ok(()),
    }
}

fn for_each_decl_mut(doc: &mut Document, f: &mut impl FnMut(&mut Decl)) {
    fn body(nodes: &mut [WorkflowNode], f: &mut impl FnMut(&mut Decl)) {
        for node in nodes {
            match node {
                WorkflowNode::Decl(decl) => f(decl),
                WorkflowNode::Scatter(scatter) => body(&mut scatter.body, f),
                WorkflowNode::Conditional(cond) => body(&mut cond.body, f),
                WorkflowNode::Call(_) => {}
            }
        }
    }
    if let Some(workflow) = &mut doc.workflow {
        workflow.inputs.iter_mut().flatten().for_each(&mut *f);
        body(&mut workflow.body, f);
        workflow.outputs.iter_mut().flatten().for_each(&mut *f);
    }
    for task in &mut doc.tasks {
        task.inputs.iter_mut().flatten().for_each(&mut *f);
        task.postinputs.iter_mut().for_each(&mut *f);
        task.outputs.iter_mut().for_each(&mut *f);
    }
}

/// Flag each task or imported workflow called from this document's workflow
fn mark_called(doc: &mut Document) {
    let callee_ids: Vec<Vec<String>> = match &doc.workflow {
        Some(workflow) => wr_core::calls(&workflow.body)
            .into_iter()
            .map(|call| call.callee_id().into_iter().map(String::from).collect())
            .collect(),
        None => return,
    };
    for id in callee_ids {
        mark(doc, &id);
    }

    fn mark(doc: &mut Document, id: &[String]) {
        match id {
            [name] => {
                if let Some(task) = doc.tasks.iter_mut().find(|t| &t.name == name) {
                    task.called = true;
                } else if let Some(workflow) =
                    doc.workflow.as_mut().filter(|w| &w.name == name)
                {
                    workflow.called = true;
                }
            }
            [namespace, rest @ ..] => {
                let imported = doc
                    .imports
                    .iter_mut()
                    .find(|i| &i.namespace == namespace)
                    .and_then(|i| i.doc.as_deref_mut());
                if let Some(imported) = imported {
                    mark(imported, rest);
                }
            }
            [] => {}
        }
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
