// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use wr_core::{Document, Executable, InputError};

/// Pick the executable to run: the named task, else the workflow, else
/// the document's only task.
pub fn resolve_target<'a>(
    doc: &'a Document,
    task: Option<&str>,
) -> Result<Executable<'a>, InputError> {
    if let Some(name) = task {
        return doc
            .tasks
            .iter()
            .find(|t| t.name == name)
            .map(|task| Executable::Task { task, doc })
            .ok_or_else(|| InputError::NoSuchTask(name.to_string()));
    }
    if let Some(workflow) = &doc.workflow {
        return Ok(Executable::Workflow { workflow, doc });
    }
    match doc.tasks.as_slice() {
        [task] => Ok(Executable::Task { task, doc }),
        [] => Err(InputError::EmptyDocument),
        _ => Err(InputError::AmbiguousTarget),
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
