//! Outline specs
//!
//! Verify `wr check` prints each document's structure.

use crate::prelude::*;

#[test]
fn outline_lists_workflow_calls_and_tasks() {
    let temp = Project::empty();
    temp.file("hello.json", HELLO_WORKFLOW);

    temp.wr()
        .args(["check", "hello.json"])
        .passes()
        .stdout_eq(
            "hello.json\n    workflow hello (not called)\n        call greet\n    task greet\n",
        );
}

#[test]
fn tasks_not_marked_without_workflow() {
    let temp = Project::empty();
    temp.file("tasks.json", TWO_TASKS);

    temp.wr()
        .args(["check", "tasks.json"])
        .passes()
        .stdout_eq("tasks.json\n    task a\n    task b\n");
}

#[test]
fn several_documents_outlined_in_order() {
    let temp = Project::empty();
    temp.file("hello.json", HELLO_WORKFLOW);
    temp.file("tasks.json", TWO_TASKS);

    temp.wr()
        .args(["check", "tasks.json", "hello.json"])
        .passes()
        .stdout_has("tasks.json\n    task a")
        .stdout_has("hello.json\n    workflow hello");
}

#[test]
fn missing_document_fails() {
    let temp = Project::empty();

    temp.wr()
        .args(["check", "nope.json"])
        .exits(2)
        .stderr_has("nope.json");
}

#[test]
fn unversioned_document_error_hints_at_version() {
    let temp = Project::empty();
    temp.file("broken.json", "{\n  \"tasks\": [\n}");

    temp.wr()
        .args(["check", "broken.json"])
        .exits(2)
        .stderr_has("* Hint: document should begin with WDL version declaration");
}

#[test]
fn versioned_document_error_has_no_version_hint() {
    let temp = Project::empty();
    temp.file("dup.json", r#"{"version": "1.1", "tasks": [{"name": "t"}, {"name": "t"}]}"#);

    temp.wr()
        .args(["check", "dup.json"])
        .exits(2)
        .stderr_has("Multiple tasks named t")
        .stderr_lacks("version declaration");
}
