//! Input template specs

use crate::prelude::*;
use serde_json::json;

#[test]
fn template_lists_required_inputs_with_namespace() {
    let temp = Project::empty();
    temp.file("hello.json", HELLO_WORKFLOW);

    temp.wr()
        .args(["input-template", "hello.json"])
        .passes()
        .stdout_eq("{\n  \"hello.who\": \"String\"\n}\n");
}

#[test]
fn template_without_namespace() {
    let temp = Project::empty();
    temp.file("hello.json", HELLO_WORKFLOW);

    let out = temp
        .wr()
        .args(["input-template", "hello.json", "--no-namespace"])
        .passes();
    assert_eq!(out.stdout_json(), json!({"who": "String"}));
}

#[test]
fn template_for_named_task() {
    let temp = Project::empty();
    temp.file("tasks.json", TWO_TASKS);

    let out = temp
        .wr()
        .args(["input-template", "tasks.json", "--task", "b"])
        .passes();
    assert_eq!(out.stdout_json(), json!({"y": {"String": 42}}));
}

#[test]
fn several_tasks_need_task_option() {
    let temp = Project::empty();
    temp.file("tasks.json", TWO_TASKS);

    temp.wr()
        .args(["input-template", "tasks.json"])
        .exits(2)
        .stderr_has("specify --task");

    temp.wr()
        .args(["input-template", "tasks.json", "--task", "c"])
        .exits(2)
        .stderr_has("no such task c in document");
}
