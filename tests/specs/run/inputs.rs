//! Run input specs
//!
//! Verify input merging and validation via `wr run --json`, which prints
//! the resolved inputs instead of running.

use crate::prelude::*;
use serde_json::json;

fn hello() -> Project {
    let temp = Project::empty();
    temp.file("hello.json", HELLO_WORKFLOW);
    temp
}

#[test]
fn command_line_inputs_qualified_with_workflow_name() {
    let out = hello()
        .wr()
        .args(["run", "hello.json", "who=world", "times=3", "--json"])
        .passes();
    assert_eq!(out.stdout_json(), json!({"hello.who": "world", "hello.times": 3}));
}

#[test]
fn split_name_value_tokens_rejoined() {
    let out = hello()
        .wr()
        .args(["run", "hello.json", "who=", "world", "--json"])
        .passes();
    assert_eq!(out.stdout_json(), json!({"hello.who": "world"}));
}

#[test]
fn command_line_overrides_json_input() {
    let out = hello()
        .wr()
        .args([
            "run",
            "hello.json",
            "-i",
            r#"{"hello.who": "json"}"#,
            "who=cli",
            "--json",
        ])
        .passes();
    assert_eq!(out.stdout_json(), json!({"hello.who": "cli"}));
}

#[test]
fn json_input_from_file_and_stdin() {
    let temp = hello();
    temp.file("inputs.json", r##"{"who": "file", "#comment": "ignored"}"##);

    let out = temp
        .wr()
        .args(["run", "hello.json", "-i", "inputs.json", "--json"])
        .passes();
    assert_eq!(out.stdout_json(), json!({"hello.who": "file"}));

    let out = temp
        .wr()
        .args(["run", "hello.json", "-i", "-", "--json"])
        .stdin(r#"{"hello.who": "piped"}"#)
        .passes();
    assert_eq!(out.stdout_json(), json!({"hello.who": "piped"}));
}

#[test]
fn repeated_array_input_accumulates() {
    let temp = hello();
    let a = temp.file("a.txt", "a");
    let b = temp.file("b.txt", "b");

    let out = temp
        .wr()
        .args([
            "run",
            "hello.json",
            "who=x",
            "greet.files=a.txt",
            "greet.files=b.txt",
            "--json",
        ])
        .passes();
    assert_eq!(
        out.stdout_json(),
        json!({
            "hello.who": "x",
            "hello.greet.files": [a.to_string_lossy(), b.to_string_lossy()],
        })
    );
}

#[test]
fn missing_required_input_prints_usage() {
    hello()
        .wr()
        .args(["run", "hello.json", "--json"])
        .exits(2)
        .stderr_has("required inputs:")
        .stderr_has("  String who")
        .stderr_has("  Int times = 1")
        .stderr_has("missing required inputs for hello: who");
}

#[test]
fn unknown_input_rejected() {
    hello()
        .wr()
        .args(["run", "hello.json", "who=x", "nope=1"])
        .exits(2)
        .stderr_has("No such input to hello: nope");
}

#[test]
fn scalar_duplicate_rejected() {
    hello()
        .wr()
        .args(["run", "hello.json", "who=x", "who=y"])
        .exits(2)
        .stderr_has("non-array input who duplicated");
}

#[test]
fn bad_number_rejected() {
    hello()
        .wr()
        .args(["run", "hello.json", "who=x", "times=many"])
        .exits(2)
        .stderr_has("Int input should be a number instead of `many'");
}

#[test]
fn missing_input_file_rejected() {
    hello()
        .wr()
        .args(["run", "hello.json", "who=x", "greet.files=nope.txt"])
        .exits(2)
        .stderr_has("File not found: nope.txt");
}

#[test]
fn error_json_on_standard_output() {
    let out = hello()
        .wr()
        .args(["run", "hello.json", "--error-json"])
        .exits(2);
    assert_eq!(out.stdout_json()["error"], "InputError");
}

#[test]
fn several_tasks_require_task_flag() {
    let temp = Project::empty();
    temp.file("tasks.json", TWO_TASKS);

    temp.wr()
        .args(["run", "tasks.json", "x=1"])
        .exits(2)
        .stderr_has("specify --task");

    let out = temp
        .wr()
        .args(["run", "tasks.json", "--task", "b", r#"y={"k": 1}"#, "--json"])
        .passes();
    assert_eq!(out.stdout_json(), json!({"y": {"k": 1}}));
}

#[test]
fn empty_and_none_overrides() {
    let temp = Project::empty();
    temp.file(
        "t.json",
        r#"{"tasks": [{"name": "t", "inputs": [
            {"name": "xs", "type": "Array[Int]"},
            {"name": "s", "type": "String?", "expr": "\"d\""},
            {"name": "ys", "type": "Array[Int]+"}
        ]}]}"#,
    );

    let out = temp
        .wr()
        .args(["run", "t.json", "--empty", "xs", "--none", "s", "ys=1", "--json"])
        .passes();
    assert_eq!(out.stdout_json(), json!({"xs": [], "s": null, "ys": [1]}));

    temp.wr()
        .args(["run", "t.json", "--empty", "ys"])
        .exits(2)
        .stderr_has("Cannot set input Array[Int]+ ys to empty array");
}

#[test]
fn input_outside_root_rejected() {
    let temp = hello();
    let outside = Project::empty();
    let file = outside.file("a.txt", "a");
    temp.file("wr.toml", &format!("[file_io]\nroot = \"{}\"\n", temp.path().display()));

    let files_arg = format!("greet.files={}", file.display());

    temp.wr()
        .args(["run", "hello.json", "--cfg", "wr.toml", "who=x", files_arg.as_str()])
        .exits(2)
        .stderr_has("file_io.root");
}
