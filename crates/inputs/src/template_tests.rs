// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use wr_core::Document;
use yare::parameterized;

#[parameterized(
    int = { "Int", json!(42) },
    optional_int = { "Int?", json!(42) },
    float = { "Float", json!(FLOAT_PLACEHOLDER) },
    boolean = { "Boolean", json!(false) },
    string = { "String", json!("String") },
    file = { "File?", json!("File?") },
    array = { "Array[File]+", json!(["File"]) },
    map = { "Map[String,Int]", json!({"String": 42}) },
    pair = { "Pair[Int,Array[String]]", json!({"left": 42, "right": ["String"]}) },
)]
fn template_by_type(text: &str, expected: Json) {
    let ty: Type = text.parse().unwrap();
    assert_eq!(type_template(&ty), expected);
}

#[test]
fn struct_template_omits_optional_members() {
    let ty = Type::structure(
        "Sample",
        vec![
            ("id".into(), Type::string()),
            ("depth".into(), Type::int().optional(true)),
            ("reads".into(), Type::array(Type::file(), true)),
        ],
    );
    assert_eq!(
        type_template(&ty),
        json!({"id": "String", "reads": ["File"]})
    );
}

fn doc() -> Document {
    serde_json::from_value(json!({
        "workflow": {
            "name": "wf",
            "inputs": [
                {"name": "n", "type": "Int"},
                {"name": "label", "type": "String?"},
            ],
            "body": [{"kind": "call", "callee": "t"}],
        },
        "tasks": [{"name": "t", "inputs": [{"name": "flag", "type": "Boolean"}]}],
    }))
    .unwrap()
}

#[test]
fn workflow_template_is_namespaced_unless_disabled() {
    let doc = doc();
    let target = Executable::Workflow {
        workflow: doc.workflow.as_ref().unwrap(),
        doc: &doc,
    };
    assert_eq!(
        Json::Object(input_template(&target, true)),
        json!({"wf.n": 42, "wf.t.flag": false})
    );
    assert_eq!(
        Json::Object(input_template(&target, false)),
        json!({"n": 42, "t.flag": false})
    );
}

#[test]
fn task_template_never_namespaced() {
    let doc = doc();
    let target = Executable::Task {
        task: &doc.tasks[0],
        doc: &doc,
    };
    assert_eq!(Json::Object(input_template(&target, true)), json!({"flag": false}));
}
