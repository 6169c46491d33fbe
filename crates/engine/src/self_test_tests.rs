// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::fake::FakeEngine;
use crate::failure::FailureRecord;
use serde_json::json;
use tempfile::TempDir;

fn outputs(messages: Json) -> Map<String, Json> {
    json!({"messages": messages, "message_files": []})
        .as_object()
        .cloned()
        .unwrap()
}

#[tokio::test]
async fn expected_greetings_pass() {
    let tmp = TempDir::new().unwrap();
    let engine = FakeEngine::new().with_outputs(outputs(json!([
        "Hello, Alyssa P. Hacker!\n",
        "Hello, Ben Bitdiddle!\n"
    ])));

    let run_dir = run_self_test(&engine, &RunConfig::default(), tmp.path(), "true".into())
        .await
        .unwrap();

    assert!(run_dir.starts_with(tmp.path()));
    assert!(run_dir.join("rerun").is_file());
    assert!(run_dir.join("wdl/run_self_test.json").is_file());

    let calls = engine.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].target.name, "hello_caller");
    assert!(calls[0].target.is_workflow);
    let names = tmp.path().join("names.txt");
    assert_eq!(calls[0].inputs["who"], json!(names.to_string_lossy()));
    assert_eq!(
        std::fs::read_to_string(names).unwrap().lines().next(),
        Some("Alyssa P. Hacker")
    );
}

#[tokio::test]
async fn wrong_greetings_fail() {
    let tmp = TempDir::new().unwrap();
    let engine = FakeEngine::new().with_outputs(outputs(json!(["Hello, Alyssa P. Hacker!"])));

    let err = run_self_test(&engine, &RunConfig::default(), tmp.path(), "true".into())
        .await
        .unwrap_err();

    let EngineError::SelfTest(message) = err else {
        panic!("unexpected error {:?}", err);
    };
    assert!(message.contains("hello_caller.messages"), "{}", message);
}

#[tokio::test]
async fn failed_run_reports_root_cause() {
    let tmp = TempDir::new().unwrap();
    let engine = FakeEngine::new().with_failure(vec![
        FailureRecord::run_failed("{dir}", "workflow hello_caller failed"),
        FailureRecord::new("EngineUnavailable", "no container runtime"),
    ]);

    let err = run_self_test(&engine, &RunConfig::default(), tmp.path(), "true".into())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "self test failed: no container runtime");
}

#[tokio::test]
async fn built_in_document_loads() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(DOCUMENT_FILE);
    std::fs::write(&path, DOCUMENT).unwrap();

    let doc = JsonDocumentLoader
        .load(&path.to_string_lossy(), &[], true, &FileSourceReader)
        .await
        .unwrap();

    assert_eq!(doc.workflow.as_ref().unwrap().name, SELF_TEST_WORKFLOW);
    assert!(doc.tasks[0].called);
}
