//! Lint specs
//!
//! Verify finding display, suppression, and the exit status policy.

use crate::prelude::*;

const LINTED: &str = r#"{
  "version": "1.1",
  "tasks": [
    {"name": "t",
     "lint": [
       {"pos": {"line": 4, "column": 3}, "class": "StringCoercion",
        "message": "String coerced", "severity": "MODERATE"},
       {"pos": {"line": 2, "column": 1}, "class": "UnusedDeclaration",
        "message": "nothing uses x", "suppressed": true, "severity": "CRITICAL"}
     ]}
  ]
}"#;

fn project() -> Project {
    let temp = Project::empty();
    temp.file("linted.json", LINTED);
    temp
}

#[test]
fn findings_shown_beneath_node() {
    project()
        .wr()
        .args(["check", "linted.json"])
        .passes()
        .stdout_eq(
            "linted.json\n    task t\n        (Ln 4, Col 3) StringCoercion [MODERATE], String coerced\n",
        );
}

#[test]
fn no_suppress_shows_inline_suppressed_findings() {
    project()
        .wr()
        .args(["check", "--no-suppress", "linted.json"])
        .passes()
        .stdout_has("(Ln 2, Col 1) UnusedDeclaration (suppressed) [CRITICAL], nothing uses x");
}

#[test]
fn suppressed_class_hidden() {
    project()
        .wr()
        .args(["check", "--suppress", "StringCoercion", "linted.json"])
        .passes()
        .stdout_lacks("StringCoercion");
}

#[test]
fn threshold_above_finding_passes() {
    project()
        .wr()
        .args(["check", "--exit-on-lint-severity", "MAJOR", "linted.json"])
        .passes();
}

#[test]
fn threshold_at_finding_fails() {
    project()
        .wr()
        .args(["check", "--exit-on-lint-severity", "moderate", "linted.json"])
        .exits(2)
        .stderr_has("Error: Found lint issues with severity >= MODERATE");
}

#[test]
fn suppressed_finding_never_trips_threshold() {
    project()
        .wr()
        .args([
            "check",
            "--no-suppress",
            "--suppress",
            "StringCoercion",
            "--exit-on-lint-severity",
            "CRITICAL",
            "linted.json",
        ])
        .passes()
        .stdout_has("UnusedDeclaration (suppressed)");
}

#[test]
fn strict_fails_on_any_finding() {
    project()
        .wr()
        .args(["check", "--strict", "linted.json"])
        .exits(2)
        .stderr_has("Lint findings detected (--strict mode)");
}

#[test]
fn threshold_from_configuration() {
    let temp = project();
    temp.file("wr.toml", "[lint]\nexit_on_severity = \"MINOR\"\n");

    temp.wr()
        .args(["check", "--cfg", "wr.toml", "linted.json"])
        .exits(2);
}

#[test]
fn invalid_threshold_warned_and_ignored() {
    project()
        .wr()
        .args(["check", "--exit-on-lint-severity", "SEVERE", "linted.json"])
        .passes()
        .stderr_has("Warning: Invalid severity level 'SEVERE', ignoring");
}
