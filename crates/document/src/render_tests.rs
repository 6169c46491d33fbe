// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use wr_core::{SourcePosition, Type};

fn at(line: u32, column: u32, end_line: u32, end_column: u32) -> Located {
    Located {
        uri: "main.json".to_string(),
        pos: SourcePosition {
            line,
            column,
            end_line,
            end_column,
        },
        source_text: "first\n\tInt x = \"oops\"   \nthird".to_string(),
        version: Some("1.1".to_string()),
    }
}

fn texts(report: &ErrorReport) -> Vec<&str> {
    report.lines.iter().map(|l| l.text.as_str()).collect()
}

#[test]
fn validation_error_shows_caret_under_span() {
    let err = DocumentError::Validation {
        at: at(2, 10, 2, 16),
        message: "bad literal".to_string(),
    };
    let report = render(&err);
    assert_eq!(
        texts(&report),
        vec![
            "(main.json Ln 2 Col 10) bad literal",
            "     Int x = \"oops\"   ",
            "             ^^^^^^",
        ]
    );
    assert!(report.lines[0].headline);
    assert!(!report.lines[1].headline);
    assert!(!report.quant_hint);
    assert!(!report.version_hint);
}

#[test]
fn multiline_span_trims_trailing_spaces() {
    let err = DocumentError::Syntax {
        at: at(2, 10, 3, 2),
        message: "unterminated".to_string(),
    };
    let report = render(&err);
    assert_eq!(report.lines[2].text, "             ^^^^^^");
}

#[test]
fn type_mismatch_sets_quant_hint_only_when_relaxing_helps() {
    let err = DocumentError::TypeMismatch {
        at: at(1, 1, 1, 6),
        expected: Type::array(Type::file(), false),
        actual: Type::file(),
    };
    assert!(render(&err).quant_hint);

    let err = DocumentError::TypeMismatch {
        at: at(1, 1, 1, 6),
        expected: Type::int(),
        actual: Type::string(),
    };
    assert!(!render(&err).quant_hint);
}

#[test]
fn import_error_renders_cause_and_multiple_expands() {
    let err = DocumentError::Multiple(vec![
        DocumentError::Import {
            at: at(1, 1, 1, 6),
            import: "lib.json".to_string(),
            cause: Box::new(DocumentError::NotFound("lib.json".to_string())),
        },
        DocumentError::Permission("denied".to_string()),
    ]);
    let report = render(&err);
    assert_eq!(
        texts(&report),
        vec![
            "(main.json Ln 1 Col 1) Failed to import lib.json",
            "File not found: lib.json",
            "denied",
        ]
    );
}

#[test]
fn version_hint_when_document_declares_none() {
    let mut unversioned = at(1, 1, 1, 2);
    unversioned.version = None;
    let syntax = DocumentError::Syntax {
        at: unversioned.clone(),
        message: "unexpected token".to_string(),
    };
    assert!(render(&syntax).version_hint);

    let multiple = DocumentError::Multiple(vec![DocumentError::Validation {
        at: unversioned.clone(),
        message: "Unknown type Foo".to_string(),
    }]);
    assert!(render(&multiple).version_hint);

    let import = DocumentError::Import {
        at: unversioned,
        import: "lib.json".to_string(),
        cause: Box::new(DocumentError::NotFound("lib.json".to_string())),
    };
    assert!(!render(&import).version_hint);
}

#[test]
fn error_names_for_reports() {
    let syntax = DocumentError::Syntax {
        at: at(1, 1, 1, 2),
        message: "unexpected token".to_string(),
    };
    assert_eq!(syntax.name(), "SyntaxError");
    assert_eq!(DocumentError::NotFound("x".into()).name(), "FileNotFoundError");
    assert_eq!(DocumentError::Multiple(vec![]).name(), "MultipleValidationErrors");
}
