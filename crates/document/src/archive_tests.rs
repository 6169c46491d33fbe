// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;
use wr_core::Import;

fn doc(abspath: &str, text: &str) -> Document {
    Document {
        abspath: abspath.to_string(),
        source_text: text.to_string(),
        ..Default::default()
    }
}

fn import(namespace: &str, imported: Document) -> Import {
    Import {
        namespace: namespace.to_string(),
        uri: imported.abspath.clone(),
        pos: Default::default(),
        doc: Some(Box::new(imported)),
    }
}

#[test]
fn keeps_relative_layout_of_local_imports() {
    let tmp = TempDir::new().unwrap();
    let mut main = doc("/src/wf/main.json", "main");
    let mut lib = doc("/src/lib/lib.json", "lib");
    lib.imports.push(import("util", doc("/src/wf/util.json", "util")));
    main.imports.push(import("lib", lib));
    main.imports
        .push(import("remote", doc("https://example.com/x/remote.json", "remote")));

    let out = tmp.path().join("wdl");
    copy_source(&main, &out).unwrap();

    assert_eq!(std::fs::read_to_string(out.join("wf/main.json")).unwrap(), "main");
    assert_eq!(std::fs::read_to_string(out.join("lib/lib.json")).unwrap(), "lib");
    assert_eq!(std::fs::read_to_string(out.join("wf/util.json")).unwrap(), "util");
    assert_eq!(
        std::fs::read_to_string(out.join("remote.json")).unwrap(),
        "remote"
    );
}

#[test]
fn single_document_lands_by_file_name() {
    let tmp = TempDir::new().unwrap();
    let main = doc("/src/wf/main.json", "main");
    let written = copy_source(&main, tmp.path()).unwrap();
    assert_eq!(written, vec![tmp.path().join("main.json")]);
}
