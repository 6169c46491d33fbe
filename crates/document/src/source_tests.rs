// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn write(dir: &Path, rel: &str, text: &str) -> PathBuf {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, text).unwrap();
    path
}

#[tokio::test]
async fn reads_relative_to_importer_before_search_path() {
    let tmp = TempDir::new().unwrap();
    let main = write(tmp.path(), "main/doc.json", "{}");
    write(tmp.path(), "main/lib.json", "near");
    write(tmp.path(), "search/lib.json", "far");

    let ans = FileSourceReader
        .read(
            "lib.json",
            &[tmp.path().join("search")],
            Some(main.to_str().unwrap()),
        )
        .await
        .unwrap();
    assert_eq!(ans.text, "near");
    assert!(ans.abspath.ends_with("main/lib.json"));

    let ans = FileSourceReader
        .read("lib.json", &[tmp.path().join("search")], None)
        .await
        .unwrap();
    assert_eq!(ans.text, "far");
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let err = FileSourceReader
        .read("/definitely/not/here.json", &[], None)
        .await
        .unwrap_err();
    assert!(matches!(err, DocumentError::NotFound(_)));
}

#[tokio::test]
async fn outside_imports_denied_when_requested() {
    let tmp = TempDir::new().unwrap();
    let main = write(tmp.path(), "main/doc.json", "{}");
    let outside = write(tmp.path(), "other/lib.json", "{}");

    let reader = CliSourceReader::new(true);
    reader
        .read(main.to_str().unwrap(), &[], None)
        .await
        .unwrap();
    let err = reader
        .read(outside.to_str().unwrap(), &[], Some(main.to_str().unwrap()))
        .await
        .unwrap_err();
    assert!(err
        .to_string()
        .starts_with("denied import from outside main WDL file's directory"));

    // allowed once its directory is on the search path
    reader
        .read(
            outside.to_str().unwrap(),
            &[tmp.path().join("other")],
            Some(main.to_str().unwrap()),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn absolute_import_from_remote_document_denied() {
    let reader = CliSourceReader::new(false);
    let err = reader
        .read("/etc/passwd", &[], Some("https://example.com/wf/main.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, DocumentError::Permission(_)));
}
