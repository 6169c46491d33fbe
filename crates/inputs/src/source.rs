// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The JSON input source given with `--input`

use crate::path::PathPolicy;
use serde_json::{Map, Value as Json};
use tokio::io::AsyncReadExt;
use wr_core::{Bindings, Decl, InputError, Value};
use wr_document::SourceReader;

/// Read the JSON object named by `spec`: a literal object when it starts
/// with `{`, standard input for `-`, otherwise a file or URL read through
/// `reader`.
pub async fn read_input_json(
    spec: &str,
    reader: &dyn SourceReader,
) -> Result<Map<String, Json>, InputError> {
    let spec = spec.trim();
    let text = if spec.starts_with('{') {
        spec.to_string()
    } else if spec == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .map_err(|e| InputError::Read {
                uri: "-".into(),
                reason: e.to_string(),
            })?;
        buf
    } else {
        reader
            .read(spec, &[], None)
            .await
            .map_err(|e| InputError::Read {
                uri: spec.to_string(),
                reason: e.to_string(),
            })?
            .text
    };
    match serde_json::from_str(&text) {
        Ok(Json::Object(obj)) => Ok(obj),
        Ok(_) => Err(InputError::Json("expected top-level object".into())),
        Err(e) => Err(InputError::Json(e.to_string())),
    }
}

/// Coerce each entry of a JSON input object against the available inputs.
///
/// Keys beginning with `#` are comments. Keys may carry the target name as
/// a prefix. File and Directory values are authorized through `policy`.
pub fn bindings_from_json(
    obj: &Map<String, Json>,
    available: &Bindings<Decl>,
    namespace: Option<&str>,
    policy: &PathPolicy,
) -> Result<Bindings<Value>, InputError> {
    let mut ans = Bindings::new();
    for (key, json) in obj {
        if key.starts_with('#') {
            continue;
        }
        let name = namespace
            .and_then(|ns| key.strip_prefix(ns))
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(key);
        let decl = available
            .get(name)
            .ok_or_else(|| InputError::Json(format!("unknown input/output: {}", key)))?;
        let value = Value::from_json(&decl.ty, json)
            .map_err(|e| InputError::Json(format!("{}: {}", key, e)))?;
        let value =
            value.rewrite_paths(&mut |path, directory| policy.validate(path, directory))?;
        ans.bind(name, value);
    }
    tracing::debug!(count = ans.len(), "inputs from JSON");
    Ok(ans)
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
