// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coercion of command-line text to typed values

use crate::path::PathPolicy;
use wr_core::{InputError, Type, TypeKind, Value};

/// Convert the text of a `name=value` token to a value of `ty`.
///
/// File and Directory values, including those nested inside compound
/// values given as JSON, are authorized through `policy`.
pub fn coerce_cli(text: &str, ty: &Type, policy: &PathPolicy) -> Result<Value, InputError> {
    match &ty.kind {
        TypeKind::String => Ok(Value::String(text.to_string())),
        TypeKind::File => Ok(Value::File(validate_path(policy, text, false)?)),
        TypeKind::Directory => Ok(Value::Directory(validate_path(policy, text, true)?)),
        TypeKind::Boolean => match text {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            _ => Err(InputError::Boolean(text.to_string())),
        },
        TypeKind::Int => text
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| number_error(ty, text)),
        TypeKind::Float => text
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| number_error(ty, text)),
        TypeKind::Array { item, .. }
            if matches!(
                item.kind,
                TypeKind::String
                    | TypeKind::File
                    | TypeKind::Directory
                    | TypeKind::Int
                    | TypeKind::Float
            ) =>
        {
            Ok(Value::Array(vec![coerce_cli(text, item, policy)?]))
        }
        TypeKind::Map { .. } | TypeKind::Pair { .. } | TypeKind::Struct { .. } => {
            let json: serde_json::Value =
                serde_json::from_str(text).map_err(|e| InputError::InvalidJson {
                    ty: ty.to_string(),
                    reason: e.to_string(),
                })?;
            let value = Value::from_json(ty, &json).map_err(|source| InputError::Coercion {
                ty: ty.to_string(),
                source,
            })?;
            value.rewrite_paths(&mut |path, directory| validate_path(policy, path, directory))
        }
        TypeKind::Any => Ok(infer_any(text)),
        TypeKind::Array { .. } => Err(InputError::Unsupported(ty.to_string())),
    }
}

/// Value of an untyped override: integer, else finite float, else string
pub fn infer_any(text: &str) -> Value {
    if let Ok(i) = text.parse::<i64>() {
        return Value::Int(i);
    }
    if let Some(f) = text.parse::<f64>().ok().filter(|f| f.is_finite()) {
        return Value::Float(f);
    }
    Value::String(text.to_string())
}

/// Replace a leading `~` or `~/` with the home directory
pub fn expand_tilde(path: &str) -> String {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return path.to_string(),
    };
    match dirs::home_dir() {
        Some(home) => format!("{}{}", home.to_string_lossy(), rest),
        None => path.to_string(),
    }
}

fn validate_path(policy: &PathPolicy, path: &str, directory: bool) -> Result<String, InputError> {
    policy.validate(&expand_tilde(path), directory)
}

fn number_error(ty: &Type, text: &str) -> InputError {
    InputError::Number {
        ty: ty.to_string(),
        text: text.to_string(),
    }
}

#[cfg(test)]
#[path = "coerce_tests.rs"]
mod tests;
