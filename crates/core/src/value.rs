// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed values bound to parameters

use crate::types::{Type, TypeKind};
use indexmap::IndexMap;
use serde_json::Value as Json;
use thiserror::Error;

/// Errors coercing JSON into a declared type
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("cannot coerce {found} to {expected}")]
    Mismatch { expected: String, found: String },

    #[error("empty array for non-empty type {0}")]
    EmptyArray(String),

    #[error("missing member `{member}' of {ty}")]
    MissingMember { ty: String, member: String },

    #[error("unknown member `{member}' of {ty}")]
    UnknownMember { ty: String, member: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
    File(String),
    Directory(String),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Pair(Box<Value>, Box<Value>),
    Struct(IndexMap<String, Value>),
}

fn mismatch(ty: &Type, json: &Json) -> ValueError {
    let mut found = json.to_string();
    if found.chars().count() > 60 {
        found = found.chars().take(57).collect();
        found.push_str("...");
    }
    ValueError::Mismatch {
        expected: ty.to_string(),
        found,
    }
}

impl Value {
    /// Coerce a decoded JSON value to the declared type
    pub fn from_json(ty: &Type, json: &Json) -> Result<Value, ValueError> {
        if json.is_null() {
            if ty.optional || matches!(ty.kind, TypeKind::Any) {
                return Ok(Value::Null);
            }
            return Err(mismatch(ty, json));
        }
        match (&ty.kind, json) {
            (TypeKind::Any, _) => Ok(Value::infer_json(json)),
            (TypeKind::Boolean, Json::Bool(b)) => Ok(Value::Boolean(*b)),
            (TypeKind::Int, Json::Number(n)) => {
                n.as_i64().map(Value::Int).ok_or_else(|| mismatch(ty, json))
            }
            (TypeKind::Float, Json::Number(n)) => {
                n.as_f64().map(Value::Float).ok_or_else(|| mismatch(ty, json))
            }
            (TypeKind::String, Json::String(s)) => Ok(Value::String(s.clone())),
            (TypeKind::File, Json::String(s)) => Ok(Value::File(s.clone())),
            (TypeKind::Directory, Json::String(s)) => Ok(Value::Directory(s.clone())),
            (TypeKind::Array { item, nonempty }, Json::Array(items)) => {
                if *nonempty && items.is_empty() {
                    return Err(ValueError::EmptyArray(ty.to_string()));
                }
                items
                    .iter()
                    .map(|v| Value::from_json(item, v))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            (TypeKind::Map { key, value }, Json::Object(obj)) => obj
                .iter()
                .map(|(k, v)| Ok((Value::key_from_str(key, k)?, Value::from_json(value, v)?)))
                .collect::<Result<Vec<_>, ValueError>>()
                .map(Value::Map),
            (TypeKind::Pair { left, right }, Json::Object(obj)) if obj.len() == 2 => {
                match (obj.get("left"), obj.get("right")) {
                    (Some(l), Some(r)) => Ok(Value::Pair(
                        Box::new(Value::from_json(left, l)?),
                        Box::new(Value::from_json(right, r)?),
                    )),
                    _ => Err(mismatch(ty, json)),
                }
            }
            (TypeKind::Struct { members, .. }, Json::Object(obj)) => {
                if let Some(unknown) = obj.keys().find(|k| !members.iter().any(|(m, _)| m == *k)) {
                    return Err(ValueError::UnknownMember {
                        ty: ty.to_string(),
                        member: unknown.clone(),
                    });
                }
                let mut fields = IndexMap::new();
                for (member, member_ty) in members {
                    let value = match obj.get(member) {
                        Some(v) => Value::from_json(member_ty, v)?,
                        None if member_ty.optional => Value::Null,
                        None => {
                            return Err(ValueError::MissingMember {
                                ty: ty.to_string(),
                                member: member.clone(),
                            })
                        }
                    };
                    fields.insert(member.clone(), value);
                }
                Ok(Value::Struct(fields))
            }
            _ => Err(mismatch(ty, json)),
        }
    }

    fn key_from_str(ty: &Type, key: &str) -> Result<Value, ValueError> {
        let bad = || mismatch(ty, &Json::String(key.to_string()));
        match ty.kind {
            TypeKind::String | TypeKind::Any => Ok(Value::String(key.to_string())),
            TypeKind::File => Ok(Value::File(key.to_string())),
            TypeKind::Directory => Ok(Value::Directory(key.to_string())),
            TypeKind::Int => key.parse().map(Value::Int).map_err(|_| bad()),
            TypeKind::Float => key.parse().map(Value::Float).map_err(|_| bad()),
            TypeKind::Boolean => match key {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                _ => Err(bad()),
            },
            _ => Err(bad()),
        }
    }

    /// Value for JSON of unknown declared type, following its shape
    pub fn infer_json(json: &Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Boolean(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::String(s.clone()),
            Json::Array(items) => Value::Array(items.iter().map(Value::infer_json).collect()),
            Json::Object(obj) => Value::Struct(
                obj.iter()
                    .map(|(k, v)| (k.clone(), Value::infer_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Boolean(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(s) | Value::File(s) | Value::Directory(s) => Json::String(s.clone()),
            Value::Array(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.key_text(), v.to_json()))
                    .collect(),
            ),
            Value::Pair(left, right) => {
                serde_json::json!({ "left": left.to_json(), "right": right.to_json() })
            }
            Value::Struct(fields) => Json::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    fn key_text(&self) -> String {
        match self {
            Value::String(s) | Value::File(s) | Value::Directory(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Boolean(b) => b.to_string(),
            other => other.to_json().to_string(),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Apply `f(path, is_directory)` to every File and Directory value,
    /// recursing into compound values.
    pub fn rewrite_paths<E, F>(self, f: &mut F) -> Result<Value, E>
    where
        F: FnMut(&str, bool) -> Result<String, E>,
    {
        Ok(match self {
            Value::File(path) => Value::File(f(&path, false)?),
            Value::Directory(path) => Value::Directory(f(&path, true)?),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|v| v.rewrite_paths(f))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Map(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| Ok((k.rewrite_paths(f)?, v.rewrite_paths(f)?)))
                    .collect::<Result<_, E>>()?,
            ),
            Value::Pair(left, right) => Value::Pair(
                Box::new(left.rewrite_paths(f)?),
                Box::new(right.rewrite_paths(f)?),
            ),
            Value::Struct(fields) => Value::Struct(
                fields
                    .into_iter()
                    .map(|(k, v)| Ok((k, v.rewrite_paths(f)?)))
                    .collect::<Result<_, E>>()?,
            ),
            other => other,
        })
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
