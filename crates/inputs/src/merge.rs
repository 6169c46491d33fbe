// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Merging JSON and command-line inputs into one environment

use crate::coerce::coerce_cli;
use crate::path::PathPolicy;
use crate::source::{bindings_from_json, read_input_json};
use crate::target::resolve_target;
use serde_json::{Map, Value as Json};
use std::collections::HashSet;
use wr_core::{Bindings, Decl, Document, Executable, InputError, TypeKind, Value, RUNTIME_INPUT};
use wr_document::SourceReader;

/// Inputs given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliInputs {
    /// `name=value` tokens, in order
    pub tokens: Vec<String>,
    /// Names to bind to an empty array or string
    pub empty: Vec<String>,
    /// Names to bind to null
    pub none: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedInputs {
    pub env: Bindings<Value>,
    /// Cromwell-style input object
    pub json: Map<String, Json>,
}

/// Resolve the target and assemble its inputs from `--input` and the
/// command line
pub async fn resolve_inputs<'a>(
    doc: &'a Document,
    task: Option<&str>,
    input_file: Option<&str>,
    cli: &CliInputs,
    policy: &PathPolicy,
    reader: &dyn SourceReader,
    check_required: bool,
) -> Result<(Executable<'a>, MergedInputs), InputError> {
    let target = resolve_target(doc, task)?;
    let json_env = match input_file.map(str::trim).filter(|f| !f.is_empty()) {
        Some(spec) => {
            let obj = read_input_json(spec, reader).await?;
            bindings_from_json(&obj, &target.available_inputs(), Some(target.name()), policy)?
        }
        None => Bindings::new(),
    };
    let merged = merge_inputs(&target, json_env, cli, policy, check_required)?;
    Ok((target, merged))
}

/// Layer the command-line inputs over `json_env`.
///
/// A command-line value replaces a JSON value of the same name. A name
/// repeated on the command line accumulates when it is an array and is an
/// error otherwise.
pub fn merge_inputs(
    target: &Executable<'_>,
    json_env: Bindings<Value>,
    cli: &CliInputs,
    policy: &PathPolicy,
    check_required: bool,
) -> Result<MergedInputs, InputError> {
    let available = target.available_inputs();
    let no_such_input = |name: &str| InputError::NoSuchInput {
        target: target.name().to_string(),
        name: name.to_string(),
    };
    let mut json_keys: HashSet<String> = json_env.names().map(str::to_string).collect();
    let mut env = json_env;

    for name in &cli.empty {
        let decl = available.get(name).ok_or_else(|| no_such_input(name))?;
        let value = match &decl.ty.kind {
            TypeKind::Array { nonempty: true, .. } => {
                return Err(InputError::EmptyNonempty {
                    ty: decl.ty.to_string(),
                    name: decl.name.clone(),
                })
            }
            TypeKind::Array { .. } => Value::Array(Vec::new()),
            TypeKind::String => Value::String(String::new()),
            _ => {
                return Err(InputError::NotEmptiable {
                    ty: decl.ty.to_string(),
                    name: decl.name.clone(),
                    optional: decl.ty.optional,
                })
            }
        };
        env.bind(name.as_str(), value);
    }

    for name in &cli.none {
        let decl = available.get(name).ok_or_else(|| no_such_input(name))?;
        if !decl.ty.optional {
            return Err(InputError::NotOptional {
                ty: decl.ty.to_string(),
                name: decl.name.clone(),
            });
        }
        env.bind(name.as_str(), Value::Null);
    }

    for token in reassemble_tokens(&cli.tokens) {
        let (name, text) = split_token(&token)?;
        let decl = lookup(&available, name).ok_or_else(|| no_such_input(name))?;
        let value = coerce_cli(text, &decl.ty, policy)?;

        if env.contains(name) && !json_keys.contains(name) {
            match (env.get_mut(name), value) {
                (Some(Value::Array(items)), Value::Array(more)) => items.extend(more),
                _ => return Err(InputError::Duplicated(name.to_string())),
            }
        } else {
            env.bind(name, value);
            json_keys.remove(name);
        }
    }

    if check_required {
        let missing: Vec<String> = target
            .required_inputs()
            .subtract(&env)
            .names()
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(InputError::Missing {
                target: target.name().to_string(),
                names: missing,
            });
        }
    }

    let namespace = target.is_workflow().then(|| target.name());
    let json = env.to_json(namespace);
    Ok(MergedInputs { env, json })
}

/// Join a token ending in its only `=` with the token after it, so
/// `x= file.txt` reads as `x=file.txt`
pub fn reassemble_tokens(tokens: &[String]) -> Vec<String> {
    let mut ans = Vec::with_capacity(tokens.len());
    let mut iter = tokens.iter().peekable();
    while let Some(token) = iter.next() {
        let joins = token.len() > 1 && token.find('=') == Some(token.len() - 1);
        match iter.peek() {
            Some(next) if joins => {
                ans.push(format!("{}{}", token, next));
                iter.next();
            }
            _ => ans.push(token.clone()),
        }
    }
    ans
}

fn split_token(token: &str) -> Result<(&str, &str), InputError> {
    let leading_alpha = token.chars().next().is_some_and(char::is_alphabetic);
    match token.split_once('=') {
        Some((name, text)) if leading_alpha && !name.is_empty() => Ok((name, text)),
        _ => Err(InputError::InvalidPair(token.to_string())),
    }
}

fn lookup<'a>(available: &'a Bindings<Decl>, name: &str) -> Option<&'a Decl> {
    available
        .get(name)
        .or_else(|| runtime_override_target(name).and_then(|remapped| available.get(&remapped)))
}

/// Name of the `_runtime` input receiving an override like
/// `call.runtime.docker`: everything from the first `runtime` segment on is
/// replaced, provided at least one segment follows it.
pub fn runtime_override_target(name: &str) -> Option<String> {
    let parts: Vec<&str> = name.split('.').collect();
    let idx = parts.iter().position(|part| *part == "runtime")?;
    if idx + 1 >= parts.len() {
        return None;
    }
    let mut ans: Vec<&str> = parts[..idx].to_vec();
    ans.push(RUNTIME_INPUT);
    Some(ans.join("."))
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
