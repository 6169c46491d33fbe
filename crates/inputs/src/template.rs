// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Skeleton input JSON for a target

use serde_json::{json, Map, Value as Json};
use wr_core::{Executable, Type, TypeKind};

#[allow(clippy::approx_constant)]
pub(crate) const FLOAT_PLACEHOLDER: f64 = 3.14;

/// Placeholder values for the target's required inputs, keyed with the
/// workflow name unless `namespace` is false
pub fn input_template(target: &Executable<'_>, namespace: bool) -> Map<String, Json> {
    let prefix = if target.is_workflow() && namespace {
        format!("{}.", target.name())
    } else {
        String::new()
    };
    target
        .required_inputs()
        .iter()
        .map(|(name, decl)| (format!("{}{}", prefix, name), type_template(&decl.ty)))
        .collect()
}

/// Placeholder value of type `ty`, recursing into compound types.
/// Optional struct members are left out.
pub fn type_template(ty: &Type) -> Json {
    match &ty.kind {
        TypeKind::Struct { members, .. } => Json::Object(
            members
                .iter()
                .filter(|(_, member)| !member.optional)
                .map(|(name, member)| (name.clone(), type_template(member)))
                .collect(),
        ),
        TypeKind::Array { item, .. } => json!([type_template(item)]),
        TypeKind::Map { key, value } => {
            let mut ans = Map::new();
            ans.insert(key.to_string(), type_template(value));
            Json::Object(ans)
        }
        TypeKind::Pair { left, right } => {
            json!({"left": type_template(left), "right": type_template(right)})
        }
        TypeKind::Int => json!(42),
        TypeKind::Float => json!(FLOAT_PLACEHOLDER),
        TypeKind::Boolean => json!(false),
        _ => Json::String(ty.to_string()),
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
