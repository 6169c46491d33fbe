// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Input resolution: target selection, value coercion, path policy and the
//! merge of JSON and command-line inputs

mod coerce;
mod complete;
mod help;
mod merge;
mod path;
mod source;
mod target;
mod template;

pub use coerce::{coerce_cli, expand_tilde, infer_any};
pub use complete::complete_input_names;
pub use help::{is_constant_expr, usage};
pub use merge::{
    merge_inputs, reassemble_tokens, resolve_inputs, runtime_override_target, CliInputs,
    MergedInputs,
};
pub use path::PathPolicy;
pub use source::{bindings_from_json, read_input_json};
pub use target::resolve_target;
pub use template::{input_template, type_template};
