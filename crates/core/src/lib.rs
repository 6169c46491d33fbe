// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Core types for the wr workflow runner

pub mod document;
mod env;
mod error;
mod lint;
pub mod paths;
mod types;
mod value;

pub use document::{
    calls, Call, Conditional, Decl, Document, Executable, Import, Scatter, SourcePosition, Task,
    Workflow, WorkflowNode, RUNTIME_INPUT,
};
pub use env::Bindings;
pub use error::InputError;
pub use lint::{Finding, Linted, Severity, SeverityParseError};
pub use types::{Type, TypeKind, TypeParseError};
pub use value::{Value, ValueError};
