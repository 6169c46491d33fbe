// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Configuration, engine seam and run orchestration

pub mod config;
mod engine;
mod error;
mod failure;
mod process;
mod rerun;
mod runner;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use config::{ConfigOverrides, RunConfig};
pub use engine::{CacheHandle, Engine, RunFailure, RunSuccess, RunTarget};
pub use error::{ConfigError, EngineError};
pub use failure::{classify, FailureKind, FailureRecord, FailureReport};
pub use process::{new_run_dir, ProcessEngine, ERROR_FILE, OUTPUTS_FILE};
pub use rerun::{rerun_script, shell_quote};
pub use runner::{run_target, RunOutcome, RunRequest};
pub use self_test::{run_self_test, SELF_TEST_WORKFLOW};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use fake::{EngineCall, FakeEngine};
