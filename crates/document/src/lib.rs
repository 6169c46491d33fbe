// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Document loading, outlining and error rendering

mod archive;
mod error;
mod loader;
mod outline;
mod render;
mod source;

pub use archive::copy_source;
pub use error::{DocumentError, Located};
pub use loader::{DocumentLoader, JsonDocumentLoader};
pub use outline::{outline, LintTrigger, OutlineOptions, OutlineReport};
pub use render::{render, ErrorReport, ReportLine};
pub use source::{is_remote, CliSourceReader, FileSourceReader, SourceReader, SourceText};
