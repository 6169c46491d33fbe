// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wr check <uri>...` - Outline documents with their lint findings

use super::{load_document, CommonArgs};
use anyhow::Result;
use clap::Args;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use wr_core::Severity;
use wr_document::{outline, OutlineOptions, OutlineReport};
use wr_engine::RunConfig;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Documents to check
    #[arg(required = true, value_name = "URI")]
    pub uri: Vec<String>,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Exit with nonzero status if any lint findings are shown
    #[arg(long)]
    pub strict: bool,

    /// Show lint findings even where suppressed inline
    #[arg(long = "no-suppress")]
    pub show_all: bool,

    /// Comma-separated lint finding classes to hide
    #[arg(long, value_name = "CLASSES")]
    pub suppress: Option<String>,

    /// Hide CommandShellCheck findings
    #[arg(long)]
    pub no_shellcheck: bool,

    /// Exit with nonzero status if any shown finding has at least this
    /// severity (MINOR, MODERATE, MAJOR, CRITICAL)
    #[arg(long, value_name = "SEVERITY")]
    pub exit_on_lint_severity: Option<String>,

    /// Configuration file supplying `lint.exit_on_severity`
    #[arg(long, value_name = "FILE")]
    pub cfg: Option<PathBuf>,
}

impl CheckArgs {
    fn suppress(&self) -> HashSet<String> {
        let mut ans: HashSet<String> = self
            .suppress
            .iter()
            .flat_map(|s| s.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if self.no_shellcheck {
            ans.insert("CommandShellCheck".into());
        }
        ans
    }

    /// The severity threshold from the command line or the configuration
    fn exit_on_severity(&self) -> Result<Option<Severity>> {
        let configured;
        let text = match &self.exit_on_lint_severity {
            Some(text) => Some(text.as_str()),
            None => {
                configured = RunConfig::discover(self.cfg.as_deref())
                    .map_err(crate::error::CliError::from)?
                    .0;
                configured.lint_exit_on_severity()
            }
        };
        Ok(text.and_then(parse_severity))
    }
}

fn parse_severity(text: &str) -> Option<Severity> {
    match text.parse() {
        Ok(severity) => Some(severity),
        Err(_) => {
            eprintln!("Warning: Invalid severity level '{}', ignoring", text);
            None
        }
    }
}

pub async fn check(args: CheckArgs) -> Result<i32> {
    let mut options = OutlineOptions {
        suppress: args.suppress(),
        show_all: args.show_all,
        show_called: false,
        exit_on_severity: args.exit_on_severity()?,
    };

    let mut report = OutlineReport::default();
    for uri in &args.uri {
        let doc = load_document(uri, &args.common).await?;
        options.show_called = doc.workflow.is_some();
        report.lines.push(basename(uri));
        outline(&doc, &options, &mut report);
        for line in report.lines.drain(..) {
            println!("{}", line);
        }
    }

    match report.verdict(args.strict) {
        Ok(()) => Ok(0),
        Err(reason) => {
            if let Some(trigger) = &report.trigger {
                tracing::debug!(reason = %trigger.reason, "lint threshold reached");
            }
            eprintln!("Error: {}", reason);
            Ok(2)
        }
    }
}

fn basename(uri: &str) -> String {
    Path::new(uri)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| uri.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: CheckArgs,
    }

    #[test]
    fn suppress_set_includes_shellcheck() {
        let w = Wrapper::parse_from([
            "wr",
            "a.wdl",
            "--suppress",
            "UnusedDeclaration,StringCoercion",
            "--no-shellcheck",
        ]);
        let suppress = w.args.suppress();
        assert!(suppress.contains("UnusedDeclaration"));
        assert!(suppress.contains("StringCoercion"));
        assert!(suppress.contains("CommandShellCheck"));
    }

    #[test]
    fn explicit_severity_overrides_config() {
        let w = Wrapper::parse_from(["wr", "a.wdl", "--exit-on-lint-severity", "major"]);
        assert_eq!(w.args.exit_on_severity().unwrap(), Some(Severity::Major));
    }

    #[test]
    fn invalid_severity_ignored() {
        assert_eq!(parse_severity("SEVERE"), None);
    }

    #[test]
    fn basename_of_path_and_url() {
        assert_eq!(basename("/work/hello.wdl"), "hello.wdl");
        assert_eq!(basename("https://example.com/wdl/hello.wdl"), "hello.wdl");
    }
}
