//! Shared fixtures for the specs: a scratch project directory, typed
//! document fixtures, and a fluent wrapper over the `wr` binary.

#![allow(dead_code)]

pub use predicates::prelude::*;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;

/// The `wr` binary, built once per test run. It belongs to another
/// package, so cargo does not build it for this test target.
pub fn wr_bin() -> &'static Path {
    static BIN: OnceLock<PathBuf> = OnceLock::new();
    BIN.get_or_init(|| {
        let exe = std::env::current_exe().unwrap();
        // <target>/<profile>/deps/specs-<hash>
        let profile_dir = exe.parent().and_then(Path::parent).unwrap().to_path_buf();
        let target_dir = profile_dir.parent().unwrap();
        let cargo = std::env::var_os("CARGO").unwrap_or_else(|| "cargo".into());
        let mut build = std::process::Command::new(cargo);
        build
            .args(["build", "--quiet", "-p", "wr", "--bin", "wr"])
            .current_dir(env!("CARGO_MANIFEST_DIR"))
            .env("CARGO_TARGET_DIR", target_dir);
        if profile_dir.ends_with("release") {
            build.arg("--release");
        }
        let status = build.status().unwrap();
        assert!(status.success(), "building wr failed: {}", status);
        let bin = profile_dir.join(format!("wr{}", std::env::consts::EXE_SUFFIX));
        assert!(bin.is_file(), "no wr binary at {}", bin.display());
        bin
    })
}

/// Workflow with one required String and one optional Int input
pub const HELLO_WORKFLOW: &str = r#"{
  "version": "1.1",
  "workflow": {
    "name": "hello",
    "inputs": [
      {"name": "who", "type": "String"},
      {"name": "times", "type": "Int", "expr": "1"}
    ],
    "body": [{"kind": "call", "callee": "greet", "inputs": ["who"]}],
    "outputs": [{"name": "message", "type": "String"}]
  },
  "tasks": [
    {"name": "greet",
     "inputs": [{"name": "who", "type": "String"}, {"name": "files", "type": "Array[File]", "expr": "[]"}],
     "outputs": [{"name": "out", "type": "String"}]}
  ]
}"#;

/// Two tasks, no workflow
pub const TWO_TASKS: &str = r#"{
  "version": "1.1",
  "tasks": [
    {"name": "a", "inputs": [{"name": "x", "type": "Int"}]},
    {"name": "b", "inputs": [{"name": "y", "type": "Map[String,Int]"}]}
  ]
}"#;

/// A scratch directory holding fixtures
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `rel`, creating parent directories
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Write an executable shell script to `rel`
    pub fn script(&self, rel: &str, body: &str) -> PathBuf {
        let path = self.file(rel, &format!("#!/bin/sh\n{}\n", body));
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Configuration rooted at this project whose engine is `script`
    pub fn config_with_engine(&self, script: &Path) -> PathBuf {
        self.file(
            "wr.toml",
            &format!(
                "[file_io]\nroot = \"{}\"\n\n[engine]\ncommand = \"{}\"\n",
                self.path().display(),
                script.display()
            ),
        )
    }

    /// `wr` run from the project directory, with no ambient configuration
    pub fn wr(&self) -> Wr {
        let mut cmd = assert_cmd::Command::new(wr_bin());
        cmd.current_dir(self.path())
            .env_remove("WR_CFG")
            .env_remove("WR__LOGGING__JSON")
            .env_remove("RUST_LOG")
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env("NO_COLOR", "1");
        Wr { cmd }
    }
}

pub struct Wr {
    cmd: assert_cmd::Command,
}

impl Wr {
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        self.cmd.args(args);
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.cmd.write_stdin(input.to_string());
        self
    }

    pub fn passes(mut self) -> Outcome {
        Outcome(self.cmd.assert().success())
    }

    pub fn exits(mut self, code: i32) -> Outcome {
        Outcome(self.cmd.assert().code(code))
    }
}

pub struct Outcome(assert_cmd::assert::Assert);

impl Outcome {
    pub fn stdout_has(self, text: &str) -> Self {
        Self(self.0.stdout(predicate::str::contains(text)))
    }

    pub fn stdout_lacks(self, text: &str) -> Self {
        Self(self.0.stdout(predicate::str::contains(text).not()))
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        let actual = String::from_utf8_lossy(&self.0.get_output().stdout).into_owned();
        similar_asserts::assert_eq!(actual, expected);
        self
    }

    pub fn stderr_has(self, text: &str) -> Self {
        Self(self.0.stderr(predicate::str::contains(text)))
    }

    pub fn stderr_lacks(self, text: &str) -> Self {
        Self(self.0.stderr(predicate::str::contains(text).not()))
    }

    pub fn stdout_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.0.get_output().stdout).unwrap()
    }
}
