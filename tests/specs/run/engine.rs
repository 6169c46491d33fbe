//! Run specs against a scripted engine
//!
//! The engine is a shell script configured through `--cfg`; its last
//! argument is the run directory.

use crate::prelude::*;
use serde_json::json;

const SUCCEEDS: &str = r#"for a; do dir=$a; done
echo '{"message": "hello world"}' > "$dir/outputs.json""#;

const COMMAND_FAILS: &str = r#"for a; do dir=$a; done
cat > "$dir/error.json" <<JSON
{"error": "RunFailed", "message": "workflow hello failed", "dir": "$dir",
 "cause": {"error": "RunFailed", "message": "task greet failed", "dir": "$dir/call-greet",
  "cause": {"error": "CommandFailed", "message": "task command failed with exit status 3",
   "exit_status": 3}}}
JSON
exit 1"#;

fn project(engine: &str) -> Project {
    let temp = Project::empty();
    temp.file("hello.json", HELLO_WORKFLOW);
    let script = temp.script("engine.sh", engine);
    temp.config_with_engine(&script);
    temp
}

fn run_args(extra: &[&str]) -> Vec<String> {
    ["run", "hello.json", "who=world", "--cfg", "wr.toml"]
        .iter()
        .chain(extra)
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn success_prints_qualified_outputs_and_dir() {
    let temp = project(SUCCEEDS);
    let dir = temp.path().join("out");

    let out = temp.wr().args(run_args(&["-d", "out/."])).passes();
    assert_eq!(
        out.stdout_json(),
        json!({"outputs": {"hello.message": "hello world"}, "dir": dir.to_string_lossy()})
    );
}

#[test]
fn run_directory_keeps_inputs_rerun_and_source() {
    let temp = project(SUCCEEDS);

    temp.wr().args(run_args(&["-d", "out/."])).passes();

    let dir = temp.path().join("out");
    let inputs: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("inputs.json")).unwrap()).unwrap();
    assert_eq!(inputs["who"], "world");
    let rerun = std::fs::read_to_string(dir.join("rerun")).unwrap();
    assert!(rerun.starts_with("pushd "), "{}", rerun);
    assert!(
        rerun.contains("&& wr run hello.json who=world --cfg wr.toml -d out/.; popd"),
        "{}",
        rerun
    );
    assert!(dir.join("wdl/hello.json").is_file());
}

#[test]
fn timestamped_run_directory_beneath_dir() {
    let temp = project(SUCCEEDS);
    let runs = temp.path().join("runs");
    std::fs::create_dir(&runs).unwrap();

    let out = temp.wr().args(run_args(&["-d", "runs"])).passes();
    let json = out.stdout_json();
    let dir = json["dir"].as_str().unwrap();
    assert!(dir.ends_with("_hello"), "{}", dir);
    assert!(dir.starts_with(runs.to_str().unwrap()), "{}", dir);
}

#[test]
fn failed_command_exit_status_propagates() {
    let temp = project(COMMAND_FAILS);
    let dir = temp.path().join("out");

    let out = temp
        .wr()
        .args(run_args(&["-d", "out/.", "--error-json"]))
        .exits(3)
        .stderr_has("run with --verbose to include task standard error streams in this log");
    let report = out.stdout_json();
    assert_eq!(report["error"], "CommandFailed");
    assert_eq!(report["exit_status"], 3);
    assert_eq!(report["dir"], json!(dir.to_string_lossy()));
    assert_eq!(
        report["from_dir"],
        json!(dir.join("call-greet").to_string_lossy())
    );
    assert!(report.get("traceback").is_none());
    assert!(dir.join("rerun").is_file());
}

#[test]
fn verbose_failure_includes_traceback() {
    let out = project(COMMAND_FAILS)
        .wr()
        .args(run_args(&["-d", "out/.", "--error-json", "--verbose"]))
        .exits(3);
    let report = out.stdout_json();
    assert_eq!(report["traceback"].as_array().unwrap().len(), 3);
}

#[test]
fn failure_report_withheld_without_error_json() {
    project(COMMAND_FAILS)
        .wr()
        .args(run_args(&["-d", "out/."]))
        .exits(3)
        .stdout_eq("");
}

#[test]
fn failure_report_written_to_output_file() {
    let temp = project(COMMAND_FAILS);

    temp.wr()
        .args(run_args(&["-d", "out/.", "-o", "result.json"]))
        .exits(3)
        .stdout_eq("");
    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(temp.path().join("result.json")).unwrap())
            .unwrap();
    assert_eq!(report["error"], "CommandFailed");
}

#[test]
fn missing_engine_exits_2() {
    let temp = Project::empty();
    temp.file("hello.json", HELLO_WORKFLOW);
    temp.config_with_engine(&temp.path().join("no-such-engine"));

    let out = temp
        .wr()
        .args(run_args(&["-d", "out/.", "--error-json"]))
        .exits(2);
    let report = out.stdout_json();
    assert_eq!(report["error"], "EngineUnavailable");
    assert!(report["traceback"].is_array());
}

#[test]
fn json_only_skips_the_engine() {
    let temp = project(SUCCEEDS);

    let out = temp
        .wr()
        .args(run_args(&["-d", "out/.", "--json"]))
        .passes();
    assert_eq!(out.stdout_json(), json!({"hello.who": "world"}));
    assert!(!temp.path().join("out").exists());
}

#[test]
fn run_dir_outside_root_rejected() {
    let temp = project(SUCCEEDS);
    let elsewhere = Project::empty();
    let dir = elsewhere.path().to_string_lossy().into_owned();

    temp.wr()
        .args(run_args(&["-d", dir.as_str()]))
        .exits(2)
        .stderr_has("must be within the configured `file_io.root' directory");
}

#[test]
fn env_side_channel_warned() {
    project(SUCCEEDS)
        .wr()
        .args(run_args(&["-d", "out/.", "--env", "FOO=1"]))
        .passes()
        .stderr_has("--env is a non-standard side channel");
}

#[test]
fn missing_config_file_rejected() {
    let temp = Project::empty();
    temp.file("hello.json", HELLO_WORKFLOW);

    temp.wr()
        .args(["run", "hello.json", "who=world", "--cfg", "nope.toml"])
        .exits(2)
        .stderr_has("--cfg file not found");
}
