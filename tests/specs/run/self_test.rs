//! Self-test specs against a scripted engine

use crate::prelude::*;

const GREETS: &str = r#"for a; do dir=$a; done
echo '{"messages": ["Hello, Alyssa P. Hacker!", "Hello, Ben Bitdiddle!"], "message_files": []}' > "$dir/outputs.json""#;

const GREETS_NOBODY: &str = r#"for a; do dir=$a; done
echo '{"messages": [], "message_files": []}' > "$dir/outputs.json""#;

fn project(engine: &str) -> Project {
    let temp = Project::empty();
    let script = temp.script("engine.sh", engine);
    temp.config_with_engine(&script);
    temp
}

#[test]
fn working_engine_passes() {
    let temp = project(GREETS);

    temp.wr()
        .args(["run-self-test", "--dir", "st", "--cfg", "wr.toml"])
        .passes()
        .stderr_has("wr run-self-test OK");

    let dir = temp.path().join("st");
    assert!(dir.join("run_self_test.json").is_file());
    assert!(dir.join("names.txt").is_file());
    assert!(dir.join("wr_run_self_test.log").is_file());
}

#[test]
fn wrong_greetings_fail_with_hints() {
    project(GREETS_NOBODY)
        .wr()
        .args(["run-self-test", "--dir", "st", "--cfg", "wr.toml"])
        .exits(2)
        .stderr_has("self test failed: unexpected hello_caller.messages")
        .stderr_has("* Hint: when asking for help, attach the log file");
}
