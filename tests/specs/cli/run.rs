//! Run-and-exit specs
//!
//! Verify `wsh -c`, `/c` and `/ss` run one line and exit with its code.

use crate::prelude::*;

#[test]
fn runs_a_single_line() {
    cli().args(&["-c", "echo hi"]).passes().stdout_eq("hi\n");
}

#[test]
fn slash_c_joins_words() {
    cli().args(&["/c", "echo", "hello", "world"]).passes().stdout_eq("hello world\n");
}

#[test]
fn words_with_spaces_stay_one_argument() {
    cli().args(&["/c", "echo", "a  b"]).passes().stdout_eq("a  b\n");
}

#[test]
fn and_runs_after_success() {
    cli().args(&["-c", "true && echo ok"]).passes().stdout_eq("ok\n");
}

#[test]
fn and_skips_after_failure() {
    cli().args(&["-c", "false && echo ok"]).exits(1).stdout_eq("");
}

#[test]
fn or_runs_after_failure() {
    cli().args(&["-c", "false || echo fallback"]).passes().stdout_eq("fallback\n");
}

#[test]
fn exit_code_is_propagated() {
    cli().args(&["/c", "exit", "3"]).exits(3);
}

#[test]
fn subshell_exits_with_code() {
    cli().args(&["/ss", "exit 5"]).exits(5);
}

#[test]
fn missing_program_fails_to_launch() {
    cli()
        .args(&["-c", "wsh-spec-no-such-program"])
        .exits(1)
        .stderr_has("wsh: launch failed: wsh-spec-no-such-program");
}

#[test]
fn syntax_errors_are_reported() {
    cli().args(&["-c", "echo \"open"]).exits(1).stderr_has("wsh: parse failed");
}

#[test]
fn init_script_is_skipped() {
    let project = Project::empty();
    let init = project.file("init.ys1", "echo from init\n");
    project.wsh().env("WSH_INIT", &init).args(&["-c", "echo hi"]).passes().stdout_eq("hi\n");
}

#[test]
fn log_dir_receives_log_files() {
    let project = Project::empty();
    let logs = project.path().join("logs");
    project
        .wsh()
        .env("WSH_LOG_DIR", &logs)
        .env("WSH_LOG", "debug")
        .args(&["-c", "echo hi"])
        .passes()
        .stdout_eq("hi\n");
    let entries = std::fs::read_dir(&logs).map(|dir| dir.count()).unwrap_or(0);
    assert!(entries > 0, "no log files in {}", logs.display());
}
