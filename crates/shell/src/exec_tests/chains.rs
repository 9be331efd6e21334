// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    and_success = { "true && echo ok", "ok\n", 0 },
    and_failure = { "false && echo ok", "", 1 },
    or_success = { "true || echo ok", "", 0 },
    or_failure = { "false || echo ok", "ok\n", 0 },
    unconditional = { "false & echo ok", "ok\n", 0 },
    three_links = { "false || echo a && echo b", "a\nb\n", 0 },
    stops_at_first_failed_condition = { "false && echo a || echo b", "", 1 },
)]
fn conditions(line: &str, expected: &str, code: i32) {
    let mut h = Harness::new();
    assert_eq!(h.run(line), code);
    assert_eq!(h.stdout(), expected);
}

#[test]
fn empty_line_keeps_last_code() {
    let mut h = Harness::new();
    h.run("false");
    assert_eq!(h.run("   "), 1);
}

#[test]
fn external_exit_code_is_returned() {
    let mut h = Harness::new();
    h.launcher.push_child(FakeChild::new(4));
    assert_eq!(h.run("build --release"), 4);
    assert_eq!(h.launcher.programs(), ["build"]);
    assert_eq!(h.launcher.launches()[0].argv, ["build", "--release"]);
}

#[test]
fn launch_gets_shell_environment_and_directory() {
    let mut h = Harness::new();
    h.run("set FOO=1");
    h.run("tool");

    let launch = &h.launcher.launches()[0];
    assert_eq!(launch.env_var("FOO"), Some("1"));
    assert_eq!(launch.env_var("=C:"), None);
    assert_eq!(launch.cwd, h.dir.path());
    assert!(launch.capture_environment);
    assert_eq!((launch.stdout, launch.stderr), ("inherit", "inherit"));
}

#[test]
fn variables_expand_before_parsing() {
    let mut h = Harness::new();
    h.run("set TARGET=out.txt");
    h.run("echo hi > %TARGET%");
    assert_eq!(h.read_file("out.txt"), "hi\n");
}

#[test]
fn unknown_variables_stay_literal() {
    let mut h = Harness::new();
    h.run("echo %NOT_SET%");
    assert_eq!(h.stdout(), "%NOT_SET%\n");
}

#[parameterized(
    last_exit_code = { "echo %LASTEXITCODE%" },
    errorlevel = { "echo %errorlevel%" },
)]
fn dynamic_exit_code_variables(line: &str) {
    let mut h = Harness::new();
    h.launcher.push_child(FakeChild::new(5));
    h.run("tool");
    h.run(line);
    assert_eq!(h.stdout(), "5\n");
}

#[test]
fn set_errorlevel_overrides_dynamic_value() {
    let mut h = Harness::new();
    h.run("set ERRORLEVEL=42");
    h.run("false");
    h.run("echo %ERRORLEVEL%");
    assert_eq!(h.stdout(), "42\n");
}

#[test]
fn pipe_feeds_builtin_output_to_program() {
    let mut h = Harness::new();
    h.run("echo hello | sort");

    let launch = &h.launcher.launches()[0];
    assert_eq!(launch.argv, ["sort"]);
    assert_eq!(launch.stdin_data, b"hello\n");
    assert_eq!(h.stdout(), "");
}

#[test]
fn pipe_between_programs() {
    let mut h = Harness::new();
    h.launcher.push_child(FakeChild::new(0).with_output("b\na\n"));
    h.launcher.push_child(FakeChild::new(3));
    assert_eq!(h.run("gen | sort"), 3);

    let launches = h.launcher.launches();
    assert_eq!(launches[0].stdout, "pipe-write");
    assert_eq!(launches[1].stdin_data, b"b\na\n");
    assert_eq!(launches[1].stdout, "inherit");
}

#[test]
fn pipeline_code_is_last_programs() {
    let mut h = Harness::new();
    h.launcher.push_child(FakeChild::new(9));
    assert_eq!(h.run("gen | true"), 0);
    assert_eq!(h.run("true | false"), 1);
}

#[test]
fn launch_failure_reports_and_stops() {
    let mut h = Harness::new();
    h.launcher.fail_next(false);
    assert_eq!(h.run("missing && echo no"), 1);
    assert_eq!(h.stderr(), "wsh: launch failed: missing: scripted failure\n");
    assert_eq!(h.stdout(), "");
}

#[test]
fn launch_failure_continues_with_or() {
    let mut h = Harness::new();
    h.launcher.fail_next(false);
    assert_eq!(h.run("missing || echo fallback"), 0);
    assert_eq!(h.stdout(), "fallback\n");
}

#[test]
fn parse_error_is_reported_with_context() {
    let mut h = Harness::new();
    assert_eq!(h.run("echo a | | b"), 1);
    let stderr = h.stderr();
    assert!(stderr.starts_with("wsh: parse failed:"), "{stderr}");
    assert!(stderr.contains('^'));
    assert!(h.launcher.launches().is_empty());
}

#[test]
fn unterminated_quote_fails() {
    let mut h = Harness::new();
    assert_eq!(h.run("echo \"open"), 1);
    assert!(h.stderr().starts_with("wsh: parse failed:"));
}

#[test]
fn trailing_ampersand_is_ignored() {
    let mut h = Harness::new();
    assert_eq!(h.run("echo ok &"), 0);
    assert_eq!(h.stdout(), "ok\n");
}
