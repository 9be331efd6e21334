// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn script_runs_with_arguments() {
    let mut h = Harness::new();
    h.write_file("greet.ys1", "echo hello %1%\necho all: %*%\n");
    assert_eq!(h.run("greet.ys1 world again"), 0);
    assert_eq!(h.stdout(), "hello world\nall: world again\n");
}

#[test]
fn script_exit_code_is_last_command() {
    let mut h = Harness::new();
    h.write_file("fail.ys1", "echo before\nfalse\n");
    assert_eq!(h.run("fail.ys1"), 1);
}

#[test]
fn script_runs_programs() {
    let mut h = Harness::new();
    h.write_file("build.ys1", "compile %1%\n");
    h.run("build.ys1 main.c");
    assert_eq!(h.launcher.launches()[0].argv, ["compile", "main.c"]);
}

#[test]
fn script_changes_persist() {
    let mut h = Harness::new();
    std::fs::create_dir(h.path("sub")).unwrap();
    h.write_file("env.ys1", "set FROM_SCRIPT=yes\ncd sub\n");
    h.run("env.ys1");
    assert_eq!(h.shell.env().get("FROM_SCRIPT"), Some("yes"));
    assert_eq!(h.shell.cwd(), h.path("sub"));
}

#[test]
fn script_exit_ends_the_shell() {
    let mut h = Harness::new();
    h.write_file("quit.ys1", "exit 4\necho unreachable\n");
    assert_eq!(h.run("quit.ys1"), 4);
    assert!(h.shell.exit_requested());
    assert_eq!(h.stdout(), "");
}

#[test]
fn script_goto_skips_lines() {
    let mut h = Harness::new();
    h.write_file("jump.ys1", "goto :end\necho skipped\n:end\necho done\n");
    h.run("jump.ys1");
    assert_eq!(h.stdout(), "done\n");
}

#[test]
fn missing_script_fails() {
    let mut h = Harness::new();
    assert_eq!(h.run("absent.ys1"), 1);
    assert!(h.stderr().starts_with("wsh: script failed: cannot read"), "{}", h.stderr());
}

#[test]
fn script_error_lines_reach_stderr() {
    let mut h = Harness::new();
    h.write_file("bad.ys1", "goto nowhere\n");
    assert_eq!(h.run("bad.ys1"), 1);
    assert_eq!(h.stderr(), "wsh: goto failed: label 'nowhere' not found\n");
}

#[test]
fn run_script_by_path() {
    let mut h = Harness::new();
    h.write_file("direct.ys1", "echo %1%\n");
    let path = h.path("direct.ys1");
    assert_eq!(h.shell.run_script(&path, vec!["arg".into()]), 0);
    assert_eq!(h.stdout(), "arg\n");
}

#[test]
fn escaped_operators_stay_literal_in_scripts() {
    let mut h = Harness::new();
    h.write_file("esc.ys1", "echo a^&b\necho x ^| y\n");
    assert_eq!(h.run("esc.ys1"), 0);
    assert_eq!(h.stdout(), "a&b\nx | y\n");
    assert!(h.launcher.launches().is_empty());
}
