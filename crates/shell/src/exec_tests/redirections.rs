// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn builtin_output_to_file() {
    let mut h = Harness::new();
    h.run("echo first > out.txt");
    h.run("echo second >> out.txt");
    assert_eq!(h.read_file("out.txt"), "first\nsecond\n");
    assert_eq!(h.stdout(), "");
}

#[test]
fn overwrite_truncates() {
    let mut h = Harness::new();
    h.write_file("out.txt", "old contents that are long\n");
    h.run("echo new > out.txt");
    assert_eq!(h.read_file("out.txt"), "new\n");
}

#[test]
fn program_output_to_file() {
    let mut h = Harness::new();
    h.launcher.push_child(FakeChild::new(0).with_output("built\n"));
    h.run("build > log.txt");
    assert_eq!(h.read_file("log.txt"), "built\n");
    assert_eq!(h.launcher.launches()[0].stdout, "file");
}

#[test]
fn input_from_file() {
    let mut h = Harness::new();
    h.write_file("in.txt", "b\na\n");
    h.run("sort < in.txt");
    assert_eq!(h.launcher.launches()[0].stdin_data, b"b\na\n");
}

#[test]
fn missing_input_launches_nothing() {
    let mut h = Harness::new();
    assert_eq!(h.run("sort < missing.txt"), 1);
    assert!(h.stderr().starts_with("wsh: redirect failed:"), "{}", h.stderr());
    assert!(h.launcher.launches().is_empty());
}

#[test]
fn failed_redirect_in_pipe_launches_nothing() {
    let mut h = Harness::new();
    assert_eq!(h.run("gen | sort < missing.txt"), 1);
    assert!(h.launcher.launches().is_empty());
}

#[test]
fn nul_discards_output() {
    let mut h = Harness::new();
    h.run("echo hidden > NUL");
    h.run("tool 2> nul");
    assert_eq!(h.stdout(), "");
    assert_eq!(h.launcher.launches()[0].stderr, "null");
    assert!(!h.path("nul").exists());
}

#[test]
fn stderr_follows_stdout() {
    let mut h = Harness::new();
    h.run("tool > out.txt 2>&1");
    let launch = &h.launcher.launches()[0];
    assert_eq!((launch.stdout, launch.stderr), ("file", "file"));
}

#[test]
fn stderr_to_inherited_stdout_uses_parent_handle() {
    let mut h = Harness::new();
    h.run("tool 2>&1");
    h.run("tool 1>&2");
    let launches = h.launcher.launches();
    assert_eq!((launches[0].stdout, launches[0].stderr), ("inherit", "parent-stdout"));
    assert_eq!((launches[1].stdout, launches[1].stderr), ("parent-stderr", "inherit"));
}

#[test]
fn stderr_piped_with_stdout() {
    let mut h = Harness::new();
    h.run("tool 2>&1 | sort");
    let launch = &h.launcher.launches()[0];
    assert_eq!((launch.stdout, launch.stderr), ("pipe-write", "pipe-write"));
}

#[test]
fn builtin_errors_follow_redirection() {
    let mut h = Harness::new();
    h.run("cd missing 2> err.txt");
    assert!(h.read_file("err.txt").starts_with("wsh: cd failed:"));
    assert_eq!(h.stderr(), "");
}

#[test]
fn builtin_stdout_to_stderr() {
    let mut h = Harness::new();
    h.run("echo warning >&2");
    assert_eq!(h.stdout(), "");
    assert_eq!(h.stderr(), "warning\n");
}

#[test]
fn redirect_relative_to_shell_directory() {
    let mut h = Harness::new();
    std::fs::create_dir(h.path("sub")).unwrap();
    h.run("cd sub");
    h.run("echo here > out.txt");
    assert_eq!(h.read_file("sub/out.txt"), "here\n");
}
