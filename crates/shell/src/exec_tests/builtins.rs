// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    words = { "echo hello world", "hello world\n" },
    quoted = { "echo \"a  b\"", "a  b\n" },
    empty = { "echo", "\n" },
    no_newline = { "echo -n hi", "hi" },
    caret = { "echo a^&b", "a&b\n" },
)]
fn echo(line: &str, expected: &str) {
    let mut h = Harness::new();
    assert_eq!(h.run(line), 0);
    assert_eq!(h.stdout(), expected);
}

#[test]
fn builtins_are_not_launched() {
    let mut h = Harness::new();
    h.run("echo hi");
    h.run("rem nothing to see");
    h.run("TRUE");
    assert!(h.launcher.launches().is_empty());
}

#[test]
fn true_and_false_set_exit_codes() {
    let mut h = Harness::new();
    assert_eq!(h.run("false"), 1);
    assert_eq!(h.shell.last_exit_code(), 1);
    assert_eq!(h.run("true"), 0);
}

#[test]
fn set_assigns_and_deletes() {
    let mut h = Harness::new();
    h.run("set FOO=bar baz");
    assert_eq!(h.shell.env().get("foo"), Some("bar baz"));

    h.run("set FOO=");
    assert_eq!(h.shell.env().get("FOO"), None);
}

#[test]
fn set_lists_without_drive_records() {
    let mut h = Harness::new();
    h.run("set");
    assert_eq!(h.stdout(), "PATH=C:\\Windows\n");
}

#[test]
fn set_prefix_lists_matches() {
    let mut h = Harness::new();
    h.run("set PROMPT_A=1");
    h.run("set PROMPT_B=2");
    assert_eq!(h.run("set prompt"), 0);
    assert_eq!(h.stdout(), "PROMPT_A=1\nPROMPT_B=2\n");
}

#[test]
fn set_unknown_prefix_fails() {
    let mut h = Harness::new();
    assert_eq!(h.run("set NOPE"), 1);
    assert_eq!(h.stderr(), "wsh: set failed: environment variable NOPE not defined\n");
}

#[test]
fn set_without_name_fails() {
    let mut h = Harness::new();
    assert_eq!(h.run("set =x"), 1);
    assert!(h.stderr().starts_with("wsh: set failed:"));
}

#[parameterized(
    append = { "set -a PATH=C:\\tools", "C:\\Windows;C:\\tools" },
    insert = { "set -i PATH=C:\\tools", "C:\\tools;C:\\Windows" },
    append_existing = { "set -a PATH=c:\\windows", "c:\\windows" },
    remove = { "set -r PATH=C:\\Windows", "" },
)]
fn set_edits_path_lists(line: &str, expected: &str) {
    let mut h = Harness::new();
    assert_eq!(h.run(line), 0);
    assert_eq!(h.shell.env().get("PATH").unwrap_or_default(), expected);
}

#[test]
fn set_list_edit_needs_component() {
    let mut h = Harness::new();
    assert_eq!(h.run("set -a PATH"), 1);
    assert!(h.stderr().contains("expected NAME=COMPONENT"));
}

#[test]
fn cd_changes_and_prints_directory() {
    let mut h = Harness::new();
    std::fs::create_dir(h.path("sub")).unwrap();

    assert_eq!(h.run("cd sub"), 0);
    assert_eq!(h.shell.cwd(), h.path("sub"));

    h.run("cd ..");
    assert_eq!(h.shell.cwd(), h.dir.path());

    h.run("chdir");
    assert_eq!(h.stdout(), format!("{}\n", h.dir.path().display()));
}

#[test]
fn cd_to_missing_directory_fails() {
    let mut h = Harness::new();
    assert_eq!(h.run("cd missing"), 1);
    assert!(h.stderr().starts_with("wsh: cd failed: missing:"));
    assert_eq!(h.shell.cwd(), h.dir.path());
}

#[test]
fn cd_to_file_fails() {
    let mut h = Harness::new();
    h.write_file("plain.txt", "");
    assert_eq!(h.run("cd plain.txt"), 1);
    assert_eq!(h.shell.cwd(), h.dir.path());
}

#[parameterized(
    number = { "exit 3", 3 },
    hex = { "exit 0x10", 16 },
    negative = { "exit -2", -2 },
)]
fn exit_with_code(line: &str, expected: i32) {
    let mut h = Harness::new();
    assert_eq!(h.run(line), expected);
    assert!(h.shell.exit_requested());
}

#[test]
fn exit_reads_variable() {
    let mut h = Harness::new();
    h.run("set CODE=7");
    assert_eq!(h.run("exit CODE"), 7);
}

#[test]
fn exit_without_argument_keeps_last_code() {
    let mut h = Harness::new();
    h.run("false");
    assert_eq!(h.run("exit"), 1);
    assert!(h.shell.exit_requested());
}

#[test]
fn exit_with_non_numeric_variable_fails() {
    let mut h = Harness::new();
    h.run("set CODE=abc");
    assert_eq!(h.run("exit CODE"), 1);
    assert!(!h.shell.exit_requested());
    assert!(h.stderr().starts_with("wsh: exit failed:"));
}

#[test]
fn exit_stops_the_line() {
    let mut h = Harness::new();
    assert_eq!(h.run("exit 2 & echo unreachable"), 2);
    assert_eq!(h.stdout(), "");
}

#[test]
fn alias_defines_lists_and_deletes() {
    let mut h = Harness::new();
    h.run("alias ll=echo listing");
    assert_eq!(h.aliases.table().get("ll"), Some("echo listing"));

    h.run("ll now");
    assert_eq!(h.stdout(), "listing now\n");

    h.run("alias");
    assert!(h.stdout().ends_with("ll=echo listing\n"));

    h.run("alias ll=");
    assert_eq!(h.shell.aliases().get("ll"), None);
    assert_eq!(h.aliases.table().get("ll"), None);
}

#[test]
fn alias_shows_one() {
    let mut h = Harness::new();
    h.run("alias g=git status");
    h.run("alias g");
    assert_eq!(h.stdout(), "g=git status\n");
    assert_eq!(h.run("alias missing"), 1);
}

#[test]
fn shell_starts_with_console_aliases() {
    let aliases = FakeAliases::new();
    aliases.set("hi", Some("echo hello")).unwrap();
    let launcher = FakeLauncher::new();
    let mut h = Harness::with(launcher.clone(), launcher, aliases);
    h.run("hi");
    assert_eq!(h.stdout(), "hello\n");
}
