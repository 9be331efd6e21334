// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end behaviour of scripts, chains and backgrounding together.

use wsh_core::wait::GESTURE_PASSES;
use wsh_core::{InputRecord, KeyRecord};

use super::*;

#[test]
fn set_and_inherit() {
    let mut h = Harness::new();
    h.write_file("inherit.ys1", "set FOO=BAR\necho %FOO%\n");
    h.run("inherit.ys1");
    assert_eq!(h.stdout(), "BAR\n");
    assert_eq!(h.shell.env().get("FOO"), Some("BAR"));

    h.run("child");
    assert_eq!(h.launcher.launches()[0].env_var("FOO"), Some("BAR"));
}

#[test]
fn subroutine_changes_are_rolled_back() {
    let mut h = Harness::new();
    h.write_file(
        "isolate.ys1",
        "set A=1\ncall :sub\necho %A%\ngoto :eof\n:sub\nset A=2\nreturn 0\n",
    );
    h.run("isolate.ys1");
    assert_eq!(h.stdout(), "1\n");
    assert_eq!(h.shell.env().get("A"), Some("1"));
}

#[test]
fn subroutine_falls_through_after_caller() {
    let mut h = Harness::new();
    h.write_file("fall.ys1", "set A=1\ncall :sub\necho %A%\n:sub\nset A=2\nreturn 0\n");
    h.run("fall.ys1");
    assert_eq!(h.stdout(), "1\n");
}

#[test]
fn preserved_names_survive_return() {
    let mut h = Harness::new();
    h.write_file(
        "preserve.ys1",
        "set A=1\ncall :sub\necho %A%\ngoto :eof\n:sub\nset A=2\nset B=3\nreturn 0 A\n",
    );
    h.run("preserve.ys1");
    assert_eq!(h.stdout(), "2\n");
    assert_eq!(h.shell.env().get("A"), Some("2"));
    assert_eq!(h.shell.env().get("B"), None);
}

#[test]
fn subroutine_directory_is_restored() {
    let mut h = Harness::new();
    std::fs::create_dir(h.path("sub")).unwrap();
    h.write_file("dirs.ys1", "call :away\ncd\ngoto :eof\n:away\ncd sub\nreturn\n");
    h.run("dirs.ys1");
    assert_eq!(h.stdout(), format!("{}\n", h.dir.path().display()));
}

#[test]
fn ctrl_b_returns_to_prompt() {
    let mut h = Harness::new();
    h.launcher.push_child(FakeChild::new(0));
    h.console.hold(vec![InputRecord::Key(KeyRecord::ctrl_b())], GESTURE_PASSES as usize);

    assert_eq!(h.run("ping -t localhost"), 0);
    assert_eq!(h.stdout(), "Job 1: ping -t localhost\n");

    assert_eq!(h.run("echo back"), 0);
    assert_eq!(h.stdout(), "Job 1: ping -t localhost\nback\n");
}

#[test]
fn on_success_chain() {
    let mut h = Harness::new();
    h.run("true && echo ok");
    assert_eq!(h.stdout(), "ok\n");

    let mut h = Harness::new();
    h.run("false && echo ok");
    assert_eq!(h.stdout(), "");
}
