// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use wsh_adapters::{ChildProcess, LaunchError, LaunchRequest};
use wsh_core::wait::GESTURE_PASSES;
use wsh_core::{CapturedState, InputRecord, KeyRecord};

use super::*;

fn ctrl_b() -> Vec<InputRecord> {
    vec![InputRecord::Key(KeyRecord::ctrl_b())]
}

fn captured(pairs: &[(&str, &str)], dir: &Path) -> CapturedState {
    CapturedState {
        environment: pairs.iter().copied().collect(),
        current_dir: dir.to_path_buf(),
    }
}

#[test]
fn held_ctrl_b_backgrounds_the_child() {
    let mut h = Harness::new();
    let child = FakeChild::new(0).with_captured(captured(&[("FOO", "child")], h.dir.path()));
    h.launcher.push_child(child.clone());
    h.console.hold(ctrl_b(), GESTURE_PASSES as usize);

    assert_eq!(h.run("long-task"), 0);
    assert_eq!(h.stdout(), "Job 1: long-task\n");
    assert!(!child.is_finished());
    assert!(child.capture_stopped());
    assert_eq!(h.console.discards(), 1);
    assert_eq!(h.shell.env().get("FOO"), None);
}

#[test]
fn backgrounding_skips_the_rest_of_the_line() {
    let mut h = Harness::new();
    h.console.hold(ctrl_b(), GESTURE_PASSES as usize);
    h.run("long-task && echo after");
    assert_eq!(h.stdout(), "Job 1: long-task\n");
}

#[test]
fn backgrounding_a_pipe_moves_every_child() {
    let mut h = Harness::new();
    let first = FakeChild::new(0);
    let second = FakeChild::new(0);
    h.launcher.push_child(first.clone());
    h.launcher.push_child(second.clone());
    h.console.hold(ctrl_b(), GESTURE_PASSES as usize);

    h.run("gen | sort");
    assert_eq!(h.stdout(), "Job 1: gen\nJob 2: sort\n");
    assert!(second.capture_stopped());
    assert_eq!(h.shell.jobs().len(), 2);
}

#[test]
fn short_ctrl_b_does_not_background() {
    let mut h = Harness::new();
    h.console.hold(ctrl_b(), GESTURE_PASSES as usize - 1);
    assert_eq!(h.run("task"), 0);
    assert_eq!(h.stdout(), "");
    assert!(h.shell.jobs().is_empty());
}

#[test]
fn cancel_interrupts_the_child() {
    let mut h = Harness::new();
    let child = FakeChild::new(0);
    h.launcher.push_child(child.clone());
    h.cancel.cancel();

    let code = h.shell.run_pipeline(&plan("task && echo after"));
    assert_eq!(code, wsh_core::TERMINATED_EXIT_CODE as i32);
    assert_eq!(child.interrupts(), [false]);
    assert_eq!(h.stdout(), "");
    assert!(!h.cancel.is_cancelled());
}

#[test]
fn cancel_breaks_a_started_child() {
    let mut h = Harness::new();
    let child = FakeChild::new(0);
    h.launcher.push_child(child.clone());
    h.cancel.cancel();

    let code = h.shell.run_pipeline(&plan("start /b /wait server && echo after"));
    assert_eq!(code, wsh_core::TERMINATED_EXIT_CODE as i32);
    assert_eq!(child.interrupts(), [true]);
    assert!(h.launcher.launches()[0].new_group);
    assert_eq!(h.stdout(), "");
}

#[test]
fn cancel_is_cleared_before_each_line() {
    let mut h = Harness::new();
    h.cancel.cancel();
    assert_eq!(h.run("task"), 0);
}

#[test]
fn lose_focus_flags_taskbar_until_exit() {
    let mut h = Harness::new();
    h.console.hold(vec![InputRecord::Focus { gained: false }], GESTURE_PASSES as usize);
    assert_eq!(h.run("task"), 0);
    assert_eq!(h.taskbar.calls(), [true, false]);
}

#[test]
fn taskbar_untouched_without_focus_loss() {
    let mut h = Harness::new();
    h.run("task");
    assert!(h.taskbar.calls().is_empty());
}

#[test]
fn captured_state_is_applied() {
    let mut h = Harness::new();
    std::fs::create_dir(h.path("moved")).unwrap();
    let state = captured(&[("PATH", "C:\\Windows"), ("NEW", "1")], &h.path("moved"));
    h.launcher.push_child(FakeChild::new(0).with_captured(state));

    h.run("setup");
    assert_eq!(h.shell.env().get("NEW"), Some("1"));
    assert_eq!(h.shell.env().get("=C:"), Some("C:\\work"));
    assert_eq!(h.shell.cwd(), h.path("moved"));
}

#[test]
fn captured_state_removes_deleted_variables() {
    let mut h = Harness::new();
    h.run("set GONE=1");
    let state = captured(&[("PATH", "C:\\Windows")], h.dir.path());
    h.launcher.push_child(FakeChild::new(0).with_captured(state));

    h.run("cleanup");
    assert_eq!(h.shell.env().get("GONE"), None);
}

#[test]
fn drive_records_from_child_are_adopted() {
    let mut h = Harness::new();
    let state = captured(&[("PATH", "C:\\Windows"), ("=D:", "D:\\data")], h.dir.path());
    h.launcher.push_child(FakeChild::new(0).with_captured(state));
    h.run("tool");
    assert_eq!(h.shell.env().get("=D:"), Some("D:\\data"));
}

/// Defines an alias in the console as each program starts, the way a
/// child running `doskey` would.
#[derive(Clone)]
struct DoskeyLauncher {
    inner: FakeLauncher,
    aliases: FakeAliases,
}

impl ProcessLauncher for DoskeyLauncher {
    fn launch(&self, request: LaunchRequest) -> Result<Box<dyn ChildProcess>, LaunchError> {
        let child = self.inner.launch(request)?;
        self.aliases.set("ll", Some("echo long listing")).unwrap();
        Ok(child)
    }
}

#[test]
fn console_alias_changes_are_merged() {
    let aliases = FakeAliases::new();
    let inner = FakeLauncher::new();
    let doskey = DoskeyLauncher { inner: inner.clone(), aliases: aliases.clone() };
    let mut h = Harness::with(doskey, inner, aliases);
    h.launcher.push_child(FakeChild::new(0).with_captured(CapturedState::default()));

    h.run("doskey ll=dir");
    assert_eq!(h.shell.aliases().get("ll"), Some("echo long listing"));

    h.run("ll");
    assert!(h.stdout().ends_with("long listing\n"));
}

#[test]
fn aliases_are_not_merged_without_capture() {
    let aliases = FakeAliases::new();
    let inner = FakeLauncher::new();
    let doskey = DoskeyLauncher { inner: inner.clone(), aliases: aliases.clone() };
    let mut h = Harness::with(doskey, inner, aliases);

    h.run("doskey ll=dir &!");
    assert_eq!(h.shell.aliases().get("ll"), None);
}
