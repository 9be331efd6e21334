// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    x86 = { Architecture::X86, false },
    x64 = { Architecture::X86_64, false },
    arm64 = { Architecture::Arm64, false },
    mips = { Architecture::Mips, true },
    alpha = { Architecture::Alpha, true },
    other = { Architecture::Other, false },
)]
fn initial_breakpoint_step(arch: Architecture, expected: bool) {
    assert_eq!(arch.steps_over_initial_breakpoint(), expected);
}

#[test]
fn event_ids() {
    let event: DebugEvent<u8> = DebugEvent::LoadDll { pid: 4, tid: 5, file: None };
    assert_eq!(event.ids(), (4, 5));
    let event: DebugEvent<u8> = DebugEvent::ExitProcess { pid: 9, tid: 1, exit_code: 0 };
    assert_eq!(event.ids(), (9, 1));
}

#[test]
fn children_track_one_entry_per_pid() {
    let mut children = DebuggedChildren::new();
    children.insert(1, 2, "p1", "t1");
    children.insert(3, 4, "p3", "t3");
    children.insert(1, 5, "p1b", "t1b");

    assert_eq!(children.len(), 2);
    assert_eq!(children.get(1).map(|c| c.tid), Some(5));
    assert_eq!(children.state(1), ChildState::Created);
    assert_eq!(children.state(99), ChildState::Unknown);
}

#[test]
fn removed_child_is_reaped() {
    let mut children = DebuggedChildren::new();
    children.insert(1, 2, (), ());
    if let Some(child) = children.get_mut(1) {
        child.state = ChildState::Exited;
    }
    let child = children.remove(1).unwrap();
    assert_eq!(child.state, ChildState::Reaped);
    assert!(children.is_empty());
    assert!(children.remove(1).is_none());
}
