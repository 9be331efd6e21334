// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::env::Environment;
use std::collections::VecDeque;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RawHandle(u32);

#[derive(Debug, PartialEq, Eq)]
struct OwnedHandle(u32);

#[derive(Default)]
struct FakeDebugger {
    events: VecDeque<DebugEvent<RawHandle>>,
    continued: Vec<(u32, u32, ContinueStatus)>,
    closed_files: Vec<u32>,
    duplicated: Vec<u32>,
    advanced: Vec<(u32, u32)>,
    captured_pids: Vec<u32>,
    detached: Vec<u32>,
    capture_result: Option<CapturedState>,
}

impl FakeDebugger {
    fn with_events(events: Vec<DebugEvent<RawHandle>>) -> Self {
        Self {
            events: events.into(),
            capture_result: Some(CapturedState {
                environment: [("FOO", "BAR")].into_iter().collect::<Environment>(),
                current_dir: PathBuf::from("C:\\work"),
            }),
            ..Self::default()
        }
    }
}

impl DebugApi for &mut FakeDebugger {
    type Handle = RawHandle;
    type Owned = OwnedHandle;

    fn wait_for_event(&mut self) -> Result<DebugEvent<RawHandle>, DebugError> {
        self.events.pop_front().ok_or(DebugError::Os {
            action: "WaitForDebugEvent",
            source: std::io::Error::other("no more events"),
        })
    }

    fn continue_event(&mut self, pid: u32, tid: u32, status: ContinueStatus) -> Result<(), DebugError> {
        self.continued.push((pid, tid, status));
        Ok(())
    }

    fn duplicate(&mut self, handle: RawHandle) -> Result<OwnedHandle, DebugError> {
        self.duplicated.push(handle.0);
        Ok(OwnedHandle(handle.0 + 1000))
    }

    fn close_file(&mut self, handle: RawHandle) {
        self.closed_files.push(handle.0);
    }

    fn advance_instruction_pointer(&mut self, thread: &OwnedHandle, bytes: u32) -> Result<(), DebugError> {
        self.advanced.push((thread.0, bytes));
        Ok(())
    }

    fn capture(&mut self, pid: u32, _process: &OwnedHandle) -> Result<CapturedState, DebugError> {
        self.captured_pids.push(pid);
        self.capture_result.clone().ok_or(DebugError::Read { what: "PEB", address: 0 })
    }

    fn detach(&mut self, pid: u32) -> Result<(), DebugError> {
        self.detached.push(pid);
        Ok(())
    }
}

fn create(pid: u32, tid: u32) -> DebugEvent<RawHandle> {
    DebugEvent::CreateProcess {
        pid,
        tid,
        process: RawHandle(pid),
        thread: RawHandle(tid),
        file: Some(RawHandle(pid + 500)),
    }
}

fn exit(pid: u32, exit_code: u32) -> DebugEvent<RawHandle> {
    DebugEvent::ExitProcess { pid, tid: pid + 1, exit_code }
}

fn breakpoint(pid: u32, tid: u32) -> DebugEvent<RawHandle> {
    DebugEvent::Exception { pid, tid, code: EXCEPTION_BREAKPOINT, first_chance: true }
}

fn capture_flag(on: bool) -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(on))
}

#[test]
fn root_exit_captures_state() {
    let mut api = FakeDebugger::with_events(vec![create(10, 11), breakpoint(10, 11), exit(10, 7)]);
    let outcome = DebugSession::new(&mut api, 10, capture_flag(true))
        .architecture(Architecture::X86_64)
        .run()
        .unwrap();

    assert_eq!(outcome.exit_code, 7);
    let captured = outcome.captured.unwrap();
    assert_eq!(captured.environment.get("foo"), Some("BAR"));
    assert_eq!(captured.current_dir, PathBuf::from("C:\\work"));
    assert_eq!(api.captured_pids, vec![10]);
    assert_eq!(api.duplicated, vec![10, 11]);
    assert_eq!(api.closed_files, vec![510]);
    assert!(api.continued.iter().all(|(_, _, s)| *s == ContinueStatus::Continue));
    assert!(api.advanced.is_empty());
}

#[test]
fn cleared_capture_flag_skips_capture() {
    let mut api = FakeDebugger::with_events(vec![create(10, 11), exit(10, 0)]);
    let outcome = DebugSession::new(&mut api, 10, capture_flag(false)).run().unwrap();
    assert!(outcome.captured.is_none());
    assert!(outcome.capture_error.is_none());
    assert!(api.captured_pids.is_empty());
}

#[test]
fn capture_failure_still_reports_exit_code() {
    let mut api = FakeDebugger::with_events(vec![create(10, 11), exit(10, 3)]);
    api.capture_result = None;
    let outcome = DebugSession::new(&mut api, 10, capture_flag(true)).run().unwrap();
    assert_eq!(outcome.exit_code, 3);
    assert!(outcome.captured.is_none());
    assert!(matches!(outcome.capture_error, Some(DebugError::Read { .. })));
}

#[test]
fn grandchild_exit_does_not_end_session() {
    let mut api = FakeDebugger::with_events(vec![
        create(10, 11),
        create(20, 21),
        exit(20, 0),
        create(30, 31),
        exit(10, 0),
    ]);
    let outcome = DebugSession::new(&mut api, 10, capture_flag(true)).run().unwrap();
    assert_eq!(outcome.exit_code, 0);
    assert_eq!(api.captured_pids, vec![10]);
    assert_eq!(api.detached, vec![30]);
    assert_eq!(api.continued.len(), 5);
}

#[test]
fn other_exceptions_are_not_handled() {
    let mut api = FakeDebugger::with_events(vec![
        create(10, 11),
        DebugEvent::Exception { pid: 10, tid: 11, code: 0xC000_0005, first_chance: true },
        DebugEvent::Exception { pid: 10, tid: 11, code: EXCEPTION_WX86_BREAKPOINT, first_chance: true },
        exit(10, 1),
    ]);
    DebugSession::new(&mut api, 10, capture_flag(false)).run().unwrap();
    assert_eq!(api.continued[1], (10, 11, ContinueStatus::ExceptionNotHandled));
    assert_eq!(api.continued[2], (10, 11, ContinueStatus::Continue));
}

#[test]
fn risc_steps_first_breakpoint_only() {
    let mut api = FakeDebugger::with_events(vec![
        create(10, 11),
        breakpoint(10, 11),
        breakpoint(10, 11),
        exit(10, 0),
    ]);
    DebugSession::new(&mut api, 10, capture_flag(false))
        .architecture(Architecture::Mips)
        .run()
        .unwrap();
    assert_eq!(api.advanced, vec![(1011, RISC_BREAKPOINT_LENGTH)]);
}

#[test]
fn alpha_steps_each_debuggee_once() {
    let mut api = FakeDebugger::with_events(vec![
        create(10, 11),
        breakpoint(10, 11),
        create(20, 21),
        breakpoint(20, 21),
        exit(20, 0),
        exit(10, 0),
    ]);
    DebugSession::new(&mut api, 10, capture_flag(false))
        .architecture(Architecture::Alpha)
        .run()
        .unwrap();
    assert_eq!(api.advanced, vec![(1011, 4), (1021, 4)]);
}

#[test]
fn load_dll_file_handle_is_closed() {
    let mut api = FakeDebugger::with_events(vec![
        create(10, 11),
        DebugEvent::LoadDll { pid: 10, tid: 11, file: Some(RawHandle(77)) },
        DebugEvent::LoadDll { pid: 10, tid: 11, file: None },
        exit(10, 0),
    ]);
    DebugSession::new(&mut api, 10, capture_flag(false)).run().unwrap();
    assert_eq!(api.closed_files, vec![510, 77]);
}

#[test]
fn wait_failure_propagates() {
    let mut api = FakeDebugger::with_events(vec![create(10, 11)]);
    let result = DebugSession::new(&mut api, 10, capture_flag(true)).run();
    assert!(matches!(result, Err(DebugError::Os { .. })));
}
