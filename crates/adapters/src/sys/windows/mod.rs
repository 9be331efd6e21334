// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![allow(unsafe_code)]

mod debugger;

pub(crate) use debugger::launch_debugged;

use std::io;
use std::os::windows::io::{AsRawHandle, RawHandle};
use std::os::windows::process::CommandExt;
use std::process::{Child, Command, ExitStatus};
use std::time::Duration;

use windows_sys::Win32::Foundation::{
    CloseHandle, BOOL, FALSE, HANDLE, TRUE, WAIT_FAILED, WAIT_OBJECT_0, WAIT_TIMEOUT,
};
use windows_sys::Win32::System::Console::{
    AddConsoleAliasW, FlushConsoleInputBuffer, GenerateConsoleCtrlEvent, GetConsoleAliasesLengthW,
    GetConsoleAliasesW, GetNumberOfConsoleInputEvents, GetStdHandle, PeekConsoleInputW,
    SetConsoleCtrlHandler, CTRL_BREAK_EVENT, CTRL_C_EVENT, FOCUS_EVENT, INPUT_RECORD, KEY_EVENT,
    LEFT_ALT_PRESSED, LEFT_CTRL_PRESSED, RIGHT_ALT_PRESSED, RIGHT_CTRL_PRESSED, SHIFT_PRESSED,
    STD_INPUT_HANDLE,
};
use windows_sys::Win32::System::Threading::{
    CreateEventW, ResetEvent, SetEvent, SetPriorityClass, TerminateProcess,
    WaitForMultipleObjects, ABOVE_NORMAL_PRIORITY_CLASS, BELOW_NORMAL_PRIORITY_CLASS,
    CREATE_NEW_CONSOLE, CREATE_NEW_PROCESS_GROUP, DEBUG_PROCESS, HIGH_PRIORITY_CLASS,
    IDLE_PRIORITY_CLASS, INFINITE, NORMAL_PRIORITY_CLASS, REALTIME_PRIORITY_CLASS,
};
use wsh_core::alias::AliasTable;
use wsh_core::job::Priority;
use wsh_core::wait::{InputRecord, KeyRecord, Modifiers, WaitSignal};

/// Records examined per peek.
const PEEK_BATCH: usize = 64;

fn check(ok: BOOL) -> io::Result<()> {
    if ok == 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

fn wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

fn raw(child: &Child) -> HANDLE {
    child.as_raw_handle() as HANDLE
}

unsafe extern "system" fn on_console_ctrl(ctrl_type: u32) -> BOOL {
    if ctrl_type == CTRL_C_EVENT || ctrl_type == CTRL_BREAK_EVENT {
        crate::cancel::raise_console_token();
        TRUE
    } else {
        FALSE
    }
}

/// Manual-reset event raised alongside a cancel token's flag.
#[derive(Debug)]
pub(crate) struct CancelEvent(HANDLE);

impl CancelEvent {
    pub(crate) fn new() -> io::Result<Self> {
        // SAFETY: null attributes and name create an anonymous event.
        let handle = unsafe { CreateEventW(std::ptr::null(), TRUE, FALSE, std::ptr::null()) };
        if handle == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self(handle))
    }

    pub(crate) fn set(&self) {
        // SAFETY: the handle is open until drop.
        unsafe { SetEvent(self.0) };
    }

    pub(crate) fn reset(&self) {
        // SAFETY: the handle is open until drop.
        unsafe { ResetEvent(self.0) };
    }
}

impl Drop for CancelEvent {
    fn drop(&mut self) {
        // SAFETY: the handle was created by `new` and is closed once.
        unsafe { CloseHandle(self.0) };
    }
}

/// Blocks until `target` is signalled, the cancel event is raised, console
/// input arrives (when `watch_console`), or `timeout` elapses.
pub(crate) fn wait_any(
    target: RawHandle,
    cancel: &CancelEvent,
    watch_console: bool,
    timeout: Option<Duration>,
) -> io::Result<WaitSignal> {
    let mut handles = vec![target as HANDLE, cancel.0];
    if watch_console {
        handles.push(console_input());
    }
    let millis = timeout.map_or(INFINITE, |timeout| {
        u32::try_from(timeout.as_millis()).unwrap_or(INFINITE - 1).min(INFINITE - 1)
    });
    // SAFETY: every handle stays open for the duration of the wait.
    let result =
        unsafe { WaitForMultipleObjects(handles.len() as u32, handles.as_ptr(), FALSE, millis) };
    match result {
        WAIT_FAILED => Err(io::Error::last_os_error()),
        WAIT_TIMEOUT => Ok(WaitSignal::Timeout),
        r if r == WAIT_OBJECT_0 => Ok(WaitSignal::Target),
        r if r == WAIT_OBJECT_0 + 1 => Ok(WaitSignal::Cancel),
        r if r == WAIT_OBJECT_0 + 2 => Ok(WaitSignal::ConsoleInput),
        r => Err(io::Error::other(format!("unexpected wait result {r:#x}"))),
    }
}

pub(crate) fn install_interrupt_handler() -> io::Result<()> {
    // SAFETY: the routine only raises an atomic flag.
    check(unsafe { SetConsoleCtrlHandler(Some(on_console_ctrl), TRUE) })
}

fn console_input() -> HANDLE {
    // SAFETY: no preconditions.
    unsafe { GetStdHandle(STD_INPUT_HANDLE) }
}

pub(crate) fn console_has_input() -> bool {
    let mut count = 0u32;
    // SAFETY: `count` outlives the call.
    let ok = unsafe { GetNumberOfConsoleInputEvents(console_input(), &mut count) };
    ok != 0 && count > 0
}

fn modifiers(state: u32) -> Modifiers {
    Modifiers {
        left_ctrl: state & LEFT_CTRL_PRESSED != 0,
        right_ctrl: state & RIGHT_CTRL_PRESSED != 0,
        left_alt: state & LEFT_ALT_PRESSED != 0,
        right_alt: state & RIGHT_ALT_PRESSED != 0,
        shift: state & SHIFT_PRESSED != 0,
    }
}

fn convert_record(record: &INPUT_RECORD) -> InputRecord {
    let kind = u32::from(record.EventType);
    if kind == KEY_EVENT as u32 {
        // SAFETY: EventType selects the KeyEvent member.
        let key = unsafe { record.Event.KeyEvent };
        InputRecord::Key(KeyRecord {
            key_down: key.bKeyDown != 0,
            virtual_key: key.wVirtualKeyCode,
            modifiers: modifiers(key.dwControlKeyState),
        })
    } else if kind == FOCUS_EVENT as u32 {
        // SAFETY: EventType selects the FocusEvent member.
        let focus = unsafe { record.Event.FocusEvent };
        InputRecord::Focus { gained: focus.bSetFocus != 0 }
    } else {
        InputRecord::Other
    }
}

pub(crate) fn console_peek() -> Vec<InputRecord> {
    // SAFETY: INPUT_RECORD is plain data; all-zero is a valid value.
    let mut records: [INPUT_RECORD; PEEK_BATCH] = unsafe { std::mem::zeroed() };
    let mut read = 0u32;
    // SAFETY: the buffer holds PEEK_BATCH records.
    let ok = unsafe {
        PeekConsoleInputW(console_input(), records.as_mut_ptr(), PEEK_BATCH as u32, &mut read)
    };
    if ok == 0 {
        return Vec::new();
    }
    records.iter().take(read as usize).map(convert_record).collect()
}

pub(crate) fn console_discard() {
    // SAFETY: no preconditions.
    if unsafe { FlushConsoleInputBuffer(console_input()) } == 0 {
        tracing::debug!(error = %io::Error::last_os_error(), "flush console input failed");
    }
}

pub(crate) fn console_aliases(exe: &str) -> AliasTable {
    let exe = wide(exe);
    // SAFETY: `exe` is NUL-terminated.
    let bytes = unsafe { GetConsoleAliasesLengthW(exe.as_ptr()) };
    if bytes == 0 {
        return AliasTable::new();
    }
    let mut buffer = vec![0u16; bytes as usize / 2 + 1];
    let capacity = u32::try_from(buffer.len() * 2).unwrap_or(u32::MAX);
    // SAFETY: `capacity` is the buffer size in bytes.
    let written = unsafe { GetConsoleAliasesW(buffer.as_mut_ptr(), capacity, exe.as_ptr()) };
    buffer.truncate(written as usize / 2);

    buffer
        .split(|unit| *unit == 0)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let entry = String::from_utf16_lossy(entry);
            let (name, value) = entry.split_once('=')?;
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

pub(crate) fn set_console_alias(exe: &str, name: &str, value: Option<&str>) -> io::Result<()> {
    let exe = wide(exe);
    let name = wide(name);
    let value = value.map(wide);
    let target = value.as_ref().map_or(std::ptr::null(), |value| value.as_ptr());
    // SAFETY: all strings are NUL-terminated; a null target deletes.
    check(unsafe { AddConsoleAliasW(name.as_ptr(), target, exe.as_ptr()) })
}

pub(crate) fn set_creation_flags(
    command: &mut Command,
    debug: bool,
    new_console: bool,
    new_group: bool,
) {
    let mut flags = 0;
    if debug {
        flags |= DEBUG_PROCESS;
    }
    if new_console {
        flags |= CREATE_NEW_CONSOLE;
    }
    if new_group {
        flags |= CREATE_NEW_PROCESS_GROUP;
    }
    command.creation_flags(flags);
}

pub(crate) fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

pub(crate) fn terminate(child: &mut Child, exit_code: u32) -> io::Result<()> {
    // SAFETY: the handle stays open for the lifetime of `child`.
    check(unsafe { TerminateProcess(raw(child), exit_code) })
}

pub(crate) fn set_priority(child: &Child, priority: Priority) -> io::Result<()> {
    let class = match priority {
        Priority::Idle => IDLE_PRIORITY_CLASS,
        Priority::BelowNormal => BELOW_NORMAL_PRIORITY_CLASS,
        Priority::Normal => NORMAL_PRIORITY_CLASS,
        Priority::AboveNormal => ABOVE_NORMAL_PRIORITY_CLASS,
        Priority::High => HIGH_PRIORITY_CLASS,
        Priority::Realtime => REALTIME_PRIORITY_CLASS,
    };
    // SAFETY: the handle stays open for the lifetime of `child`.
    check(unsafe { SetPriorityClass(raw(child), class) })
}

pub(crate) fn send_break(pid: u32) -> io::Result<()> {
    // SAFETY: no preconditions.
    check(unsafe { GenerateConsoleCtrlEvent(CTRL_BREAK_EVENT, pid) })
}
