// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![allow(unsafe_code)]

use std::io;
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::process::{Child, Command, ExitStatus};

use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::unistd::Pid;
use wsh_core::alias::AliasTable;
use wsh_core::job::Priority;
use wsh_core::wait::InputRecord;

extern "C" fn on_interrupt(_: nix::libc::c_int) {
    crate::cancel::raise_console_token();
}

pub(crate) fn install_interrupt_handler() -> io::Result<()> {
    let action =
        SigAction::new(SigHandler::Handler(on_interrupt), SaFlags::SA_RESTART, SigSet::empty());
    // SAFETY: the handler only performs an atomic store.
    unsafe { signal::sigaction(Signal::SIGINT, &action) }?;
    Ok(())
}

// A terminal exposes no peekable key-event queue.

pub(crate) fn console_has_input() -> bool {
    false
}

pub(crate) fn console_peek() -> Vec<InputRecord> {
    Vec::new()
}

pub(crate) fn console_discard() {}

pub(crate) fn console_aliases(_exe: &str) -> AliasTable {
    AliasTable::new()
}

pub(crate) fn set_console_alias(_exe: &str, _name: &str, _value: Option<&str>) -> io::Result<()> {
    Ok(())
}

pub(crate) fn set_creation_flags(
    command: &mut Command,
    _debug: bool,
    _new_console: bool,
    new_group: bool,
) {
    if new_group {
        command.process_group(0);
    }
}

/// Signal deaths map to `128 + signal`, as shells report them.
pub(crate) fn exit_code(status: ExitStatus) -> i32 {
    status.code().or_else(|| status.signal().map(|signal| 128 + signal)).unwrap_or(1)
}

/// SIGKILL; the exit code cannot be chosen on Unix.
pub(crate) fn terminate(child: &mut Child, _exit_code: u32) -> io::Result<()> {
    match child.kill() {
        Err(e) if e.kind() == io::ErrorKind::InvalidInput => Ok(()),
        other => other,
    }
}

pub(crate) fn set_priority(_child: &Child, priority: Priority) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("priority class {priority:?} is not supported on this platform"),
    ))
}

pub(crate) fn send_break(pid: u32) -> io::Result<()> {
    let pid = i32::try_from(pid).map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;
    signal::kill(Pid::from_raw(pid), Signal::SIGINT)?;
    Ok(())
}
