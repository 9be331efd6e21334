// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Debugger-side bookkeeping for children launched with environment capture.
//!
//! The OS calls sit behind [`DebugApi`] and [`peb::MemoryReader`]; this
//! module decides how each debug event is answered and when the root
//! child's state is read.

mod children;
pub mod peb;
mod session;

pub use children::{ChildState, DebuggedChild, DebuggedChildren};
pub use session::{DebugSession, SessionOutcome};

use std::path::PathBuf;

use thiserror::Error;

use crate::env::{EnvError, Environment};

/// `STATUS_BREAKPOINT`.
pub const EXCEPTION_BREAKPOINT: u32 = 0x8000_0003;
/// Breakpoint raised by x86 code running under emulation.
pub const EXCEPTION_WX86_BREAKPOINT: u32 = 0x4000_001F;
/// Bytes a breakpoint instruction occupies on MIPS and Alpha.
pub const RISC_BREAKPOINT_LENGTH: u32 = 4;

#[derive(Debug, Error)]
pub enum DebugError {
    #[error("{action} failed: {source}")]
    Os { action: &'static str, source: std::io::Error },

    #[error("cannot read {what} at {address:#x}")]
    Read { what: &'static str, address: u64 },

    #[error("process {pid} has a PEB this shell cannot read")]
    UnsupportedLayout { pid: u32 },

    #[error("environment block is invalid: {0}")]
    Block(#[from] EnvError),

    #[error("debuggee {pid} is not tracked")]
    UnknownChild { pid: u32 },
}

/// How a debug event is continued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueStatus {
    Continue,
    ExceptionNotHandled,
}

/// Debug events with handles of type `H` as delivered by the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugEvent<H> {
    CreateProcess { pid: u32, tid: u32, process: H, thread: H, file: Option<H> },
    ExitProcess { pid: u32, tid: u32, exit_code: u32 },
    CreateThread { pid: u32, tid: u32 },
    ExitThread { pid: u32, tid: u32 },
    LoadDll { pid: u32, tid: u32, file: Option<H> },
    UnloadDll { pid: u32, tid: u32 },
    Exception { pid: u32, tid: u32, code: u32, first_chance: bool },
    OutputDebugString { pid: u32, tid: u32 },
    Rip { pid: u32, tid: u32 },
}

impl<H> DebugEvent<H> {
    pub fn ids(&self) -> (u32, u32) {
        match self {
            DebugEvent::CreateProcess { pid, tid, .. }
            | DebugEvent::ExitProcess { pid, tid, .. }
            | DebugEvent::CreateThread { pid, tid }
            | DebugEvent::ExitThread { pid, tid }
            | DebugEvent::LoadDll { pid, tid, .. }
            | DebugEvent::UnloadDll { pid, tid }
            | DebugEvent::Exception { pid, tid, .. }
            | DebugEvent::OutputDebugString { pid, tid }
            | DebugEvent::Rip { pid, tid } => (*pid, *tid),
        }
    }
}

/// CPU family of the debuggee, as far as breakpoint handling cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    X86,
    X86_64,
    Arm64,
    Mips,
    Alpha,
    Other,
}

impl Architecture {
    pub fn current() -> Self {
        if cfg!(target_arch = "x86") {
            Architecture::X86
        } else if cfg!(target_arch = "x86_64") {
            Architecture::X86_64
        } else if cfg!(target_arch = "aarch64") {
            Architecture::Arm64
        } else if cfg!(any(target_arch = "mips", target_arch = "mips64")) {
            Architecture::Mips
        } else {
            Architecture::Other
        }
    }

    /// Whether the initial breakpoint leaves the instruction pointer on the
    /// breakpoint itself, so the debugger must step over it.
    pub fn steps_over_initial_breakpoint(self) -> bool {
        matches!(self, Architecture::Mips | Architecture::Alpha)
    }
}

/// The state copied out of a child at exit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedState {
    pub environment: Environment,
    pub current_dir: PathBuf,
}

/// The OS debugging interface used by [`DebugSession`].
pub trait DebugApi {
    /// Handle as delivered inside an event; owned by the OS.
    type Handle: Copy + std::fmt::Debug;
    /// Handle the session owns and closes on drop.
    type Owned;

    fn wait_for_event(&mut self) -> Result<DebugEvent<Self::Handle>, DebugError>;

    fn continue_event(&mut self, pid: u32, tid: u32, status: ContinueStatus) -> Result<(), DebugError>;

    fn duplicate(&mut self, handle: Self::Handle) -> Result<Self::Owned, DebugError>;

    /// Closes a file handle delivered with a create or load event.
    fn close_file(&mut self, handle: Self::Handle);

    fn advance_instruction_pointer(&mut self, thread: &Self::Owned, bytes: u32) -> Result<(), DebugError>;

    /// Reads the environment and current directory of a stopped process.
    fn capture(&mut self, pid: u32, process: &Self::Owned) -> Result<CapturedState, DebugError>;

    /// Stops debugging `pid` without killing it.
    fn detach(&mut self, pid: u32) -> Result<(), DebugError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
