// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{
    Architecture, CapturedState, ChildState, ContinueStatus, DebugApi, DebugError, DebugEvent,
    DebuggedChildren, EXCEPTION_BREAKPOINT, EXCEPTION_WX86_BREAKPOINT, RISC_BREAKPOINT_LENGTH,
};

/// Result of pumping events until the root debuggee exited.
#[derive(Debug)]
pub struct SessionOutcome {
    pub exit_code: u32,
    /// Present when capture was still requested at exit and succeeded.
    pub captured: Option<CapturedState>,
    /// Why a requested capture produced nothing.
    pub capture_error: Option<DebugError>,
}

/// Event loop for one debugger-launched child and its descendants.
pub struct DebugSession<A: DebugApi> {
    api: A,
    root_pid: u32,
    capture: Arc<AtomicBool>,
    architecture: Architecture,
    children: DebuggedChildren<A::Owned>,
}

impl<A: DebugApi> DebugSession<A> {
    /// `capture` may be cleared from another thread (e.g. when the child is
    /// backgrounded) to skip reading the child's state at exit.
    pub fn new(api: A, root_pid: u32, capture: Arc<AtomicBool>) -> Self {
        Self {
            api,
            root_pid,
            capture,
            architecture: Architecture::current(),
            children: DebuggedChildren::new(),
        }
    }

    pub fn architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = architecture;
        self
    }

    pub fn children(&self) -> &DebuggedChildren<A::Owned> {
        &self.children
    }

    /// Pumps events until the root child's exit has been continued.
    pub fn run(mut self) -> Result<SessionOutcome, DebugError> {
        let span = tracing::info_span!("debug.pump", root = self.root_pid);
        let _guard = span.enter();

        let outcome = loop {
            let event = self.api.wait_for_event()?;
            let (pid, tid) = event.ids();
            let mut finished = None;

            let status = match event {
                DebugEvent::CreateProcess { process, thread, file, .. } => {
                    if let Some(file) = file {
                        self.api.close_file(file);
                    }
                    let process = self.api.duplicate(process)?;
                    let thread = self.api.duplicate(thread)?;
                    self.children.insert(pid, tid, process, thread);
                    tracing::debug!(pid, "debuggee created");
                    ContinueStatus::Continue
                }
                DebugEvent::ExitProcess { exit_code, .. } => {
                    if let Some(child) = self.children.get_mut(pid) {
                        child.state = ChildState::Exited;
                    }
                    if pid == self.root_pid {
                        finished = Some(self.finish(pid, exit_code));
                    }
                    self.children.remove(pid);
                    tracing::debug!(pid, exit_code, "debuggee exited");
                    ContinueStatus::Continue
                }
                DebugEvent::LoadDll { file, .. } => {
                    if let Some(file) = file {
                        self.api.close_file(file);
                    }
                    ContinueStatus::Continue
                }
                DebugEvent::Exception { code, first_chance, .. } => {
                    self.on_exception(pid, code, first_chance)?
                }
                DebugEvent::CreateThread { .. }
                | DebugEvent::ExitThread { .. }
                | DebugEvent::UnloadDll { .. }
                | DebugEvent::OutputDebugString { .. }
                | DebugEvent::Rip { .. } => ContinueStatus::Continue,
            };

            self.api.continue_event(pid, tid, status)?;
            if let Some(child) = self.children.get_mut(pid) {
                if child.state == ChildState::Created {
                    child.state = ChildState::Running;
                }
            }
            if let Some(outcome) = finished {
                break outcome;
            }
        };

        for pid in self.children.pids() {
            if let Err(e) = self.api.detach(pid) {
                tracing::warn!(pid, error = %e, "detaching from debuggee failed");
            }
            self.children.remove(pid);
        }
        Ok(outcome)
    }

    fn finish(&mut self, pid: u32, exit_code: u32) -> SessionOutcome {
        let mut outcome = SessionOutcome { exit_code, captured: None, capture_error: None };
        if !self.capture.load(Ordering::SeqCst) {
            tracing::debug!(pid, "capture cancelled before exit");
            return outcome;
        }
        let Some(child) = self.children.get(pid) else {
            outcome.capture_error = Some(DebugError::UnknownChild { pid });
            return outcome;
        };
        match self.api.capture(pid, &child.process) {
            Ok(state) => outcome.captured = Some(state),
            Err(e) => {
                tracing::warn!(pid, error = %e, "environment capture failed");
                outcome.capture_error = Some(e);
            }
        }
        outcome
    }

    fn on_exception(
        &mut self,
        pid: u32,
        code: u32,
        first_chance: bool,
    ) -> Result<ContinueStatus, DebugError> {
        if code != EXCEPTION_BREAKPOINT && code != EXCEPTION_WX86_BREAKPOINT {
            tracing::trace!(pid, code = format_args!("{code:#x}"), first_chance, "passing exception");
            return Ok(ContinueStatus::ExceptionNotHandled);
        }
        if self.architecture.steps_over_initial_breakpoint() {
            if let Some(child) = self.children.get_mut(pid) {
                if !child.stepped_initial_breakpoint {
                    child.stepped_initial_breakpoint = true;
                    self.api.advance_instruction_pointer(&child.thread, RISC_BREAKPOINT_LENGTH)?;
                }
            }
        }
        Ok(ContinueStatus::Continue)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
