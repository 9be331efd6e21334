// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io;
use std::process::{Child, Command};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use wsh_core::debug::{CapturedState, DebugError, SessionOutcome};
use wsh_core::job::{JobProcess, Priority, TERMINATED_EXIT_CODE};
use wsh_core::wait::WaitSignal;

use super::{poll_wait, ChildProcess, LaunchError, LaunchRequest, ProcessLauncher};
use crate::cancel::CancelToken;
use crate::console::ConsoleInput;

pub(crate) type PumpHandle = JoinHandle<Result<SessionOutcome, DebugError>>;

/// Launches programs with `std::process::Command`. On Windows, requests
/// that capture the environment run under a debug pump thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl SystemLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, request: LaunchRequest) -> Result<Box<dyn ChildProcess>, LaunchError> {
        if request.argv.is_empty() {
            return Err(LaunchError::Empty);
        }
        let program = request.program().to_string();
        let _span = tracing::info_span!("process.launch", %program).entered();

        #[cfg(windows)]
        if request.capture_environment {
            let child = crate::sys::launch_debugged(request)?;
            tracing::info!(pid = child.pid(), "launched under debugger");
            return Ok(Box::new(child));
        }

        let mut command = build_command(request, false);
        let child = command.spawn().map_err(|source| LaunchError::Spawn { program, source })?;
        // Drop the parent's copies of the child's handles now.
        drop(command);
        tracing::info!(pid = child.id(), "launched");
        Ok(Box::new(SystemChild::new(child)))
    }
}

pub(crate) fn build_command(request: LaunchRequest, debug: bool) -> Command {
    let LaunchRequest { argv, cwd, env, stdin, stdout, stderr, new_console, new_group, .. } =
        request;
    let mut command = Command::new(argv.first().map(String::as_str).unwrap_or_default());
    command
        .args(argv.iter().skip(1))
        .env_clear()
        .envs(env)
        .stdin(stdin.into_stdio())
        .stdout(stdout.into_stdio())
        .stderr(stderr.into_stdio());
    if !cwd.as_os_str().is_empty() {
        command.current_dir(cwd);
    }
    crate::sys::set_creation_flags(&mut command, debug, new_console, new_group);
    command
}

/// A child started by [`SystemLauncher`].
pub struct SystemChild {
    child: Child,
    exit_code: Option<i32>,
    capture: Arc<AtomicBool>,
    captured: Option<CapturedState>,
    pump: Option<PumpHandle>,
}

impl SystemChild {
    pub(crate) fn new(child: Child) -> Self {
        Self {
            child,
            exit_code: None,
            capture: Arc::new(AtomicBool::new(false)),
            captured: None,
            pump: None,
        }
    }

    #[cfg_attr(not(windows), allow(dead_code))]
    pub(crate) fn debugged(child: Child, pump: PumpHandle, capture: Arc<AtomicBool>) -> Self {
        Self { child, exit_code: None, capture, captured: None, pump: Some(pump) }
    }

    fn finish_pump(&mut self) {
        let Some(pump) = self.pump.take() else {
            return;
        };
        match pump.join() {
            Ok(Ok(outcome)) => {
                self.exit_code = Some(outcome.exit_code as i32);
                if let Some(e) = &outcome.capture_error {
                    tracing::warn!(pid = self.child.id(), error = %e, "environment not captured");
                }
                self.captured = outcome.captured;
            }
            Ok(Err(e)) => tracing::warn!(pid = self.child.id(), error = %e, "debug pump failed"),
            Err(_) => tracing::error!(pid = self.child.id(), "debug pump panicked"),
        }
    }

    fn exited(&mut self) -> bool {
        !matches!(self.poll_exit(), Ok(None))
    }

    /// Blocks on the pump thread (or the process when there is no pump)
    /// together with the cancel event and console input. `None` means the
    /// handles are unavailable and the caller polls instead.
    #[cfg(windows)]
    fn wait_on_handles(
        &mut self,
        timeout: Option<Duration>,
        cancel: &CancelToken,
        console: Option<&dyn ConsoleInput>,
    ) -> Option<WaitSignal> {
        use std::os::windows::io::AsRawHandle;

        if self.exit_code.is_some() {
            return Some(WaitSignal::Target);
        }
        let event = cancel.event()?;
        let watch_console = match console {
            None => false,
            Some(console) if console.is_system_console() => true,
            Some(_) => return None,
        };
        let target = match &self.pump {
            Some(pump) => pump.as_raw_handle(),
            None => self.child.as_raw_handle(),
        };
        match crate::sys::wait_any(target, event, watch_console, timeout) {
            Ok(signal) => Some(signal),
            Err(e) => {
                tracing::warn!(pid = self.child.id(), error = %e, "blocking wait failed");
                None
            }
        }
    }
}

impl JobProcess for SystemChild {
    fn pid(&self) -> u32 {
        self.child.id()
    }

    fn poll_exit(&mut self) -> io::Result<Option<i32>> {
        if let Some(code) = self.exit_code {
            return Ok(Some(code));
        }
        if let Some(pump) = &self.pump {
            if !pump.is_finished() {
                return Ok(None);
            }
            self.finish_pump();
        }
        Ok(self
            .child
            .try_wait()?
            .map(|status| *self.exit_code.get_or_insert(crate::sys::exit_code(status))))
    }

    fn terminate(&mut self, exit_code: u32) -> io::Result<()> {
        crate::sys::terminate(&mut self.child, exit_code)
    }

    fn set_priority(&mut self, priority: Priority) -> io::Result<()> {
        crate::sys::set_priority(&self.child, priority)
    }
}

impl ChildProcess for SystemChild {
    fn wait_for(
        &mut self,
        timeout: Option<Duration>,
        cancel: &CancelToken,
        console: Option<&dyn ConsoleInput>,
    ) -> WaitSignal {
        #[cfg(windows)]
        if let Some(signal) = self.wait_on_handles(timeout, cancel, console) {
            return signal;
        }
        poll_wait(|| self.exited(), timeout, cancel, console)
    }

    fn wait(&mut self) -> io::Result<i32> {
        self.finish_pump();
        let status = self.child.wait()?;
        Ok(*self.exit_code.get_or_insert(crate::sys::exit_code(status)))
    }

    fn stop_capture(&self) {
        self.capture.store(false, Ordering::SeqCst);
    }

    fn take_captured_state(&mut self) -> Option<CapturedState> {
        self.captured.take()
    }

    fn interrupt(&mut self, graceful: bool) -> io::Result<()> {
        tracing::debug!(pid = self.child.id(), graceful, "interrupting child");
        if graceful {
            crate::sys::send_break(self.child.id())
        } else {
            self.terminate(TERMINATED_EXIT_CODE)
        }
    }
}

#[cfg(all(test, unix))]
#[path = "system_tests.rs"]
mod tests;

#[cfg(all(test, windows))]
#[path = "system_windows_tests.rs"]
mod windows_tests;
