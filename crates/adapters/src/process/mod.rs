// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launching programs and waiting on them.

mod system;

pub use system::{SystemChild, SystemLauncher};
#[cfg(windows)]
pub(crate) use system::build_command;

use std::fs::File;
use std::io::{self, PipeReader, PipeWriter};
use std::path::PathBuf;
use std::process::Stdio;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use wsh_core::debug::CapturedState;
use wsh_core::job::JobProcess;
use wsh_core::wait::WaitSignal;

use crate::cancel::CancelToken;
use crate::console::ConsoleInput;

/// Granularity of polling waits, used where no OS handle can be waited on.
const POLL_SLICE: Duration = Duration::from_millis(10);

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("empty command")]
    Empty,

    /// Standard handles could not be prepared for the child.
    #[error("redirection failed: {0}")]
    Redirect(#[source] io::Error),

    #[error("{program}: {source}")]
    Spawn { program: String, source: io::Error },
}

impl LaunchError {
    pub fn is_redirect(&self) -> bool {
        matches!(self, LaunchError::Redirect(_))
    }
}

/// One standard handle of a child, already opened by the caller.
#[derive(Debug, Default)]
pub enum StdioSpec {
    #[default]
    Inherit,
    Null,
    File(File),
    PipeRead(PipeReader),
    PipeWrite(PipeWriter),
    /// The shell's own stdout, used for `1>&2`/`2>&1` onto an inherited stream.
    ParentStdout,
    ParentStderr,
}

impl StdioSpec {
    /// A second handle to the same target.
    pub fn try_clone(&self) -> io::Result<StdioSpec> {
        Ok(match self {
            StdioSpec::Inherit => StdioSpec::Inherit,
            StdioSpec::Null => StdioSpec::Null,
            StdioSpec::File(file) => StdioSpec::File(file.try_clone()?),
            StdioSpec::PipeRead(pipe) => StdioSpec::PipeRead(pipe.try_clone()?),
            StdioSpec::PipeWrite(pipe) => StdioSpec::PipeWrite(pipe.try_clone()?),
            StdioSpec::ParentStdout => StdioSpec::ParentStdout,
            StdioSpec::ParentStderr => StdioSpec::ParentStderr,
        })
    }

    pub(crate) fn into_stdio(self) -> Stdio {
        match self {
            StdioSpec::Inherit => Stdio::inherit(),
            StdioSpec::Null => Stdio::null(),
            StdioSpec::File(file) => Stdio::from(file),
            StdioSpec::PipeRead(pipe) => Stdio::from(pipe),
            StdioSpec::PipeWrite(pipe) => Stdio::from(pipe),
            StdioSpec::ParentStdout => Stdio::from(io::stdout()),
            StdioSpec::ParentStderr => Stdio::from(io::stderr()),
        }
    }
}

/// Everything needed to start one program.
#[derive(Debug, Default)]
pub struct LaunchRequest {
    pub argv: Vec<String>,
    pub cwd: PathBuf,
    /// The complete environment of the child.
    pub env: Vec<(String, String)>,
    pub stdin: StdioSpec,
    pub stdout: StdioSpec,
    pub stderr: StdioSpec,
    /// Launch under the debugger so the environment can be read at exit.
    pub capture_environment: bool,
    pub new_console: bool,
    /// Start a process group so Ctrl+Break can be sent to it alone.
    pub new_group: bool,
}

impl LaunchRequest {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv, ..Self::default() }
    }

    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or("")
    }
}

/// A running child the shell can wait on or hand to the job table.
pub trait ChildProcess: JobProcess {
    /// Blocks until the child exits, `cancel` is raised, `console` has
    /// input, or `timeout` elapses.
    fn wait_for(
        &mut self,
        timeout: Option<Duration>,
        cancel: &CancelToken,
        console: Option<&dyn ConsoleInput>,
    ) -> WaitSignal;

    /// Blocks until exit and returns the exit code.
    fn wait(&mut self) -> io::Result<i32>;

    /// Skip reading the child's state at exit (it was backgrounded).
    fn stop_capture(&self);

    /// State read from the child as it exited, once.
    fn take_captured_state(&mut self) -> Option<CapturedState>;

    /// Ctrl+Break when `graceful`, otherwise forced termination.
    fn interrupt(&mut self, graceful: bool) -> io::Result<()>;
}

pub trait ProcessLauncher: Send + Sync {
    fn launch(&self, request: LaunchRequest) -> Result<Box<dyn ChildProcess>, LaunchError>;
}

/// Polls `exited`, `cancel` and `console` until one fires or `timeout` passes.
pub(crate) fn poll_wait<F>(
    mut exited: F,
    timeout: Option<Duration>,
    cancel: &CancelToken,
    console: Option<&dyn ConsoleInput>,
) -> WaitSignal
where
    F: FnMut() -> bool,
{
    let deadline = timeout.map(|timeout| Instant::now() + timeout);
    loop {
        if exited() {
            return WaitSignal::Target;
        }
        if cancel.is_cancelled() {
            return WaitSignal::Cancel;
        }
        if console.is_some_and(|console| console.has_input()) {
            return WaitSignal::ConsoleInput;
        }
        let slice = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return WaitSignal::Timeout;
                }
                POLL_SLICE.min(deadline - now)
            }
            None => POLL_SLICE,
        };
        thread::sleep(slice);
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeChild, FakeLauncher, LaunchRecord};

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
