// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(coverage_nightly, coverage(off))]

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use wsh_core::debug::CapturedState;
use wsh_core::job::{JobProcess, Priority, TERMINATED_EXIT_CODE};
use wsh_core::wait::WaitSignal;

use super::{ChildProcess, LaunchError, LaunchRequest, ProcessLauncher, StdioSpec};
use crate::cancel::CancelToken;
use crate::console::ConsoleInput;

struct FakeChildState {
    pid: u32,
    /// Code used when the child is left to run to completion.
    natural_exit: i32,
    exit_code: Option<i32>,
    output: Vec<u8>,
    captured: Option<CapturedState>,
    capture: bool,
    terminated_with: Option<u32>,
    interrupts: Vec<bool>,
    priority: Option<Priority>,
}

/// Scripted child process. Clones share state, so a test can keep a handle
/// after giving the child to a launcher.
///
/// A child waited on with nothing else pending runs to completion.
#[derive(Clone)]
pub struct FakeChild {
    inner: Arc<Mutex<FakeChildState>>,
}

impl FakeChild {
    pub fn new(exit_code: i32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeChildState {
                pid: 0,
                natural_exit: exit_code,
                exit_code: None,
                output: Vec::new(),
                captured: None,
                capture: true,
                terminated_with: None,
                interrupts: Vec::new(),
                priority: None,
            })),
        }
    }

    /// Bytes written to the child's stdout when it is a file or pipe.
    pub fn with_output(self, output: impl Into<Vec<u8>>) -> Self {
        self.inner.lock().output = output.into();
        self
    }

    /// State reported at exit when capture is still enabled.
    pub fn with_captured(self, state: CapturedState) -> Self {
        self.inner.lock().captured = Some(state);
        self
    }

    pub fn finish(&self, exit_code: i32) {
        self.inner.lock().exit_code.get_or_insert(exit_code);
    }

    pub fn is_finished(&self) -> bool {
        self.inner.lock().exit_code.is_some()
    }

    pub fn capture_stopped(&self) -> bool {
        !self.inner.lock().capture
    }

    pub fn terminated_with(&self) -> Option<u32> {
        self.inner.lock().terminated_with
    }

    /// The `graceful` flag of each interrupt.
    pub fn interrupts(&self) -> Vec<bool> {
        self.inner.lock().interrupts.clone()
    }

    pub fn priority(&self) -> Option<Priority> {
        self.inner.lock().priority
    }

    fn run_to_completion(&self) -> i32 {
        let mut inner = self.inner.lock();
        let natural = inner.natural_exit;
        *inner.exit_code.get_or_insert(natural)
    }
}

impl JobProcess for FakeChild {
    fn pid(&self) -> u32 {
        self.inner.lock().pid
    }

    fn poll_exit(&mut self) -> io::Result<Option<i32>> {
        Ok(self.inner.lock().exit_code)
    }

    fn terminate(&mut self, exit_code: u32) -> io::Result<()> {
        let mut inner = self.inner.lock();
        inner.terminated_with = Some(exit_code);
        inner.exit_code.get_or_insert(exit_code as i32);
        Ok(())
    }

    fn set_priority(&mut self, priority: Priority) -> io::Result<()> {
        self.inner.lock().priority = Some(priority);
        Ok(())
    }
}

impl ChildProcess for FakeChild {
    fn wait_for(
        &mut self,
        timeout: Option<Duration>,
        cancel: &CancelToken,
        console: Option<&dyn ConsoleInput>,
    ) -> WaitSignal {
        if self.is_finished() {
            return WaitSignal::Target;
        }
        if cancel.is_cancelled() {
            return WaitSignal::Cancel;
        }
        if console.is_some_and(|console| console.has_input()) {
            return WaitSignal::ConsoleInput;
        }
        if timeout.is_some() {
            return WaitSignal::Timeout;
        }
        self.run_to_completion();
        WaitSignal::Target
    }

    fn wait(&mut self) -> io::Result<i32> {
        Ok(self.run_to_completion())
    }

    fn stop_capture(&self) {
        self.inner.lock().capture = false;
    }

    fn take_captured_state(&mut self) -> Option<CapturedState> {
        let mut inner = self.inner.lock();
        if inner.capture {
            inner.captured.take()
        } else {
            None
        }
    }

    fn interrupt(&mut self, graceful: bool) -> io::Result<()> {
        let mut inner = self.inner.lock();
        inner.interrupts.push(graceful);
        inner.exit_code.get_or_insert(TERMINATED_EXIT_CODE as i32);
        Ok(())
    }
}

/// A request as the fake launcher saw it.
#[derive(Debug, Clone)]
pub struct LaunchRecord {
    pub argv: Vec<String>,
    pub cwd: PathBuf,
    pub env: Vec<(String, String)>,
    pub capture_environment: bool,
    pub new_console: bool,
    pub new_group: bool,
    /// Everything readable from a file or pipe stdin at launch.
    pub stdin_data: Vec<u8>,
    pub stdout: &'static str,
    pub stderr: &'static str,
}

impl LaunchRecord {
    pub fn env_var(&self, name: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

fn kind(spec: &StdioSpec) -> &'static str {
    match spec {
        StdioSpec::Inherit => "inherit",
        StdioSpec::Null => "null",
        StdioSpec::File(_) => "file",
        StdioSpec::PipeRead(_) => "pipe-read",
        StdioSpec::PipeWrite(_) => "pipe-write",
        StdioSpec::ParentStdout => "parent-stdout",
        StdioSpec::ParentStderr => "parent-stderr",
    }
}

fn read_all(spec: &mut StdioSpec) -> Vec<u8> {
    let mut data = Vec::new();
    let result = match spec {
        StdioSpec::File(file) => file.read_to_end(&mut data),
        StdioSpec::PipeRead(pipe) => pipe.read_to_end(&mut data),
        _ => Ok(0),
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, "fake child could not read stdin");
    }
    data
}

fn write_all(spec: &mut StdioSpec, bytes: &[u8]) -> io::Result<()> {
    match spec {
        StdioSpec::File(file) => file.write_all(bytes),
        StdioSpec::PipeWrite(pipe) => pipe.write_all(bytes),
        _ => Ok(()),
    }
}

#[derive(Default)]
struct FakeLauncherState {
    launches: Vec<LaunchRecord>,
    children: VecDeque<FakeChild>,
    failures: VecDeque<bool>,
    next_pid: u32,
}

/// Launcher returning scripted [`FakeChild`]ren in order; when none are
/// queued each launch gets a child that exits 0.
#[derive(Clone, Default)]
pub struct FakeLauncher {
    inner: Arc<Mutex<FakeLauncherState>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_child(&self, child: FakeChild) -> &Self {
        self.inner.lock().children.push_back(child);
        self
    }

    /// Makes the next launch fail, as a redirection or a spawn failure.
    pub fn fail_next(&self, redirect: bool) {
        self.inner.lock().failures.push_back(redirect);
    }

    pub fn launches(&self) -> Vec<LaunchRecord> {
        self.inner.lock().launches.clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.inner.lock().launches.iter().filter_map(|l| l.argv.first().cloned()).collect()
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&self, mut request: LaunchRequest) -> Result<Box<dyn ChildProcess>, LaunchError> {
        if request.argv.is_empty() {
            return Err(LaunchError::Empty);
        }
        let mut inner = self.inner.lock();
        if let Some(redirect) = inner.failures.pop_front() {
            let source = io::Error::new(io::ErrorKind::NotFound, "scripted failure");
            return Err(if redirect {
                LaunchError::Redirect(source)
            } else {
                LaunchError::Spawn { program: request.program().to_string(), source }
            });
        }

        inner.next_pid += 1;
        let child = inner.children.pop_front().unwrap_or_else(|| FakeChild::new(0));
        child.inner.lock().pid = 1000 + inner.next_pid;

        let stdin_data = read_all(&mut request.stdin);
        let output = child.inner.lock().output.clone();
        write_all(&mut request.stdout, &output).map_err(LaunchError::Redirect)?;

        inner.launches.push(LaunchRecord {
            stdout: kind(&request.stdout),
            stderr: kind(&request.stderr),
            argv: request.argv,
            cwd: request.cwd,
            env: request.env,
            capture_environment: request.capture_environment,
            new_console: request.new_console,
            new_group: request.new_group,
            stdin_data,
        });
        Ok(Box::new(child))
    }
}
