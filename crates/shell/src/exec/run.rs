// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launching groups of programs and waiting on them in the foreground.

use std::time::Duration;

use wsh_adapters::{CancelToken, ChildProcess, ConsoleInput, LaunchRequest};
use wsh_core::{
    AliasTable, CapturedState, EnvChange, ExecContext, InputRecord, OutputBuffer, Pipeline,
    WaitController, WaitOutcome, WaitSignal, WaitSource,
};

use super::builtins::Builtin;
use super::error::ExecError;
use super::redirect::{self, ProcessStdio};
use super::{Shell, FAILURE};

/// Whether the chain goes on after a group.
enum Flow {
    Continue(i32),
    /// Cancelled or backgrounded; the rest of the line is skipped.
    Stop(i32),
}

/// How a foreground wait ended.
enum Waited {
    Exited(i32),
    Cancelled(i32),
    Backgrounded,
}

/// A launched program the shell still owns.
struct Running {
    child: Box<dyn ChildProcess>,
    command: String,
    capture: bool,
    graceful: bool,
    /// Console aliases at launch, diffed against the console's at exit.
    aliases: Option<AliasTable>,
    buffer: Option<OutputBuffer>,
}

/// Adapts a child to the wait controller.
struct ChildWait<'a> {
    child: &'a mut dyn ChildProcess,
    cancel: &'a CancelToken,
    console: &'a dyn ConsoleInput,
}

impl WaitSource for ChildWait<'_> {
    fn wait(&mut self, timeout: Option<Duration>, watch_console: bool) -> WaitSignal {
        let console = watch_console.then_some(self.console);
        self.child.wait_for(timeout, self.cancel, console)
    }

    fn peek_input(&mut self) -> Vec<InputRecord> {
        self.console.peek()
    }
}

/// Waits on `child` until it exits, is cancelled, or is backgrounded.
/// Focus loss flags the taskbar once; the flag is cleared on return.
fn wait_foreground(
    child: &mut dyn ChildProcess,
    cancel: &CancelToken,
    console: &dyn ConsoleInput,
    taskbar: &dyn wsh_adapters::Taskbar,
) -> WaitOutcome {
    let mut controller = WaitController::new();
    let mut in_progress = false;
    let outcome = loop {
        let mut source = ChildWait { child: &mut *child, cancel, console };
        match controller.wait(&mut source) {
            WaitOutcome::LoseFocus => {
                if !in_progress {
                    taskbar.set_in_progress(true);
                    in_progress = true;
                }
            }
            outcome => break outcome,
        }
    };
    if in_progress {
        taskbar.set_in_progress(false);
    }
    outcome
}

impl Shell {
    /// Runs the groups of `pipeline` in order, honouring each group's
    /// link to the next.
    pub fn run_pipeline(&mut self, pipeline: &Pipeline) -> i32 {
        let mut code = self.last_exit_code;
        for group in pipeline.groups() {
            match self.run_group(group) {
                Flow::Continue(result) => code = result,
                Flow::Stop(result) => return result,
            }
            let next = group.last().map(|exec| exec.next).unwrap_or_default();
            if self.exit_requested || !next.should_continue(code) {
                break;
            }
        }
        code
    }

    fn run_group(&mut self, group: &[ExecContext]) -> Flow {
        let streams = match redirect::prepare(group, &self.cwd, |exec| {
            exec.program().and_then(Builtin::lookup).is_some()
        }) {
            Ok(streams) => streams,
            Err(e) => {
                self.report(&e);
                return Flow::Continue(FAILURE);
            }
        };

        let mut running = Vec::new();
        let mut last_builtin = None;
        let mut launch_failed = false;
        for (exec, stdio) in group.iter().zip(streams) {
            match exec.program().and_then(Builtin::lookup) {
                Some(builtin) => {
                    last_builtin = Some(self.run_builtin(builtin, exec, stdio));
                    if self.exit_requested {
                        break;
                    }
                }
                None => {
                    last_builtin = None;
                    match self.launch(exec, stdio) {
                        Ok(child) => running.push(child),
                        Err(e) => {
                            self.report(&e);
                            launch_failed = true;
                            break;
                        }
                    }
                }
            }
        }

        let background = group.iter().all(|exec| !exec.wait_for_completion);
        if background {
            for child in running {
                self.create_job(child);
            }
            let code = if launch_failed { FAILURE } else { last_builtin.unwrap_or(0) };
            return Flow::Continue(code);
        }

        let mut code = 0;
        let mut pending = running.into_iter();
        while let Some(child) = pending.next() {
            match self.wait_child(child) {
                Waited::Exited(result) => code = result,
                Waited::Cancelled(result) => {
                    for mut rest in pending {
                        interrupt(&mut rest);
                    }
                    return Flow::Stop(result);
                }
                Waited::Backgrounded => {
                    for rest in pending {
                        rest.child.stop_capture();
                        self.create_job(rest);
                    }
                    return Flow::Stop(0);
                }
            }
        }

        if launch_failed {
            Flow::Continue(FAILURE)
        } else {
            Flow::Continue(last_builtin.unwrap_or(code))
        }
    }

    fn launch(&mut self, exec: &ExecContext, stdio: ProcessStdio) -> Result<Running, ExecError> {
        let ProcessStdio { stdin, stdout, stderr, buffer } = stdio;
        let capture = exec.capture_environment && exec.wait_for_completion;
        let mut request = LaunchRequest::new(exec.argv.clone());
        request.cwd = self.cwd.clone();
        request.env =
            self.env.inheritable().map(|(name, value)| (name.to_string(), value.to_string())).collect();
        request.stdin = stdin;
        request.stdout = stdout;
        request.stderr = stderr;
        request.capture_environment = capture;
        request.new_console = exec.run_on_second_console;
        request.new_group = exec.terminate_gracefully;

        let aliases = capture.then(|| self.console_aliases.snapshot());
        let child = self.launcher.launch(request)?;
        tracing::debug!(pid = child.pid(), command = %exec, "launched");
        Ok(Running {
            child,
            command: exec.command_line(),
            capture,
            graceful: exec.terminate_gracefully,
            aliases,
            buffer,
        })
    }

    fn wait_child(&mut self, mut running: Running) -> Waited {
        let outcome = wait_foreground(
            running.child.as_mut(),
            &self.cancel,
            self.console.as_ref(),
            self.taskbar.as_ref(),
        );
        match outcome {
            WaitOutcome::Cancel => {
                let code = interrupt(&mut running);
                self.cancel.reset();
                Waited::Cancelled(code)
            }
            WaitOutcome::Background => {
                running.child.stop_capture();
                self.console.discard_pending();
                self.create_job(running);
                Waited::Backgrounded
            }
            // LoseFocus never leaves wait_foreground.
            WaitOutcome::ProcessExit | WaitOutcome::LoseFocus => Waited::Exited(self.reap(running)),
        }
    }

    /// Collects the exit code and, when captured, the child's final state.
    fn reap(&mut self, mut running: Running) -> i32 {
        let code = match running.child.wait() {
            Ok(code) => code,
            Err(e) => {
                tracing::warn!(command = %running.command, error = %e, "wait failed");
                FAILURE
            }
        };
        if running.capture {
            match running.child.take_captured_state() {
                Some(state) => self.apply_captured(state, running.aliases.take()),
                None => tracing::debug!(command = %running.command, "no state captured"),
            }
        }
        code
    }

    /// Adopts a child's environment and directory, and any alias changes it
    /// made in the console. Drive records (`=C:`) the child lacks are kept.
    fn apply_captured(&mut self, state: CapturedState, aliases_before: Option<AliasTable>) {
        let mut changes = self.env.diff(&state.environment);
        changes.retain(|change| !matches!(change, EnvChange::Remove { name } if name.starts_with('=')));
        self.env.apply(&changes);
        if !state.current_dir.as_os_str().is_empty() {
            self.cwd = state.current_dir;
        }
        if let Some(before) = aliases_before {
            let alias_changes = before.diff(&self.console_aliases.snapshot());
            self.aliases.apply(&alias_changes);
        }
        tracing::debug!(changes = changes.len(), cwd = %self.cwd.display(), "applied child state");
    }

    fn create_job(&mut self, running: Running) {
        let (_, notice) = self.jobs.create(running.child, running.command, running.buffer);
        self.stdout.line(&notice.to_string());
    }

    /// `job -w`: waits on a job like a foreground program.
    pub(super) fn wait_job(&mut self, id: wsh_core::JobId) -> Result<WaitOutcome, ExecError> {
        let cancel = self.cancel.clone();
        let console = std::sync::Arc::clone(&self.console);
        let taskbar = std::sync::Arc::clone(&self.taskbar);
        let outcome = self.jobs.wait(id, |child| {
            wait_foreground(child.as_mut(), &cancel, console.as_ref(), taskbar.as_ref())
        })?;
        if outcome == WaitOutcome::Cancel {
            self.cancel.reset();
        }
        Ok(outcome)
    }
}

/// Interrupts a cancelled child and waits for it to go.
fn interrupt(running: &mut Running) -> i32 {
    if let Err(e) = running.child.interrupt(running.graceful) {
        tracing::warn!(command = %running.command, error = %e, "interrupt failed");
    }
    running.child.wait().unwrap_or(FAILURE)
}
