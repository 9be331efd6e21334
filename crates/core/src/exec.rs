// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plans for launching programs, produced by the command-line planner and
//! consumed by the pipeline executor.

use std::fmt;
use std::path::PathBuf;

/// Where a program's standard input comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputRedirect {
    /// Inherit the shell's input.
    #[default]
    Default,
    File(PathBuf),
    Null,
    /// Read from the previous program's output pipe.
    Pipe,
}

/// Where a program's standard output or error goes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputRedirect {
    /// Inherit the shell's stream.
    #[default]
    Default,
    Overwrite(PathBuf),
    Append(PathBuf),
    Null,
    /// Feed the next program's input pipe.
    Pipe,
    /// Retain in a job output buffer.
    Buffer,
    /// Share the other output stream (`2>&1`, `1>&2`).
    ToOther,
}

impl OutputRedirect {
    pub fn is_file(&self) -> bool {
        matches!(self, OutputRedirect::Overwrite(_) | OutputRedirect::Append(_))
    }
}

/// Rule deciding whether the following program runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NextCondition {
    /// Run after this one completes, whatever its result (`&`).
    Unconditional,
    /// Launch before waiting on this one (`|`).
    Concurrent,
    /// Run only if this one failed (`||`).
    OnFailure,
    /// Run only if this one succeeded (`&&`).
    OnSuccess,
    /// End of the chain.
    #[default]
    Never,
}

impl NextCondition {
    /// Whether the following program runs given this one's exit code.
    pub fn should_continue(self, exit_code: i32) -> bool {
        match self {
            NextCondition::Unconditional | NextCondition::Concurrent => true,
            NextCondition::OnSuccess => exit_code == 0,
            NextCondition::OnFailure => exit_code != 0,
            NextCondition::Never => false,
        }
    }
}

/// A plan to invoke one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecContext {
    pub argv: Vec<String>,
    pub stdin: InputRedirect,
    pub stdout: OutputRedirect,
    pub stderr: OutputRedirect,
    pub wait_for_completion: bool,
    /// Run under the debugger and copy the child's environment back on exit.
    pub capture_environment: bool,
    pub run_on_second_console: bool,
    /// Keep `^` escapes when re-quoting arguments for a subshell.
    pub include_escapes: bool,
    /// Cancel with Ctrl+Break instead of terminating.
    pub terminate_gracefully: bool,
    pub next: NextCondition,
}

impl ExecContext {
    pub fn new(argv: Vec<String>) -> Self {
        Self {
            argv,
            stdin: InputRedirect::Default,
            stdout: OutputRedirect::Default,
            stderr: OutputRedirect::Default,
            wait_for_completion: true,
            capture_environment: true,
            run_on_second_console: false,
            include_escapes: false,
            terminate_gracefully: false,
            next: NextCondition::Never,
        }
    }

    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    /// The argument vector re-quoted as a single command line.
    pub fn command_line(&self) -> String {
        join_arguments(&self.argv, self.include_escapes)
    }

    /// Plans a program launched by `start`: its own process group, cancelled
    /// with Ctrl+Break, with a command line that keeps `^` escapes. Without
    /// `wait` it becomes a job; on the shell's console its output is buffered.
    pub fn into_started(mut self, new_console: bool, wait: bool) -> Self {
        self.terminate_gracefully = true;
        self.include_escapes = true;
        self.capture_environment = false;
        self.run_on_second_console = new_console;
        if wait {
            self
        } else if new_console {
            self.wait_for_completion = false;
            self
        } else {
            self.into_background()
        }
    }

    /// Marks this program as a background job with buffered output.
    pub fn into_background(mut self) -> Self {
        self.wait_for_completion = false;
        self.capture_environment = false;
        if self.stdout == OutputRedirect::Default {
            self.stdout = OutputRedirect::Buffer;
        }
        if self.stderr == OutputRedirect::Default {
            self.stderr = OutputRedirect::Buffer;
        }
        self
    }
}

impl fmt::Display for ExecContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Quotes `arg` if it contains whitespace or shell operators.
pub fn quote_argument(arg: &str, include_escapes: bool) -> String {
    let needs_quotes = arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || "&|<>".contains(c));
    let escaped = if include_escapes { arg.replace('^', "^^") } else { arg.to_string() };
    if needs_quotes {
        format!("\"{escaped}\"")
    } else {
        escaped
    }
}

pub fn join_arguments<S: AsRef<str>>(args: &[S], include_escapes: bool) -> String {
    args.iter()
        .map(|arg| quote_argument(arg.as_ref(), include_escapes))
        .collect::<Vec<_>>()
        .join(" ")
}

/// An ordered chain of programs joined by [`NextCondition`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    pub execs: Vec<ExecContext>,
}

impl Pipeline {
    pub fn new(execs: Vec<ExecContext>) -> Self {
        Self { execs }
    }

    pub fn is_empty(&self) -> bool {
        self.execs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.execs.len()
    }

    /// Splits the chain into groups launched together: each group is a run
    /// of `Concurrent` links ended by the first non-concurrent condition.
    pub fn groups(&self) -> Vec<&[ExecContext]> {
        let mut groups = Vec::new();
        let mut start = 0;
        for (index, exec) in self.execs.iter().enumerate() {
            if exec.next != NextCondition::Concurrent {
                groups.push(&self.execs[start..=index]);
                start = index + 1;
            }
        }
        if start < self.execs.len() {
            groups.push(&self.execs[start..]);
        }
        groups
    }
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
