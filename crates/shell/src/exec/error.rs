// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution error types.

use std::io;
use std::path::PathBuf;

use wsh_adapters::LaunchError;
use wsh_core::job::JobError;
use wsh_core::script::ScriptError;

/// Errors reported while running a command line. Each becomes a
/// `wsh: <action> failed: <reason>` line and a non-zero exit code.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error(transparent)]
    Parse(#[from] crate::ParseError),

    /// The program could not be started.
    #[error("{program}: {source}")]
    SpawnFailed { program: String, source: io::Error },

    /// A redirection target could not be opened; nothing was started.
    #[error("{}: {source}", target.display())]
    RedirectFailed { target: PathBuf, source: io::Error },

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error(transparent)]
    Job(#[from] JobError),

    /// A builtin rejected its arguments or could not do its work.
    #[error("{message}")]
    Builtin { command: &'static str, message: String },
}

impl ExecError {
    pub(crate) fn builtin(command: &'static str, message: impl Into<String>) -> Self {
        ExecError::Builtin { command, message: message.into() }
    }

    /// The failed action named in user-facing messages.
    pub fn action(&self) -> &'static str {
        match self {
            ExecError::Parse(_) => "parse",
            ExecError::SpawnFailed { .. } => "launch",
            ExecError::RedirectFailed { .. } => "redirect",
            ExecError::Script(_) => "script",
            ExecError::Job(_) => "job",
            ExecError::Builtin { command, .. } => command,
        }
    }

    /// `wsh: <action> failed: <reason>`
    pub fn message(&self) -> String {
        format!("wsh: {} failed: {}", self.action(), self)
    }
}

impl From<LaunchError> for ExecError {
    fn from(err: LaunchError) -> Self {
        match err {
            LaunchError::Empty => ExecError::builtin("launch", "empty command"),
            LaunchError::Redirect(source) => {
                ExecError::RedirectFailed { target: PathBuf::from("standard handles"), source }
            }
            LaunchError::Spawn { program, source } => ExecError::SpawnFailed { program, source },
        }
    }
}
