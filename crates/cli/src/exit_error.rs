// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! Startup steps return `ExitError` instead of calling
//! `std::process::exit()`, so `main()` owns process termination.

use thiserror::Error;

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// `wsh: <action> failed: <reason>` with exit code 1.
    pub fn failed(action: &str, reason: impl std::fmt::Display) -> Self {
        Self::new(1, format!("wsh: {action} failed: {reason}"))
    }
}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
