// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment variables that configure wsh itself.

use std::path::PathBuf;

use wsh_shell::DEFAULT_PROMPT;

/// Filter directives used when `WSH_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

/// Tracing filter directives (`WSH_LOG`).
pub fn log_filter() -> String {
    non_empty("WSH_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

/// Directory for daily log files (`WSH_LOG_DIR`). Unset logs to stderr.
pub fn log_dir() -> Option<PathBuf> {
    non_empty("WSH_LOG_DIR").map(PathBuf::from)
}

/// Prompt template (`WSH_PROMPT`), looked up in the shell's own environment
/// so `set WSH_PROMPT=...` takes effect at the next prompt. An empty value
/// hides the prompt.
pub fn prompt(lookup: impl Fn(&str) -> Option<String>) -> String {
    lookup("WSH_PROMPT").unwrap_or_else(|| DEFAULT_PROMPT.to_string())
}

/// Script run before the first interactive prompt (`WSH_INIT`).
pub fn init_script() -> Option<PathBuf> {
    non_empty("WSH_INIT").map(PathBuf::from)
}

/// `NO_COLOR=1` disables colored help.
pub fn no_color() -> bool {
    std::env::var("NO_COLOR").is_ok_and(|v| v == "1")
}

/// `COLOR=1` forces colored help.
pub fn force_color() -> bool {
    std::env::var("COLOR").is_ok_and(|v| v == "1")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
