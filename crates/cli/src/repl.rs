// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The interactive loop.

use std::io::BufRead;
use std::path::Path;

use wsh_shell::{Output, Shell};

use crate::env;

/// Runs the startup script, if any, before the first prompt.
pub fn run_init(shell: &mut Shell, script: Option<&Path>) {
    if let Some(script) = script {
        tracing::debug!(script = %script.display(), "running init script");
        shell.run_script(script, Vec::new());
    }
}

/// Prompts and executes lines from `input` until end of input or `exit`,
/// then tears down the job table. Returns the shell's last exit code.
pub fn interact(shell: &mut Shell, input: impl BufRead, prompt_out: &Output) -> i32 {
    let mut lines = input.lines();
    while !shell.exit_requested() {
        shell.scan_jobs(false);

        let template = env::prompt(|name| shell.env().get(name).map(str::to_string));
        let prompt = shell.prompt(&template);
        if !prompt.is_empty() {
            prompt_out.bytes(prompt.as_bytes());
        }

        match lines.next() {
            Some(Ok(line)) => {
                shell.execute(&line);
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "cannot read input");
                break;
            }
            None => break,
        }
    }
    shell.scan_jobs(true);
    shell.last_exit_code()
}

#[cfg(test)]
#[path = "repl_tests.rs"]
mod tests;
