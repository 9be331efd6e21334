// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands the shell runs itself.
//!
//! Builtins write into in-memory buffers which are then routed through the
//! same redirections a launched program would get.

mod alias;
mod env;
mod job;
mod script;

use wsh_core::{is_script, ExecContext, OutputStream};

use super::error::ExecError;
use super::redirect::{self, ProcessStdio};
use super::{Shell, FAILURE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Alias,
    Cd,
    Echo,
    Exit,
    False,
    Job,
    Rem,
    Script,
    Set,
    True,
}

impl Builtin {
    pub(crate) fn lookup(program: &str) -> Option<Builtin> {
        let builtin = match program.to_ascii_lowercase().as_str() {
            "alias" => Builtin::Alias,
            "cd" | "chdir" => Builtin::Cd,
            "echo" => Builtin::Echo,
            "exit" => Builtin::Exit,
            "false" => Builtin::False,
            "job" => Builtin::Job,
            "rem" => Builtin::Rem,
            "set" => Builtin::Set,
            "true" => Builtin::True,
            _ if is_script(program) => Builtin::Script,
            _ => return None,
        };
        Some(builtin)
    }
}

/// Output of one builtin invocation.
#[derive(Debug, Default)]
pub(crate) struct BuiltinIo {
    out: Vec<u8>,
    err: Vec<u8>,
}

impl BuiltinIo {
    fn line(&mut self, text: &str) {
        self.out.extend_from_slice(text.as_bytes());
        self.out.push(b'\n');
    }

    fn error_line(&mut self, text: &str) {
        self.err.extend_from_slice(text.as_bytes());
        self.err.push(b'\n');
    }
}

impl Shell {
    pub(super) fn run_builtin(
        &mut self,
        builtin: Builtin,
        exec: &ExecContext,
        stdio: ProcessStdio,
    ) -> i32 {
        let _span = tracing::debug_span!("builtin", ?builtin).entered();
        let mut io = BuiltinIo::default();
        let args = exec.argv.get(1..).unwrap_or_default();
        let result = match builtin {
            Builtin::Alias => self.alias(args, &mut io),
            Builtin::Cd => self.cd(args, &mut io),
            Builtin::Echo => Ok(echo(args, &mut io)),
            Builtin::Exit => self.exit(args),
            Builtin::False => Ok(FAILURE),
            Builtin::Job => self.job(args, &mut io),
            Builtin::Rem | Builtin::True => Ok(0),
            Builtin::Script => self.script(&exec.argv),
            Builtin::Set => self.set(args, &mut io),
        };
        let code = match result {
            Ok(code) => code,
            Err(e) => {
                tracing::debug!(error = %e, "builtin failed");
                io.error_line(&e.message());
                FAILURE
            }
        };

        let ProcessStdio { stdout, stderr, .. } = stdio;
        let delivered = redirect::deliver(stdout, OutputStream::Stdout, io.out, &self.stdout, &self.stderr)
            .and_then(|()| {
                redirect::deliver(stderr, OutputStream::Stderr, io.err, &self.stdout, &self.stderr)
            });
        if let Err(e) = delivered {
            self.report(&ExecError::builtin("redirect", e.to_string()));
            return FAILURE;
        }
        code
    }
}

/// `echo [-n] words...`
fn echo(args: &[String], io: &mut BuiltinIo) -> i32 {
    let (newline, words) = match args.split_first() {
        Some((flag, rest)) if flag == "-n" => (false, rest),
        _ => (true, args),
    };
    io.out.extend_from_slice(words.join(" ").as_bytes());
    if newline {
        io.out.push(b'\n');
    }
    0
}
