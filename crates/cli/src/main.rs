// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wsh: an interactive command shell

mod args;
mod color;
mod env;
mod exit_error;
mod logging;
mod repl;

use std::io::{self, BufRead};

use clap::{ArgGroup, Parser};
use wsh_adapters::CancelToken;
use wsh_shell::{Output, Shell};

use crate::exit_error::ExitError;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));

#[derive(Parser, Debug)]
#[command(
    name = "wsh",
    version = VERSION,
    about = "An interactive command shell",
    styles = color::styles(),
    group(ArgGroup::new("mode").args(["command", "keep", "subshell"])),
)]
struct Cli {
    /// Run COMMAND, then exit with its code (also /c)
    #[arg(short = 'c', long = "command")]
    command: bool,

    /// Run COMMAND, then keep prompting (also /k)
    #[arg(short = 'k', long = "keep")]
    keep: bool,

    /// Run COMMAND as a subshell of another wsh, then exit (also /ss)
    #[arg(long = "subshell")]
    subshell: bool,

    /// The command line to run
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        requires = "mode"
    )]
    words: Vec<String>,
}

impl Cli {
    /// Whether prompting follows the command.
    fn interactive(&self) -> bool {
        !(self.command || self.subshell)
    }

    fn initial_line(&self) -> Option<String> {
        (self.command || self.keep || self.subshell).then(|| args::command_line(&self.words))
    }
}

fn main() {
    let cli = Cli::parse_from(args::normalize(std::env::args()));
    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => match e.downcast_ref::<ExitError>() {
            Some(exit) => {
                if !exit.message.is_empty() {
                    eprintln!("{}", exit.message);
                }
                exit.code
            }
            None => {
                eprintln!("wsh: {e:#}");
                1
            }
        },
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let _log_guard = logging::init()?;
    tracing::debug!(version = VERSION, ?cli, "starting");

    let cancel = CancelToken::console().map_err(|e| ExitError::failed("console setup", e))?;
    let stdout = Output::stdout();
    let mut shell = Shell::builder()
        .cancel(cancel)
        .stdout(stdout.clone())
        .stderr(Output::stderr())
        .build()
        .map_err(|e| ExitError::failed("startup", e))?;

    if cli.interactive() {
        repl::run_init(&mut shell, env::init_script().as_deref());
    }
    if let Some(line) = cli.initial_line() {
        let code = shell.execute(&line);
        if !cli.interactive() || shell.exit_requested() {
            shell.scan_jobs(true);
            return Ok(code);
        }
    }
    Ok(repl::interact(&mut shell, io::stdin().lock(), &stdout))
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
