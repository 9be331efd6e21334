// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turns a parsed [`CommandLine`] into a [`Pipeline`] of exec contexts.

use std::path::PathBuf;

use wsh_core::exec::{ExecContext, InputRedirect, NextCondition, OutputRedirect, Pipeline};

use crate::ast::{CommandLine, Link, Redirection, SimpleCommand};

/// Redirect target naming the null device.
const NULL_DEVICE: &str = "nul";

fn is_null_device(target: &str) -> bool {
    target.eq_ignore_ascii_case(NULL_DEVICE)
}

fn condition(link: Option<Link>) -> NextCondition {
    match link {
        None => NextCondition::Never,
        Some(Link::Pipe) => NextCondition::Concurrent,
        Some(Link::Then) => NextCondition::Unconditional,
        Some(Link::And) => NextCondition::OnSuccess,
        Some(Link::Or) => NextCondition::OnFailure,
    }
}

fn output_target(target: &str, append: bool) -> OutputRedirect {
    if is_null_device(target) {
        OutputRedirect::Null
    } else if append {
        OutputRedirect::Append(PathBuf::from(target))
    } else {
        OutputRedirect::Overwrite(PathBuf::from(target))
    }
}

/// Options of `start [/b] [/wait] program args...`.
#[derive(Debug, Default, Clone, Copy)]
struct Start {
    same_console: bool,
    wait: bool,
}

/// Strips a leading `start` and its options from `argv`. A `start` with no
/// program after it is left alone.
fn split_start(argv: &mut Vec<String>) -> Option<Start> {
    if !argv.first().is_some_and(|word| word.eq_ignore_ascii_case("start")) {
        return None;
    }
    let mut start = Start::default();
    let mut consumed = 1;
    for word in &argv[1..] {
        match word.to_ascii_lowercase().as_str() {
            "/b" => start.same_console = true,
            "/wait" => start.wait = true,
            _ => break,
        }
        consumed += 1;
    }
    if consumed == argv.len() {
        return None;
    }
    argv.drain(..consumed);
    Some(start)
}

fn plan_command(command: &SimpleCommand) -> (ExecContext, Option<Start>) {
    let mut argv = command.words.iter().map(|w| w.value.clone()).collect();
    let start = split_start(&mut argv);
    let mut exec = ExecContext::new(argv);
    for redirection in &command.redirections {
        match redirection {
            Redirection::Input { target } => {
                exec.stdin = if is_null_device(&target.value) {
                    InputRedirect::Null
                } else {
                    InputRedirect::File(PathBuf::from(&target.value))
                };
            }
            Redirection::Output { fd: 2, target, append } => {
                exec.stderr = output_target(&target.value, *append);
            }
            Redirection::Output { target, append, .. } => {
                exec.stdout = output_target(&target.value, *append);
            }
            Redirection::Duplicate { fd: 2, .. } => exec.stderr = OutputRedirect::ToOther,
            Redirection::Duplicate { .. } => exec.stdout = OutputRedirect::ToOther,
        }
    }
    (exec, start)
}

/// Builds the exec chain for `line`.
///
/// A pipe only claims a stream that was not redirected explicitly. A
/// background line (`&!`) runs every program without waiting and keeps its
/// output in a job buffer. `start` runs a program in its own process group,
/// on a second console unless `/b` is given, and waits only with `/wait`.
pub fn plan(line: &CommandLine) -> Pipeline {
    let mut execs: Vec<ExecContext> = Vec::with_capacity(line.commands.len());
    let mut piped_in = false;
    for chained in &line.commands {
        let (mut exec, start) = plan_command(&chained.command);
        exec.next = condition(chained.link);
        if piped_in && exec.stdin == InputRedirect::Default {
            exec.stdin = InputRedirect::Pipe;
        }
        piped_in = exec.next == NextCondition::Concurrent;
        if piped_in && exec.stdout == OutputRedirect::Default {
            exec.stdout = OutputRedirect::Pipe;
        }
        if let Some(start) = start {
            exec = exec.into_started(!start.same_console, start.wait);
        }
        if line.background {
            exec = exec.into_background();
        }
        execs.push(exec);
    }
    Pipeline::new(execs)
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;
