// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line-oriented script interpreter.
//!
//! A [`Script`] owns its lines and call stack. Each non-label line is
//! expanded with `%` as the delimiter and handed to a [`ScriptHost`], which
//! runs it through the shell's normal executor. `call`, `goto`, `include`,
//! `return` and `shift` are handled here because they move the active line
//! or the argument context.

mod args;

pub use args::{split_arguments, ArgContext};

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::env::{parse_number, EnvBlock, Environment};
use crate::format::{Resolver, Template, VariableBuffer};

/// Reserved label naming the position past the last line.
pub const EOF_LABEL: &str = "eof";

/// File extension that marks a script for the interpreter.
pub const SCRIPT_EXTENSION: &str = "ys1";

const FAILURE: i32 = 1;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("label '{label}' not found")]
    LabelNotFound { label: String },

    #[error("cannot read {}: {source}", path.display())]
    Load { path: PathBuf, source: io::Error },

    #[error("cannot include {}: {source}", path.display())]
    Include { path: PathBuf, source: io::Error },
}

/// The shell as seen from a running script.
pub trait ScriptHost {
    /// Runs one expanded command line and returns its exit code.
    fn execute(&mut self, command: &str) -> i32;
    fn exit_requested(&self) -> bool;
    fn environment(&self) -> &Environment;
    fn environment_mut(&mut self) -> &mut Environment;
    fn current_dir(&self) -> PathBuf;
    fn set_current_dir(&mut self, dir: &Path) -> io::Result<()>;
    /// Surfaces a diagnostic to the user.
    fn report_error(&mut self, message: &str);
}

/// State saved by `call` and restored by `return`.
#[derive(Debug, Clone)]
struct CallFrame {
    saved_env: EnvBlock,
    saved_cwd: PathBuf,
    calling_line: usize,
    args: ArgContext,
}

#[derive(Debug, Clone)]
pub struct Script {
    path: String,
    lines: Vec<String>,
    active: usize,
    global_args: ArgContext,
    frames: Vec<CallFrame>,
    finished: bool,
    exit_code: i32,
}

impl Script {
    /// Builds a script from source text. `args` excludes the script path.
    pub fn from_source(path: impl Into<String>, source: &str, args: Vec<String>) -> Self {
        let path = path.into();
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(path.clone());
        argv.extend(args);
        Self {
            path,
            lines: source.lines().map(str::to_string).collect(),
            active: 0,
            global_args: ArgContext::new(argv, 0),
            frames: Vec::new(),
            finished: false,
            exit_code: 0,
        }
    }

    pub fn load(path: &Path, args: Vec<String>) -> Result<Self, ScriptError> {
        let source = std::fs::read_to_string(path)
            .map_err(|source| ScriptError::Load { path: path.to_path_buf(), source })?;
        tracing::debug!(path = %path.display(), "loaded script");
        Ok(Self::from_source(path.display().to_string(), &source, args))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn active_line(&self) -> usize {
        self.active
    }

    pub fn call_depth(&self) -> usize {
        self.frames.len()
    }

    /// The argument context `%N%` currently reads from.
    pub fn args(&self) -> &ArgContext {
        self.frames.last().map(|frame| &frame.args).unwrap_or(&self.global_args)
    }

    fn args_mut(&mut self) -> &mut ArgContext {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.args,
            None => &mut self.global_args,
        }
    }

    /// Expands `%N%`, `%*%` and `%~SCRIPTNAME%`. Other names are left for
    /// the host's own expansion, and `^` escapes are kept for its parse.
    pub fn expand(&self, line: &str) -> String {
        let mut resolver = ScriptResolver { path: &self.path, args: self.args() };
        Template::new(line).delimiter('%').include_escapes(true).expand(&mut resolver)
    }

    /// Runs from the active line to the end and returns the exit code.
    pub fn run<H: ScriptHost + ?Sized>(&mut self, host: &mut H) -> i32 {
        let span = tracing::info_span!("script", path = %self.path);
        let _guard = span.enter();

        loop {
            if self.active >= self.lines.len() {
                if !self.return_from_end(host) {
                    break;
                }
                continue;
            }
            if self.finished || host.exit_requested() {
                break;
            }

            let line = self.lines[self.active].trim_start();
            if !line.is_empty() && !line.starts_with(':') {
                let expanded = self.expand(line);
                self.exit_code = self.dispatch(&expanded, host);
            }
            if self.finished || host.exit_requested() {
                break;
            }
            self.active += 1;
        }

        self.frames.clear();
        self.exit_code
    }

    /// Falling off the end inside a subroutine returns to its caller.
    fn return_from_end<H: ScriptHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.frames.is_empty() || self.finished {
            return false;
        }
        self.return_to_caller(host, &[]);
        self.active += 1;
        true
    }

    fn dispatch<H: ScriptHost + ?Sized>(&mut self, line: &str, host: &mut H) -> i32 {
        let words = split_arguments(line);
        let Some(command) = words.first() else {
            return 0;
        };
        match command.to_ascii_lowercase().as_str() {
            "goto" => self.goto(words.get(1).map(String::as_str).unwrap_or(""), host),
            "call" if words.get(1).is_some_and(|target| target.starts_with(':')) => {
                self.call(words, host)
            }
            "return" => self.return_(&words[1..], host),
            "shift" => self.shift(),
            "include" => match words.get(1) {
                Some(file) => self.include(Path::new(file), host),
                None => {
                    host.report_error("wsh: include failed: no file given");
                    FAILURE
                }
            },
            _ => host.execute(line),
        }
    }

    /// Index of the line holding `label`, or one past the end for `:eof`.
    pub fn find_label(&self, label: &str) -> Option<usize> {
        let label = label.strip_prefix(':').unwrap_or(label);
        if label.eq_ignore_ascii_case(EOF_LABEL) {
            return Some(self.lines.len());
        }
        self.lines.iter().position(|line| {
            line.trim_start()
                .strip_prefix(':')
                .and_then(|rest| rest.split_whitespace().next())
                .is_some_and(|name| name.eq_ignore_ascii_case(label))
        })
    }

    fn jump(&mut self, label: &str) -> Result<(), ScriptError> {
        let target = self
            .find_label(label)
            .ok_or_else(|| ScriptError::LabelNotFound { label: label.to_string() })?;
        self.active = target;
        Ok(())
    }

    pub fn goto<H: ScriptHost + ?Sized>(&mut self, label: &str, host: &mut H) -> i32 {
        match self.jump(label) {
            Ok(()) => 0,
            Err(e) => {
                host.report_error(&format!("wsh: goto failed: {e}"));
                FAILURE
            }
        }
    }

    /// `call :label args...`; `argv` includes the `call` word itself.
    pub fn call<H: ScriptHost + ?Sized>(&mut self, argv: Vec<String>, host: &mut H) -> i32 {
        let label = argv.get(1).cloned().unwrap_or_default();
        self.frames.push(CallFrame {
            saved_env: EnvBlock::encode(host.environment()),
            saved_cwd: host.current_dir(),
            calling_line: self.active,
            args: ArgContext::new(argv, 1),
        });

        match self.jump(&label) {
            Ok(()) => {
                tracing::debug!(label, depth = self.frames.len(), "call");
                // The loop advances past the label line.
                0
            }
            Err(e) => {
                self.frames.pop();
                host.report_error(&format!("wsh: call failed: {e}"));
                FAILURE
            }
        }
    }

    /// `return [N] [preserved names...]`.
    pub fn return_<H: ScriptHost + ?Sized>(&mut self, args: &[String], host: &mut H) -> i32 {
        let code = args
            .first()
            .and_then(|arg| parse_number(arg))
            .and_then(|n| i32::try_from(n).ok())
            .unwrap_or(0);

        if self.frames.is_empty() {
            self.active = self.lines.len();
            self.finished = true;
            return code;
        }

        let preserve = args.get(1..).unwrap_or_default();
        self.return_to_caller(host, preserve);
        code
    }

    fn return_to_caller<H: ScriptHost + ?Sized>(&mut self, host: &mut H, preserve: &[String]) {
        let Some(frame) = self.frames.pop() else {
            return;
        };

        if let Err(e) = host.set_current_dir(&frame.saved_cwd) {
            host.report_error(&format!(
                "wsh: return failed: cannot restore {}: {e}",
                frame.saved_cwd.display()
            ));
        }

        let mut restored = frame.saved_env.decode();
        for name in preserve {
            match host.environment().get(name) {
                Some(value) => restored.set(name.clone(), value.to_string()),
                None => {
                    restored.remove(name);
                }
            }
        }
        let changes = host.environment().diff(&restored);
        host.environment_mut().apply(&changes);

        tracing::debug!(depth = self.frames.len(), restored = changes.len(), "return");
        self.active = frame.calling_line;
    }

    /// Always fails, even when the shift succeeds.
    pub fn shift(&mut self) -> i32 {
        self.args_mut().shift();
        FAILURE
    }

    /// Splices `file` in after the active line.
    pub fn include<H: ScriptHost + ?Sized>(&mut self, file: &Path, host: &mut H) -> i32 {
        let path = if file.is_absolute() { file.to_path_buf() } else { host.current_dir().join(file) };
        match std::fs::read_to_string(&path) {
            Ok(source) => {
                let at = (self.active + 1).min(self.lines.len());
                let before = self.lines.len();
                self.lines.splice(at..at, source.lines().map(str::to_string));
                tracing::debug!(path = %path.display(), lines = self.lines.len() - before, "include");
                0
            }
            Err(source) => {
                let e = ScriptError::Include { path, source };
                host.report_error(&format!("wsh: include failed: {e}"));
                FAILURE
            }
        }
    }
}

struct ScriptResolver<'a> {
    path: &'a str,
    args: &'a ArgContext,
}

impl Resolver for ScriptResolver<'_> {
    fn resolve(&mut self, name: &str, out: &mut VariableBuffer) -> Option<usize> {
        if name.eq_ignore_ascii_case("~SCRIPTNAME") {
            return Some(out.offer(self.path));
        }
        if name == "*" {
            return Some(out.offer(&self.args.tail()));
        }
        if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
            let value = name.parse::<usize>().ok().and_then(|n| self.args.arg(n)).unwrap_or("");
            return Some(out.offer(value));
        }
        None
    }
}

/// Whether `program` names a script file.
pub fn is_script(program: &str) -> bool {
    Path::new(program)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SCRIPT_EXTENSION))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
