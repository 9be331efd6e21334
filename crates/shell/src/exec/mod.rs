// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The interactive shell: state plus command-line execution.

mod builtins;
mod error;
mod redirect;
mod run;

pub use error::ExecError;

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use wsh_adapters::{
    CancelToken, ChildProcess, ConsoleAliases, ConsoleInput, ProcessLauncher, SystemAliases,
    SystemConsole, SystemLauncher, Taskbar, TerminalTaskbar,
};
use wsh_core::{AliasTable, Environment, FnResolver, JobInfo, JobTable, Template};

use crate::output::Output;
use crate::parser::Parser;
use crate::planner;

/// Exit code of a failed builtin, parse, or launch.
pub const FAILURE: i32 = 1;

/// Characters of context shown around a parse error.
const SNIPPET_CONTEXT: usize = 20;

/// Shell state owned by the main thread. Children get the environment and
/// working directory passed explicitly; the process's own are never touched.
pub struct Shell {
    env: Environment,
    cwd: PathBuf,
    aliases: AliasTable,
    jobs: JobTable<Box<dyn ChildProcess>>,
    last_exit_code: i32,
    exit_requested: bool,
    launcher: Arc<dyn ProcessLauncher>,
    console: Arc<dyn ConsoleInput>,
    console_aliases: Arc<dyn ConsoleAliases>,
    taskbar: Arc<dyn Taskbar>,
    cancel: CancelToken,
    stdout: Output,
    stderr: Output,
}

impl Shell {
    pub fn builder() -> ShellBuilder {
        ShellBuilder::default()
    }

    /// Runs one command line and returns its exit code.
    pub fn execute(&mut self, line: &str) -> i32 {
        let _span = tracing::debug_span!("shell.exec", line).entered();
        self.cancel.reset();

        let expanded = self.expand_variables(line);
        let expanded = self.aliases.expand(&expanded).unwrap_or(expanded);
        if expanded.trim().is_empty() {
            return self.last_exit_code;
        }

        let code = match Parser::parse(&expanded) {
            Ok(parsed) => self.run_pipeline(&planner::plan(&parsed)),
            Err(e) => {
                let snippet = e.context(&expanded, SNIPPET_CONTEXT);
                self.report(&ExecError::from(e));
                if let Some(snippet) = snippet {
                    self.stderr.line(&snippet);
                }
                FAILURE
            }
        };
        self.last_exit_code = code;
        code
    }

    /// Expands `%NAME%` references, including the dynamic `LASTEXITCODE`
    /// and `ERRORLEVEL`. Unknown names are left in place.
    fn expand_variables(&self, line: &str) -> String {
        let env = &self.env;
        let last = self.last_exit_code;
        let mut resolver = FnResolver(|name: &str| match env.get(name) {
            Some(value) => Some(value.to_string()),
            None if name.eq_ignore_ascii_case("LASTEXITCODE")
                || name.eq_ignore_ascii_case("ERRORLEVEL") =>
            {
                Some(last.to_string())
            }
            None => None,
        });
        Template::new(line).delimiter('%').include_escapes(true).expand(&mut resolver)
    }

    /// Reports completed and deleted background jobs. `teardown_all`
    /// releases every job, executing or not.
    pub fn scan_jobs(&mut self, teardown_all: bool) {
        for notice in self.jobs.scan(teardown_all) {
            self.stdout.line(&notice.to_string());
        }
    }

    /// Runs a script file with `args` as `%1`...
    pub fn run_script(&mut self, path: &Path, args: Vec<String>) -> i32 {
        let mut argv = vec![path.display().to_string()];
        argv.extend(args);
        let code = match self.script(&argv) {
            Ok(code) => code,
            Err(e) => {
                self.report(&e);
                FAILURE
            }
        };
        self.last_exit_code = code;
        code
    }

    pub fn prompt(&self, template: &str) -> String {
        crate::prompt::render(template, &self.cwd)
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn jobs(&self) -> Vec<JobInfo> {
        self.jobs.list()
    }

    pub fn last_exit_code(&self) -> i32 {
        self.last_exit_code
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Token raised by Ctrl+C; cancels the foreground wait.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Changes the working directory after checking that `path` exists.
    fn change_dir(&mut self, path: &Path) -> io::Result<()> {
        let target = normalize(&self.cwd.join(path));
        let metadata = std::fs::metadata(&target)?;
        if !metadata.is_dir() {
            return Err(io::Error::new(io::ErrorKind::NotADirectory, "not a directory"));
        }
        tracing::debug!(cwd = %target.display(), "changed directory");
        self.cwd = target;
        Ok(())
    }

    fn report(&self, err: &ExecError) {
        tracing::debug!(error = %err, "command failed");
        self.stderr.line(&err.message());
    }
}

/// Resolves `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if out.file_name().is_some() {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures a [`Shell`]. Unset seams use the real operating system.
pub struct ShellBuilder {
    env: Option<Environment>,
    cwd: Option<PathBuf>,
    launcher: Arc<dyn ProcessLauncher>,
    console: Arc<dyn ConsoleInput>,
    console_aliases: Arc<dyn ConsoleAliases>,
    taskbar: Arc<dyn Taskbar>,
    cancel: CancelToken,
    stdout: Output,
    stderr: Output,
}

impl Default for ShellBuilder {
    fn default() -> Self {
        Self {
            env: None,
            cwd: None,
            launcher: Arc::new(SystemLauncher::new()),
            console: Arc::new(SystemConsole::new()),
            console_aliases: Arc::new(SystemAliases),
            taskbar: Arc::new(TerminalTaskbar::stdout()),
            cancel: CancelToken::new(),
            stdout: Output::stdout(),
            stderr: Output::stderr(),
        }
    }
}

impl ShellBuilder {
    pub fn env(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn launcher(mut self, launcher: impl ProcessLauncher + 'static) -> Self {
        self.launcher = Arc::new(launcher);
        self
    }

    pub fn console(mut self, console: impl ConsoleInput + 'static) -> Self {
        self.console = Arc::new(console);
        self
    }

    pub fn console_aliases(mut self, aliases: impl ConsoleAliases + 'static) -> Self {
        self.console_aliases = Arc::new(aliases);
        self
    }

    pub fn taskbar(mut self, taskbar: impl Taskbar + 'static) -> Self {
        self.taskbar = Arc::new(taskbar);
        self
    }

    pub fn cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn stdout(mut self, stdout: Output) -> Self {
        self.stdout = stdout;
        self
    }

    pub fn stderr(mut self, stderr: Output) -> Self {
        self.stderr = stderr;
        self
    }

    /// Fails only when no working directory was given and the process's
    /// own cannot be read.
    pub fn build(self) -> io::Result<Shell> {
        let cwd = match self.cwd {
            Some(cwd) => cwd,
            None => std::env::current_dir()?,
        };
        Ok(Shell {
            env: self.env.unwrap_or_else(Environment::from_process),
            cwd,
            aliases: self.console_aliases.snapshot(),
            jobs: JobTable::new(),
            last_exit_code: 0,
            exit_requested: false,
            launcher: self.launcher,
            console: self.console,
            console_aliases: self.console_aliases,
            taskbar: self.taskbar,
            cancel: self.cancel,
            stdout: self.stdout,
            stderr: self.stderr,
        })
    }
}

#[cfg(test)]
#[path = "../exec_tests/mod.rs"]
mod tests;
