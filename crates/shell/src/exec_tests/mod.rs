// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the shell executor.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tempfile::TempDir;
use wsh_adapters::{CancelToken, FakeAliases, FakeChild, FakeConsole, FakeLauncher, FakeTaskbar};
use wsh_core::Environment;

use super::*;

mod builtins;
mod chains;
mod jobs;
mod redirections;
mod scenarios;
mod scripts;
mod waiting;

/// Everything written through an [`Output`] handle.
#[derive(Clone, Default)]
pub(crate) struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    pub(crate) fn output(&self) -> Output {
        Output::new(CapturedWriter(Arc::clone(&self.0)))
    }

    pub(crate) fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

struct CapturedWriter(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A shell wired to fakes, working in a fresh temporary directory.
pub(crate) struct Harness {
    pub(crate) shell: Shell,
    pub(crate) launcher: FakeLauncher,
    pub(crate) console: FakeConsole,
    pub(crate) taskbar: FakeTaskbar,
    pub(crate) aliases: FakeAliases,
    pub(crate) cancel: CancelToken,
    pub(crate) out: Captured,
    pub(crate) err: Captured,
    pub(crate) dir: TempDir,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let launcher = FakeLauncher::new();
        Self::with(launcher.clone(), launcher, FakeAliases::new())
    }

    /// `launcher` runs the programs; `recorder` is the fake it delegates to.
    pub(crate) fn with(
        launcher: impl ProcessLauncher + 'static,
        recorder: FakeLauncher,
        aliases: FakeAliases,
    ) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let console = FakeConsole::new();
        let taskbar = FakeTaskbar::new();
        let cancel = CancelToken::new();
        let out = Captured::default();
        let err = Captured::default();
        let env: Environment =
            [("PATH", "C:\\Windows"), ("=C:", "C:\\work")].into_iter().collect();
        let shell = Shell::builder()
            .env(env)
            .cwd(dir.path())
            .launcher(launcher)
            .console(console.clone())
            .console_aliases(aliases.clone())
            .taskbar(taskbar.clone())
            .cancel(cancel.clone())
            .stdout(out.output())
            .stderr(err.output())
            .build()
            .unwrap();
        Self { shell, launcher: recorder, console, taskbar, aliases, cancel, out, err, dir }
    }

    pub(crate) fn run(&mut self, line: &str) -> i32 {
        self.shell.execute(line)
    }

    pub(crate) fn stdout(&self) -> String {
        self.out.text()
    }

    pub(crate) fn stderr(&self) -> String {
        self.err.text()
    }

    pub(crate) fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    pub(crate) fn write_file(&self, name: &str, contents: &str) {
        std::fs::write(self.path(name), contents).unwrap();
    }

    pub(crate) fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).unwrap()
    }
}

/// Polls `check` until it holds or a second passes.
pub(crate) fn eventually(mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(1);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    check()
}

pub(crate) fn plan(line: &str) -> wsh_core::Pipeline {
    crate::planner::plan(&crate::Parser::parse(line).unwrap())
}
