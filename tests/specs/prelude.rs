// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Helpers for running the `wsh` binary in a scratch directory.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Variables that would leak the developer's setup into a spec.
const SCRUBBED: &[&str] = &["WSH_LOG", "WSH_LOG_DIR", "WSH_INIT", "COLOR"];

/// A `wsh` invocation in the current directory.
pub fn cli() -> CliBuilder {
    CliBuilder::new(None)
}

pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    fn new(dir: Option<&Path>) -> Self {
        let mut cmd = Command::cargo_bin("wsh").expect("wsh binary should build");
        for name in SCRUBBED {
            cmd.env_remove(name);
        }
        cmd.env("WSH_PROMPT", "").env("NO_COLOR", "1");
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        Self { cmd }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, name: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(name, value);
        self
    }

    /// Lines typed at the interactive prompt.
    pub fn stdin(mut self, input: &str) -> Self {
        self.cmd.write_stdin(input.to_string());
        self
    }

    fn run(mut self) -> RunAssert {
        let output = self.cmd.output().expect("wsh should run");
        RunAssert {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn passes(self) -> RunAssert {
        self.exits(0)
    }

    pub fn fails(self) -> RunAssert {
        let run = self.run();
        assert_ne!(run.code, Some(0), "expected failure\n{run}");
        run
    }

    pub fn exits(self, code: i32) -> RunAssert {
        let run = self.run();
        assert_eq!(run.code, Some(code), "unexpected exit code\n{run}");
        run
    }
}

pub struct RunAssert {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl std::fmt::Display for RunAssert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "exit: {:?}\nstdout:\n{}\nstderr:\n{}", self.code, self.stdout, self.stderr)
    }
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        self.stdout.clone()
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout.as_str(), expected);
        self
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout lacks {needle:?}\n{self}");
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout.contains(needle), "stdout has {needle:?}\n{self}");
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr lacks {needle:?}\n{self}");
        self
    }
}

/// A scratch working directory.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().expect("temp dir") }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, content).expect("write file");
        path
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(relative)).expect("read file")
    }

    /// `wsh` running in this directory.
    pub fn wsh(&self) -> CliBuilder {
        CliBuilder::new(Some(self.dir.path()))
    }
}
