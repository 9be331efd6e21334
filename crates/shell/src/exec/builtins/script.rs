// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Running `.ys1` scripts against the shell.

use std::io;
use std::path::{Path, PathBuf};

use wsh_core::{Environment, Script, ScriptHost};

use crate::exec::{ExecError, Shell};

impl Shell {
    /// `argv[0]` is the script path, relative to the working directory.
    pub(crate) fn script(&mut self, argv: &[String]) -> Result<i32, ExecError> {
        let Some((path, args)) = argv.split_first() else {
            return Err(ExecError::builtin("script", "no script given"));
        };
        let mut script = Script::load(&self.cwd.join(path), args.to_vec())?;
        Ok(script.run(self))
    }
}

impl ScriptHost for Shell {
    fn execute(&mut self, command: &str) -> i32 {
        Shell::execute(self, command)
    }

    fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    fn environment(&self) -> &Environment {
        &self.env
    }

    fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    fn current_dir(&self) -> PathBuf {
        self.cwd.clone()
    }

    fn set_current_dir(&mut self, dir: &Path) -> io::Result<()> {
        self.change_dir(dir)
    }

    fn report_error(&mut self, message: &str) {
        self.stderr.line(message);
    }
}
