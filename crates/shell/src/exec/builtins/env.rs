// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `set`, `cd` and `exit`.

use std::path::Path;

use wsh_core::env::{merge_path, parse_number, remove_path, Position};

use super::BuiltinIo;
use crate::exec::{ExecError, Shell};

/// Edits made by `set -a`, `set -i` and `set -r`.
enum ListEdit {
    Merge(Position),
    Remove,
}

impl Shell {
    /// `set` lists, `set NAME=VALUE` assigns, `set NAME=` deletes and
    /// `set PREFIX` lists matching names. `-a`/`-i`/`-r NAME=DIR` append,
    /// insert or remove one component of a `;`-separated list.
    pub(super) fn set(&mut self, args: &[String], io: &mut BuiltinIo) -> Result<i32, ExecError> {
        let Some((first, rest)) = args.split_first() else {
            self.list_variables("", io);
            return Ok(0);
        };

        let list_edit = match first.as_str() {
            "-a" => Some(ListEdit::Merge(Position::Back)),
            "-i" => Some(ListEdit::Merge(Position::Front)),
            "-r" => Some(ListEdit::Remove),
            _ => None,
        };
        if let Some(edit) = list_edit {
            let text = rest.join(" ");
            let Some((name, component)) = text.split_once('=') else {
                return Err(ExecError::builtin("set", format!("expected NAME=COMPONENT after {first}")));
            };
            let existing = self.env.get(name).unwrap_or_default();
            let updated = match edit {
                ListEdit::Merge(position) => merge_path(existing, component, position),
                ListEdit::Remove => remove_path(existing, component),
            };
            if updated.is_empty() {
                self.env.remove(name);
            } else {
                self.env.set(name, updated);
            }
            return Ok(0);
        }

        let text = args.join(" ");
        match text.split_once('=') {
            Some(("", _)) => Err(ExecError::builtin("set", "missing variable name")),
            Some((name, "")) => {
                self.env.remove(name);
                Ok(0)
            }
            Some((name, value)) => {
                tracing::debug!(name, "set variable");
                self.env.set(name, value);
                Ok(0)
            }
            None if self.list_variables(&text, io) == 0 => {
                Err(ExecError::builtin("set", format!("environment variable {text} not defined")))
            }
            None => Ok(0),
        }
    }

    /// Prints `NAME=VALUE` for names starting with `prefix`; returns the count.
    fn list_variables(&self, prefix: &str, io: &mut BuiltinIo) -> usize {
        let prefix = prefix.to_uppercase();
        let mut count = 0;
        for (name, value) in self.env.iter() {
            if name.starts_with('=') || !name.to_uppercase().starts_with(&prefix) {
                continue;
            }
            io.line(&format!("{name}={value}"));
            count += 1;
        }
        count
    }

    /// `cd` prints the directory; `cd PATH` changes it.
    pub(super) fn cd(&mut self, args: &[String], io: &mut BuiltinIo) -> Result<i32, ExecError> {
        if args.is_empty() {
            io.line(&self.cwd.display().to_string());
            return Ok(0);
        }
        let target = args.join(" ");
        self.change_dir(Path::new(&target))
            .map_err(|e| ExecError::builtin("cd", format!("{target}: {e}")))?;
        Ok(0)
    }

    /// `exit [CODE|NAME]` ends the shell with a number, the numeric value
    /// of a variable, or the last exit code.
    pub(super) fn exit(&mut self, args: &[String]) -> Result<i32, ExecError> {
        let code = match args.first() {
            None => self.last_exit_code,
            Some(arg) => match parse_number(arg) {
                Some(code) => code as i32,
                None => self
                    .env
                    .get_as_number(arg)
                    .map_err(|e| ExecError::builtin("exit", e.to_string()))?
                    as i32,
            },
        };
        tracing::debug!(code, "exit requested");
        self.exit_requested = true;
        Ok(code)
    }
}
