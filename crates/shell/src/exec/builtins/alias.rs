// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::BuiltinIo;
use crate::exec::{ExecError, Shell};

impl Shell {
    /// `alias` lists, `alias NAME` shows one, `alias NAME=VALUE` defines and
    /// `alias NAME=` deletes. Changes are mirrored into the console.
    pub(super) fn alias(&mut self, args: &[String], io: &mut BuiltinIo) -> Result<i32, ExecError> {
        if args.is_empty() {
            for (name, value) in self.aliases.iter() {
                io.line(&format!("{name}={value}"));
            }
            return Ok(0);
        }

        let text = args.join(" ");
        let Some((name, value)) = text.split_once('=') else {
            return match self.aliases.get(&text) {
                Some(value) => {
                    io.line(&format!("{text}={value}"));
                    Ok(0)
                }
                None => Err(ExecError::builtin("alias", format!("alias {text} not defined"))),
            };
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(ExecError::builtin("alias", "missing alias name"));
        }

        let value = (!value.is_empty()).then_some(value);
        match value {
            Some(value) => self.aliases.set(name, value),
            None => {
                self.aliases.remove(name);
            }
        }
        if let Err(e) = self.console_aliases.set(name, value) {
            tracing::warn!(name, error = %e, "console alias not updated");
        }
        Ok(0)
    }
}
