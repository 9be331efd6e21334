// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory process environment with Windows naming rules.
//!
//! Names compare case-insensitively but keep the spelling they were last
//! set with. Drive current-directory records (`=C:=C:\work`) are ordinary
//! entries whose name starts with `=`.

mod block;
mod number;
mod path_list;

pub use block::{validate as validate_block, BlockEncoding, EnvBlock};
pub use number::parse_number;
pub use path_list::{merge_path, remove_path, Position};

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("environment block has no double-NUL terminator")]
    MissingTerminator,

    #[error("variable {name} is not set")]
    NotSet { name: String },

    #[error("variable {name} is not a number: '{value}'")]
    NotANumber { name: String, value: String },
}

/// A single change needed to turn one environment into another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvChange {
    Set { name: String, value: String },
    Remove { name: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, (String, String)>,
}

fn fold(name: &str) -> String {
    name.to_uppercase()
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(&fold(name)).map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(&fold(name))
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.vars.insert(fold(&name), (name, value.into()));
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.vars.remove(&fold(name)).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Entries in block order (case-insensitive name order).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.values().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Entries suitable for a child's environment; drive records are skipped.
    pub fn inheritable(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(name, _)| !name.starts_with('='))
    }

    /// Reads `name` as a signed integer (decimal or `0x` hex).
    pub fn get_as_number(&self, name: &str) -> Result<i64, EnvError> {
        let value =
            self.get(name).ok_or_else(|| EnvError::NotSet { name: name.to_string() })?;
        parse_number(value).ok_or_else(|| EnvError::NotANumber {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    /// Changes that turn `self` into `target`.
    pub fn diff(&self, target: &Environment) -> Vec<EnvChange> {
        let mut changes = Vec::new();
        for (key, (name, _)) in &self.vars {
            if !target.vars.contains_key(key) {
                changes.push(EnvChange::Remove { name: name.clone() });
            }
        }
        for (key, (name, value)) in &target.vars {
            match self.vars.get(key) {
                Some((_, current)) if current == value => {}
                _ => changes.push(EnvChange::Set { name: name.clone(), value: value.clone() }),
            }
        }
        changes
    }

    pub fn apply(&mut self, changes: &[EnvChange]) {
        for change in changes {
            match change {
                EnvChange::Set { name, value } => self.set(name.clone(), value.clone()),
                EnvChange::Remove { name } => {
                    self.remove(name);
                }
            }
        }
    }

    /// Parses a `NAME=VALUE` record; a leading `=` belongs to the name.
    pub fn split_entry(entry: &str) -> Option<(&str, &str)> {
        let search_from = usize::from(entry.starts_with('='));
        let split = entry[search_from..].find('=')? + search_from;
        Some((&entry[..split], &entry[split + 1..]))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Environment::new();
        for (name, value) in iter {
            env.set(name, value);
        }
        env
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
