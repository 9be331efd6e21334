// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command aliases and the diff used to pick up alias changes made by
//! child processes.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasChange {
    Set { name: String, value: String },
    Remove { name: String },
}

/// Case-insensitive alias names mapped to their replacement text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<String, (String, String)>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.to_lowercase()).map(|(_, value)| value.as_str())
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.entries.insert(name.to_lowercase(), (name, value.into()));
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(&name.to_lowercase()).map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.values().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Changes that turn `self` into `after`.
    pub fn diff(&self, after: &AliasTable) -> Vec<AliasChange> {
        let removed = self
            .entries
            .iter()
            .filter(|(key, _)| !after.entries.contains_key(*key))
            .map(|(_, (name, _))| AliasChange::Remove { name: name.clone() });
        let set = after
            .entries
            .iter()
            .filter(|(key, (_, value))| self.entries.get(*key).map(|(_, v)| v) != Some(value))
            .map(|(_, (name, value))| AliasChange::Set { name: name.clone(), value: value.clone() });
        removed.chain(set).collect()
    }

    pub fn apply(&mut self, changes: &[AliasChange]) {
        for change in changes {
            match change {
                AliasChange::Set { name, value } => self.set(name.clone(), value.clone()),
                AliasChange::Remove { name } => {
                    self.remove(name);
                }
            }
        }
    }

    /// Replaces the first word of `line` when it names an alias.
    ///
    /// `$*` in the alias text receives the remaining arguments; without it
    /// they are appended.
    pub fn expand(&self, line: &str) -> Option<String> {
        let trimmed = line.trim_start();
        let word_end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (word, rest) = trimmed.split_at(word_end);
        let value = self.get(word)?;
        let rest = rest.trim_start();
        Some(if value.contains("$*") {
            value.replace("$*", rest)
        } else if rest.is_empty() {
            value.to_string()
        } else {
            format!("{value} {rest}")
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = AliasTable::new();
        for (name, value) in iter {
            table.set(name, value);
        }
        table
    }
}

#[cfg(test)]
#[path = "alias_tests.rs"]
mod tests;
