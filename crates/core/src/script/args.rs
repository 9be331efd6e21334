// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::exec::join_arguments;

/// Splits a script statement into words, honouring double quotes.
pub fn split_arguments(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

/// An argument vector plus the number of positions shifted away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgContext {
    argv: Vec<String>,
    shift: usize,
}

impl ArgContext {
    pub fn new(argv: Vec<String>, shift: usize) -> Self {
        let shift = shift.min(argv.len());
        Self { argv, shift }
    }

    pub fn argc(&self) -> usize {
        self.argv.len()
    }

    pub fn shift_count(&self) -> usize {
        self.shift
    }

    /// `%N%`: the argument `N` positions past the shift.
    pub fn arg(&self, n: usize) -> Option<&str> {
        self.argv.get(n + self.shift).map(String::as_str)
    }

    /// `%*%`: every argument after `%0%`, re-quoted as one command line.
    pub fn tail(&self) -> String {
        let start = (self.shift + 1).min(self.argv.len());
        join_arguments(&self.argv[start..], false)
    }

    /// Advances the shift count; a no-op once every argument is shifted.
    pub fn shift(&mut self) {
        if self.shift < self.argv.len() {
            self.shift += 1;
        }
    }
}
