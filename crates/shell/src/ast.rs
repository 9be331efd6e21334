// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Syntax tree for one command line.

use super::token::Span;

/// Commands chained by `|`, `&`, `&&` and `||`, optionally backgrounded
/// with a trailing `&!`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub commands: Vec<ChainedCommand>,
    pub background: bool,
    pub span: Span,
}

impl CommandLine {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainedCommand {
    pub command: SimpleCommand,
    /// Operator joining this command to the next; `None` for the last.
    pub link: Option<Link>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// `|`
    Pipe,
    /// `&`
    Then,
    /// `&&`
    And,
    /// `||`
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleCommand {
    pub words: Vec<Word>,
    pub redirections: Vec<Redirection>,
    pub span: Span,
}

impl SimpleCommand {
    pub fn name(&self) -> Option<&str> {
        self.words.first().map(|w| w.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirection {
    /// `< file`
    Input { target: Word },
    /// `> file`, `>> file`, `2> file`, `2>> file`
    Output { fd: u32, target: Word, append: bool },
    /// `2>&1`, `1>&2`
    Duplicate { fd: u32, target: u32, span: Span },
}
