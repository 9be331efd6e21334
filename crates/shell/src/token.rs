// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Token types for the command-line lexer.

use std::fmt;

pub use crate::span::{context_snippet, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A word with quotes and `^` escapes already removed.
    Word(String),
    /// `|`
    Pipe,
    /// `||`
    Or,
    /// `&&`
    And,
    /// `&`
    Ampersand,
    /// `&!`
    Background,
    /// `<`
    RedirectIn,
    /// `>`, `>>`, `2>`, `2>>`
    RedirectOut { fd: u32, append: bool },
    /// `2>&1`, `1>&2`, `>&2`
    Duplicate { fd: u32, target: u32 },
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Word(s) => write!(f, "word '{}'", s),
            TokenKind::Pipe => write!(f, "'|'"),
            TokenKind::Or => write!(f, "'||'"),
            TokenKind::And => write!(f, "'&&'"),
            TokenKind::Ampersand => write!(f, "'&'"),
            TokenKind::Background => write!(f, "'&!'"),
            TokenKind::RedirectIn => write!(f, "'<'"),
            TokenKind::RedirectOut { fd: 1, append: false } => write!(f, "'>'"),
            TokenKind::RedirectOut { fd: 1, append: true } => write!(f, "'>>'"),
            TokenKind::RedirectOut { fd, append: false } => write!(f, "'{fd}>'"),
            TokenKind::RedirectOut { fd, append: true } => write!(f, "'{fd}>>'"),
            TokenKind::Duplicate { fd, target } => write!(f, "'{fd}>&{target}'"),
        }
    }
}

impl TokenKind {
    pub fn is_redirection(&self) -> bool {
        matches!(
            self,
            TokenKind::RedirectIn | TokenKind::RedirectOut { .. } | TokenKind::Duplicate { .. }
        )
    }

    /// Operators that join one command to the next.
    pub fn is_link(&self) -> bool {
        matches!(self, TokenKind::Pipe | TokenKind::Or | TokenKind::And | TokenKind::Ampersand)
    }
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
