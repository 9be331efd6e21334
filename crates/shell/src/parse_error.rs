// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors from parsing a command line.

use thiserror::Error;

use crate::lexer::LexerError;
use crate::token::{context_snippet, Span, TokenKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lexer(#[from] LexerError),

    #[error("expected {expected} at position {}, found {found}", span.start)]
    UnexpectedToken { found: TokenKind, expected: String, span: Span },

    #[error("expected {expected} before end of line")]
    UnexpectedEof { expected: String },

    /// An operator with no command before it (`&& dir`, `a | | b`).
    #[error("missing command at position {}", span.start)]
    EmptyCommand { span: Span },
}

impl ParseError {
    /// Where parsing stopped; end-of-line errors have no span.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexer(e) => Some(e.span()),
            Self::UnexpectedToken { span, .. } | Self::EmptyCommand { span } => Some(*span),
            Self::UnexpectedEof { .. } => None,
        }
    }

    /// Caret snippet of `input` at [`span`](Self::span).
    pub fn context(&self, input: &str, context_chars: usize) -> Option<String> {
        self.span().map(|span| context_snippet(input, span, context_chars))
    }
}
