// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors from splitting a command line into tokens.

use crate::{context_snippet, Span};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexerError {
    /// A `"` with no closing quote.
    #[error("unterminated quote at position {}", span.start)]
    UnterminatedQuote { span: Span },

    /// Redirection to an unsupported handle, or a malformed `>&`.
    #[error("invalid redirection: {message} at position {}", span.start)]
    InvalidRedirection { message: String, span: Span },
}

impl LexerError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnterminatedQuote { span } | Self::InvalidRedirection { span, .. } => *span,
        }
    }

    /// Caret snippet of `input` at the offending character.
    pub fn context(&self, input: &str, context_chars: usize) -> String {
        context_snippet(input, self.span(), context_chars)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
