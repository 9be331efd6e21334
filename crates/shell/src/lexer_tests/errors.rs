// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lexer failures.

use crate::lexer::{Lexer, LexerError};
use crate::token::Span;

lex_error_tests! {
    unterminated_quote: "echo \"abc" => LexerError::UnterminatedQuote { .. },
    unterminated_after_word: "echo a\"b" => LexerError::UnterminatedQuote { .. },
    handle_three: "cc 3>x" => LexerError::InvalidRedirection { .. },
    input_handle_one: "cc 1<x" => LexerError::InvalidRedirection { .. },
    duplicate_to_self: "cc 1>&1" => LexerError::InvalidRedirection { .. },
    duplicate_missing_target: "cc 2>&" => LexerError::InvalidRedirection { .. },
    append_duplicate: "cc 2>>&1" => LexerError::InvalidRedirection { .. },
}

#[test]
fn unterminated_quote_points_at_opening_quote() {
    let err = Lexer::tokenize("echo a \"bc").unwrap_err();
    assert_eq!(err.span(), Span::new(7, 8));
}
