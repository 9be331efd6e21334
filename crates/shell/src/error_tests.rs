// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn unterminated_quote_message_and_context() {
    let err = LexerError::UnterminatedQuote { span: Span::new(5, 6) };
    assert_eq!(err.to_string(), "unterminated quote at position 5");
    assert_eq!(err.context("echo \"hi", 10), "echo \"hi\n     ^");
}

#[test]
fn invalid_redirection_span() {
    let err = LexerError::InvalidRedirection {
        message: "handle 3 is not supported".to_string(),
        span: Span::new(2, 4),
    };
    assert_eq!(err.span(), Span::new(2, 4));
    assert!(err.to_string().starts_with("invalid redirection: handle 3"));
}
