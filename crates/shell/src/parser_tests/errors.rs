// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    leading_pipe = { "| b" },
    leading_and = { "&& b" },
    double_pipe_gap = { "a | | b" },
    only_redirection = { "> out.txt" },
)]
fn empty_command(input: &str) {
    assert!(matches!(Parser::parse(input), Err(ParseError::EmptyCommand { .. })));
}

#[parameterized(
    pipe = { "a |", "'|'" },
    and = { "a &&", "'&&'" },
    or = { "a ||", "'||'" },
)]
fn dangling_link(input: &str, operator: &str) {
    match Parser::parse(input) {
        Err(ParseError::UnexpectedEof { expected }) => {
            assert_eq!(expected, format!("command after {operator}"));
        }
        other => panic!("expected eof error, got {other:?}"),
    }
}

#[test]
fn missing_redirect_target() {
    let err = Parser::parse("dir >").unwrap_err();
    assert_eq!(err, ParseError::UnexpectedEof { expected: "redirect target".to_string() });
    assert!(err.context("dir >", 10).is_none());
}

#[test]
fn redirect_target_must_be_a_word() {
    let err = Parser::parse("dir > | b").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { found: TokenKind::Pipe, .. }));
    assert_eq!(err.span(), Some(Span::new(6, 7)));
}

#[test]
fn background_must_end_the_line() {
    let err = Parser::parse("a &! b").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
}

#[test]
fn lexer_errors_pass_through_with_context() {
    let err = Parser::parse("echo \"abc").unwrap_err();
    assert!(matches!(err, ParseError::Lexer(_)));
    assert_eq!(err.context("echo \"abc", 10).as_deref(), Some("echo \"abc\n     ^"));
}
