// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Double quotes and `^` escapes.

use crate::token::TokenKind;

fn word(s: &str) -> TokenKind {
    TokenKind::Word(s.to_string())
}

lex_tests! {
    quoted_spaces: "echo \"hello world\"" => [word("echo"), word("hello world")],
    quoted_operators: "echo \"a && b | c\"" => [word("echo"), word("a && b | c")],
    quotes_inside_word: "dir C:\\\"Program Files\"\\x" => [word("dir"), word("C:\\Program Files\\x")],
    empty_quotes: "echo \"\"" => [word("echo"), word("")],
    adjacent_quotes_join: "echo \"a\"\"b\"" => [word("echo"), word("ab")],
    caret_escapes_operator: "echo a^&b" => [word("echo"), word("a&b")],
    caret_escapes_pipe: "echo ^|" => [word("echo"), word("|")],
    caret_escapes_caret: "echo ^^" => [word("echo"), word("^")],
    caret_escapes_space: "echo a^ b" => [word("echo"), word("a b")],
    caret_literal_in_quotes: "echo \"^&\"" => [word("echo"), word("^&")],
    lone_trailing_caret: "echo ^" => [word("echo"), word("^")],
    escaped_digit_is_not_a_handle: "echo ^2>x" => [
        word("echo"), word("2"), TokenKind::RedirectOut { fd: 1, append: false }, word("x"),
    ],
    quoted_digit_is_not_a_handle: "echo \"2\">x" => [
        word("echo"), word("2"), TokenKind::RedirectOut { fd: 1, append: false }, word("x"),
    ],
}
