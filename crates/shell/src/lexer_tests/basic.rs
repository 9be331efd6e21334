// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Words, operators and spans.

use crate::token::TokenKind;

fn word(s: &str) -> TokenKind {
    TokenKind::Word(s.to_string())
}

lex_tests! {
    empty_input: "" => [],
    whitespace_only: "   \t  " => [],
    single_word: "dir" => [word("dir")],
    simple_words: "echo hello world" => [word("echo"), word("hello"), word("world")],
    windows_path: "type C:\\dir\\file.txt" => [word("type"), word("C:\\dir\\file.txt")],
    flags: "dir /s /b" => [word("dir"), word("/s"), word("/b")],
    percent_is_plain: "echo 50%" => [word("echo"), word("50%")],
    newline_is_whitespace: "echo a\r\nb" => [word("echo"), word("a"), word("b")],
}

lex_tests! {
    pipe: "a | b" => [word("a"), TokenKind::Pipe, word("b")],
    or: "a || b" => [word("a"), TokenKind::Or, word("b")],
    and: "a && b" => [word("a"), TokenKind::And, word("b")],
    then: "a & b" => [word("a"), TokenKind::Ampersand, word("b")],
    background: "a &!" => [word("a"), TokenKind::Background],
    operators_without_spaces: "a&&b|c" => [
        word("a"), TokenKind::And, word("b"), TokenKind::Pipe, word("c"),
    ],
    trailing_ampersand: "a &" => [word("a"), TokenKind::Ampersand],
}

span_tests! {
    word_spans: "echo hello" => [(0, 4), (5, 10)],
    operator_spans: "a && b" => [(0, 1), (2, 4), (5, 6)],
    background_span: "run &!" => [(0, 3), (4, 6)],
    quoted_span_includes_quotes: "echo \"a b\"" => [(0, 4), (5, 10)],
}
