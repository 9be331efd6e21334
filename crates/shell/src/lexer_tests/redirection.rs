// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Redirection operators.

use crate::token::TokenKind;

fn word(s: &str) -> TokenKind {
    TokenKind::Word(s.to_string())
}

const OUT: TokenKind = TokenKind::RedirectOut { fd: 1, append: false };
const APPEND: TokenKind = TokenKind::RedirectOut { fd: 1, append: true };
const ERR: TokenKind = TokenKind::RedirectOut { fd: 2, append: false };
const ERR_APPEND: TokenKind = TokenKind::RedirectOut { fd: 2, append: true };

lex_tests! {
    input: "sort < in.txt" => [word("sort"), TokenKind::RedirectIn, word("in.txt")],
    explicit_stdin: "sort 0<in.txt" => [word("sort"), TokenKind::RedirectIn, word("in.txt")],
    output: "dir > out.txt" => [word("dir"), OUT, word("out.txt")],
    output_no_space: "dir>out.txt" => [word("dir"), OUT, word("out.txt")],
    explicit_stdout: "dir 1>out.txt" => [word("dir"), OUT, word("out.txt")],
    append: "dir >> log" => [word("dir"), APPEND, word("log")],
    stderr: "cc 2> errs" => [word("cc"), ERR, word("errs")],
    stderr_append: "cc 2>>errs" => [word("cc"), ERR_APPEND, word("errs")],
    stderr_to_stdout: "cc 2>&1" => [word("cc"), TokenKind::Duplicate { fd: 2, target: 1 }],
    stdout_to_stderr: "cc 1>&2" => [word("cc"), TokenKind::Duplicate { fd: 1, target: 2 }],
    short_stdout_to_stderr: "cc >&2" => [word("cc"), TokenKind::Duplicate { fd: 1, target: 2 }],
    digits_inside_word: "echo a2>x" => [word("echo"), word("a2"), OUT, word("x")],
    null_target: "cc >nul 2>&1" => [
        word("cc"), OUT, word("nul"), TokenKind::Duplicate { fd: 2, target: 1 },
    ],
}

span_tests! {
    handle_prefix_span: "cc 2>x" => [(0, 2), (3, 5), (5, 6)],
    duplicate_span: "cc 2>&1" => [(0, 2), (3, 7)],
}
