// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    word = { TokenKind::Word("dir".into()), "word 'dir'" },
    pipe = { TokenKind::Pipe, "'|'" },
    or = { TokenKind::Or, "'||'" },
    and = { TokenKind::And, "'&&'" },
    background = { TokenKind::Background, "'&!'" },
    out = { TokenKind::RedirectOut { fd: 1, append: false }, "'>'" },
    append = { TokenKind::RedirectOut { fd: 1, append: true }, "'>>'" },
    err = { TokenKind::RedirectOut { fd: 2, append: false }, "'2>'" },
    err_append = { TokenKind::RedirectOut { fd: 2, append: true }, "'2>>'" },
    dup = { TokenKind::Duplicate { fd: 2, target: 1 }, "'2>&1'" },
)]
fn display(kind: TokenKind, expected: &str) {
    assert_eq!(kind.to_string(), expected);
}

#[test]
fn classification() {
    assert!(TokenKind::RedirectIn.is_redirection());
    assert!(TokenKind::Duplicate { fd: 1, target: 2 }.is_redirection());
    assert!(!TokenKind::Pipe.is_redirection());
    assert!(TokenKind::Ampersand.is_link());
    assert!(!TokenKind::Background.is_link());
    assert!(!TokenKind::Word("x".into()).is_link());
}
