// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lexer tests, mostly `input => expected` tables.

use crate::lexer::Lexer;
use crate::token::TokenKind;

#[macro_use]
mod macros;

mod basic;
mod errors;
mod quoting;
mod redirection;

fn kinds(input: &str) -> Vec<TokenKind> {
    match Lexer::tokenize(input) {
        Ok(tokens) => tokens.into_iter().map(|t| t.kind).collect(),
        Err(e) => panic!("cannot tokenize {input:?}: {e}"),
    }
}

fn spans(input: &str) -> Vec<(usize, usize)> {
    match Lexer::tokenize(input) {
        Ok(tokens) => tokens.into_iter().map(|t| (t.span.start, t.span.end)).collect(),
        Err(e) => panic!("cannot tokenize {input:?}: {e}"),
    }
}
