// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chaining operators (`|`, `||`, `&`, `&&`, `&!`).

use super::Lexer;
use crate::token::{Span, Token, TokenKind};

impl Lexer<'_> {
    pub(super) fn lex_pipe(&mut self, start: usize) -> Token {
        self.chars.next();

        if self.peek_char() == Some('|') {
            self.chars.next();
            Token::new(TokenKind::Or, Span::new(start, start + 2))
        } else {
            Token::new(TokenKind::Pipe, Span::new(start, start + 1))
        }
    }

    pub(super) fn lex_ampersand(&mut self, start: usize) -> Token {
        self.chars.next();

        match self.peek_char() {
            Some('&') => {
                self.chars.next();
                Token::new(TokenKind::And, Span::new(start, start + 2))
            }
            Some('!') => {
                self.chars.next();
                Token::new(TokenKind::Background, Span::new(start, start + 2))
            }
            _ => Token::new(TokenKind::Ampersand, Span::new(start, start + 1)),
        }
    }
}
