// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Redirection parsing.

use super::Parser;
use crate::ast::{Redirection, Word};
use crate::parse_error::ParseError;
use crate::token::{Token, TokenKind};

impl Parser {
    pub(super) fn is_redirection_token(&self) -> bool {
        self.peek_kind().is_some_and(TokenKind::is_redirection)
    }

    pub(super) fn parse_redirection(&mut self) -> Result<Redirection, ParseError> {
        let Some(token) = self.advance().cloned() else {
            return Err(self.unexpected_token("redirection"));
        };

        Ok(match token.kind {
            TokenKind::RedirectIn => Redirection::Input { target: self.parse_target()? },
            TokenKind::RedirectOut { fd, append } => {
                Redirection::Output { fd, target: self.parse_target()?, append }
            }
            TokenKind::Duplicate { fd, target } => {
                Redirection::Duplicate { fd, target, span: token.span }
            }
            _ => {
                return Err(ParseError::UnexpectedToken {
                    found: token.kind,
                    expected: "redirection".to_string(),
                    span: token.span,
                })
            }
        })
    }

    fn parse_target(&mut self) -> Result<Word, ParseError> {
        match self.peek() {
            Some(Token { kind: TokenKind::Word(value), span }) => {
                let word = Word { value: value.clone(), span: *span };
                self.advance();
                Ok(word)
            }
            _ => Err(self.unexpected_token("redirect target")),
        }
    }
}
