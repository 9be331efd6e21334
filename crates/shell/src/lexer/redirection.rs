// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Redirection operators.

use super::{Lexer, LexerError};
use crate::token::{Span, Token, TokenKind};

const STDIN: u32 = 0;
const STDOUT: u32 = 1;
const STDERR: u32 = 2;

fn unsupported(fd: u32, span: Span) -> LexerError {
    LexerError::InvalidRedirection { message: format!("handle {fd} is not supported"), span }
}

impl Lexer<'_> {
    /// `<` or `0<`.
    pub(super) fn lex_redirect_in(
        &mut self,
        start: usize,
        fd: Option<u32>,
    ) -> Result<Token, LexerError> {
        self.chars.next();
        let span = Span::new(start, self.current_position());
        match fd.unwrap_or(STDIN) {
            STDIN => Ok(Token::new(TokenKind::RedirectIn, span)),
            other => Err(unsupported(other, span)),
        }
    }

    /// `>`, `>>`, `n>`, `n>>` and `n>&m`.
    pub(super) fn lex_redirect_out(
        &mut self,
        start: usize,
        fd: Option<u32>,
    ) -> Result<Token, LexerError> {
        self.chars.next();
        let append = self.peek_char() == Some('>');
        if append {
            self.chars.next();
        }
        let fd = fd.unwrap_or(STDOUT);

        if self.peek_char() != Some('&') {
            let span = Span::new(start, self.current_position());
            if fd != STDOUT && fd != STDERR {
                return Err(unsupported(fd, span));
            }
            return Ok(Token::new(TokenKind::RedirectOut { fd, append }, span));
        }

        self.chars.next();
        let target = self.chars.next().and_then(|(_, c)| c.to_digit(10));
        let span = Span::new(start, self.current_position());
        match (append, fd, target) {
            (false, STDOUT, Some(STDERR)) | (false, STDERR, Some(STDOUT)) => {
                Ok(Token::new(TokenKind::Duplicate { fd, target: STDOUT + STDERR - fd }, span))
            }
            (true, _, _) => Err(LexerError::InvalidRedirection {
                message: "'>>&' is not supported".to_string(),
                span,
            }),
            (false, STDOUT | STDERR, _) => Err(LexerError::InvalidRedirection {
                message: "expected '1' or '2' after '>&'".to_string(),
                span,
            }),
            (false, other, _) => Err(unsupported(other, span)),
        }
    }
}
