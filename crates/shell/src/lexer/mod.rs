// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lexer for cmd-style command lines.
//!
//! Words are split on whitespace. `"` groups text (the quotes are removed)
//! and `^` makes the next character literal outside quotes.

mod operators;
mod redirection;

use super::token::{Span, Token, TokenKind};

pub use crate::error::LexerError;

pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, chars: input.char_indices().peekable() }
    }

    #[inline]
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    /// Tokenize the entire input.
    pub fn tokenize(input: &str) -> Result<Vec<Token>, LexerError> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::with_capacity(input.len() / 4 + 1);
        while let Some(token) = lexer.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn current_position(&self) -> usize {
        self.chars.clone().next().map(|(pos, _)| pos).unwrap_or(self.input.len())
    }

    fn next_token(&mut self) -> Result<Option<Token>, LexerError> {
        self.skip_whitespace();

        let Some(&(pos, ch)) = self.chars.peek() else {
            return Ok(None);
        };

        match ch {
            '|' => Ok(Some(self.lex_pipe(pos))),
            '&' => Ok(Some(self.lex_ampersand(pos))),
            '<' => Ok(Some(self.lex_redirect_in(pos, None)?)),
            '>' => Ok(Some(self.lex_redirect_out(pos, None)?)),
            _ => Ok(Some(self.lex_word(pos)?)),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.chars.next();
        }
    }

    fn lex_word(&mut self, start: usize) -> Result<Token, LexerError> {
        let mut word = String::new();
        let mut end = start;
        // Set once any part of the word was quoted or escaped, so `"2">x` is
        // a word followed by `>` rather than a handle number.
        let mut literal = false;
        let mut open_quote: Option<usize> = None;

        while let Some(&(pos, ch)) = self.chars.peek() {
            match ch {
                '"' => {
                    self.chars.next();
                    literal = true;
                    open_quote = match open_quote {
                        Some(_) => None,
                        None => Some(pos),
                    };
                    end = pos + 1;
                }
                '^' if open_quote.is_none() => {
                    self.chars.next();
                    literal = true;
                    match self.chars.next() {
                        Some((next_pos, next)) => {
                            word.push(next);
                            end = next_pos + next.len_utf8();
                        }
                        // A lone trailing caret is kept.
                        None => {
                            word.push('^');
                            end = pos + 1;
                        }
                    }
                }
                _ if open_quote.is_none() && Self::is_word_boundary(ch) => break,
                _ => {
                    self.chars.next();
                    word.push(ch);
                    end = pos + ch.len_utf8();
                }
            }
        }

        if let Some(quote) = open_quote {
            return Err(LexerError::UnterminatedQuote { span: Span::new(quote, quote + 1) });
        }

        if !literal && !word.is_empty() && word.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(fd) = word.parse::<u32>() {
                match self.peek_char() {
                    Some('>') => return self.lex_redirect_out(start, Some(fd)),
                    Some('<') => return self.lex_redirect_in(start, Some(fd)),
                    _ => {}
                }
            }
        }

        Ok(Token::new(TokenKind::Word(word), Span::new(start, end)))
    }

    #[inline]
    fn is_word_boundary(ch: char) -> bool {
        ch.is_whitespace() || matches!(ch, '&' | '|' | '<' | '>')
    }
}

#[cfg(test)]
#[path = "../lexer_tests/mod.rs"]
mod tests;
