// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parser turning tokens into a [`CommandLine`].

mod redirections;

use super::ast::*;
use super::lexer::Lexer;
use super::parse_error::ParseError;
use super::token::{Span, Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    input_len: usize,
}

impl Parser {
    /// Grammar: (simple_command link)* simple_command ('&' | '&!')?
    ///
    /// All links share one precedence and apply left to right.
    pub fn parse(input: &str) -> Result<CommandLine, ParseError> {
        let tokens = Lexer::tokenize(input)?;
        let mut parser = Parser { tokens, pos: 0, input_len: input.len() };
        parser.parse_command_line()
    }

    fn parse_command_line(&mut self) -> Result<CommandLine, ParseError> {
        let start = self.current_span_start();
        let mut commands: Vec<ChainedCommand> = Vec::new();
        let mut background = false;

        while !self.at_end() {
            let command = self.parse_simple_command()?;
            let link = match self.peek_kind() {
                None => None,
                Some(TokenKind::Background) => {
                    self.advance();
                    if !self.at_end() {
                        return Err(self.unexpected_token("end of line after '&!'"));
                    }
                    background = true;
                    None
                }
                Some(TokenKind::Pipe) => Some(Link::Pipe),
                Some(TokenKind::Ampersand) => Some(Link::Then),
                Some(TokenKind::And) => Some(Link::And),
                Some(TokenKind::Or) => Some(Link::Or),
                Some(_) => return Err(self.unexpected_token("operator")),
            };
            if link.is_some() {
                self.advance();
            }
            commands.push(ChainedCommand { command, link });
        }

        // A trailing `&` ends the line like a newline; any other link needs
        // a command after it.
        if let Some(last) = commands.last_mut() {
            match last.link {
                None => {}
                Some(Link::Then) => last.link = None,
                Some(link) => {
                    return Err(ParseError::UnexpectedEof {
                        expected: format!("command after {}", link_text(link)),
                    })
                }
            }
        }

        let end = self.current_span_end();
        Ok(CommandLine { commands, background, span: Span::new(start, end.max(start)) })
    }

    /// Grammar: (word | redirection)+ with at least one word.
    fn parse_simple_command(&mut self) -> Result<SimpleCommand, ParseError> {
        let start = self.current_span_start();
        let mut words = Vec::new();
        let mut redirections = Vec::new();

        loop {
            if self.is_redirection_token() {
                redirections.push(self.parse_redirection()?);
                continue;
            }
            match self.peek() {
                Some(Token { kind: TokenKind::Word(value), span }) => {
                    words.push(Word { value: value.clone(), span: *span });
                    self.advance();
                }
                _ => break,
            }
        }

        if words.is_empty() {
            let span = self.peek().map(|t| t.span).unwrap_or(Span::at(self.input_len));
            return Err(ParseError::EmptyCommand { span });
        }

        let end = self.current_span_end();
        Ok(SimpleCommand { words, redirections, span: Span::new(start, end.max(start)) })
    }

    #[inline]
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    #[inline]
    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    #[inline]
    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn current_span_start(&self) -> usize {
        self.peek().map(|t| t.span.start).unwrap_or(self.input_len)
    }

    fn current_span_end(&self) -> usize {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.span.end,
            None => self.input_len,
        }
    }

    fn unexpected_token(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::UnexpectedToken {
                found: token.kind.clone(),
                expected: expected.to_string(),
                span: token.span,
            },
            None => ParseError::UnexpectedEof { expected: expected.to_string() },
        }
    }
}

fn link_text(link: Link) -> &'static str {
    match link {
        Link::Pipe => "'|'",
        Link::Then => "'&'",
        Link::And => "'&&'",
        Link::Or => "'||'",
    }
}

#[cfg(test)]
#[path = "parser_tests/mod.rs"]
mod tests;
