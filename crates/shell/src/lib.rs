// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wsh-shell: Command-line language and executor for the wsh shell
//!
//! A line goes through `%NAME%` expansion, alias expansion, the [`Lexer`]
//! and [`Parser`], and the planner, which produces a
//! [`Pipeline`](wsh_core::Pipeline) for [`Shell::run_pipeline`].

mod ast;
mod error;
mod exec;
mod lexer;
mod output;
mod parse_error;
mod parser;
pub mod planner;
pub mod prompt;
mod span;
mod token;

pub use ast::{ChainedCommand, CommandLine, Link, Redirection, SimpleCommand, Word};
pub use error::LexerError;
pub use exec::{ExecError, Shell, ShellBuilder, FAILURE};
pub use lexer::Lexer;
pub use output::Output;
pub use parse_error::ParseError;
pub use parser::Parser;
pub use prompt::DEFAULT_PROMPT;
pub use span::{context_snippet, Span};
pub use token::{Token, TokenKind};
