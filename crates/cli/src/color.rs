// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};
use std::io::IsTerminal;

use crate::env;

pub mod codes {
    /// Section headers: steel blue
    pub const HEADER: u8 = 74;
    /// Flags and literals: light grey
    pub const LITERAL: u8 = 250;
    /// Placeholders: medium grey
    pub const PLACEHOLDER: u8 = 245;
}

/// Priority: `NO_COLOR=1` disables, then `COLOR=1` forces, then the TTY check.
pub fn should_colorize() -> bool {
    if env::no_color() {
        return false;
    }
    env::force_color() || std::io::stdout().is_terminal()
}

fn fg(code: u8) -> Style {
    Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(code))))
}

/// Styles for `--help` output.
pub fn styles() -> Styles {
    if !should_colorize() {
        return Styles::plain();
    }
    Styles::styled()
        .header(fg(codes::HEADER))
        .usage(fg(codes::HEADER))
        .literal(fg(codes::LITERAL))
        .placeholder(fg(codes::PLACEHOLDER))
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
