// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

mod chains;
mod errors;
mod properties;
mod simple;

fn parse(input: &str) -> CommandLine {
    Parser::parse(input).unwrap_or_else(|e| panic!("failed to parse {input:?}: {e}"))
}

fn words(command: &SimpleCommand) -> Vec<&str> {
    command.words.iter().map(|w| w.value.as_str()).collect()
}

fn links(line: &CommandLine) -> Vec<Option<Link>> {
    line.commands.iter().map(|c| c.link).collect()
}
