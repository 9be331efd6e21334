// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn empty_line_has_no_commands() {
    let line = parse("   ");
    assert!(line.is_empty());
    assert!(!line.background);
}

#[test]
fn words_are_collected() {
    let line = parse("copy \"a b\" c");
    assert_eq!(line.commands.len(), 1);
    let command = &line.commands[0].command;
    assert_eq!(command.name(), Some("copy"));
    assert_eq!(words(command), ["copy", "a b", "c"]);
    assert_eq!(command.span, Span::new(0, 12));
}

#[test]
fn redirections_are_separated_from_words() {
    let line = parse("sort < in.txt > out.txt 2>&1");
    let command = &line.commands[0].command;
    assert_eq!(words(command), ["sort"]);
    assert_eq!(command.redirections.len(), 3);
    assert!(matches!(
        &command.redirections[0],
        Redirection::Input { target } if target.value == "in.txt"
    ));
    assert!(matches!(
        &command.redirections[1],
        Redirection::Output { fd: 1, target, append: false } if target.value == "out.txt"
    ));
    assert!(matches!(command.redirections[2], Redirection::Duplicate { fd: 2, target: 1, .. }));
}

#[test]
fn redirection_may_precede_words() {
    let line = parse(">>log echo hi");
    let command = &line.commands[0].command;
    assert_eq!(words(command), ["echo", "hi"]);
    assert!(matches!(
        &command.redirections[0],
        Redirection::Output { fd: 1, append: true, .. }
    ));
}

#[test]
fn stderr_append() {
    let line = parse("cc 2>>errs.txt");
    assert!(matches!(
        &line.commands[0].command.redirections[0],
        Redirection::Output { fd: 2, append: true, target } if target.value == "errs.txt"
    ));
}
