// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    pipe = { "a | b", Link::Pipe },
    then = { "a & b", Link::Then },
    and = { "a && b", Link::And },
    or = { "a || b", Link::Or },
)]
fn single_link(input: &str, link: Link) {
    let line = parse(input);
    assert_eq!(links(&line), [Some(link), None]);
}

#[test]
fn mixed_chain_keeps_order() {
    let line = parse("a | b && c || d & e");
    assert_eq!(
        links(&line),
        [Some(Link::Pipe), Some(Link::And), Some(Link::Or), Some(Link::Then), None]
    );
    let names: Vec<_> = line.commands.iter().filter_map(|c| c.command.name()).collect();
    assert_eq!(names, ["a", "b", "c", "d", "e"]);
}

#[test]
fn trailing_ampersand_is_dropped() {
    let line = parse("a &");
    assert_eq!(links(&line), [None]);
    assert!(!line.background);
}

#[test]
fn trailing_background_marker() {
    let line = parse("build all &!");
    assert!(line.background);
    assert_eq!(links(&line), [None]);
    assert_eq!(words(&line.commands[0].command), ["build", "all"]);
}

#[test]
fn background_chain() {
    let line = parse("a | b &!");
    assert!(line.background);
    assert_eq!(links(&line), [Some(Link::Pipe), None]);
}
