// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Semicolon-delimited path lists (`PATH`, `PATHEXT`, `INCLUDE`).

const SEPARATOR: char = ';';

/// Where [`merge_path`] places the new component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Front,
    Back,
}

fn same_component(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn others<'a>(existing: &'a str, component: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    existing
        .split(SEPARATOR)
        .filter(|part| !part.is_empty())
        .filter(move |part| !same_component(part, component))
}

/// Adds `component` to `existing`, dropping any earlier copy of it.
pub fn merge_path(existing: &str, component: &str, position: Position) -> String {
    let tail: Vec<&str> = others(existing, component).collect();
    if tail.is_empty() {
        return component.to_string();
    }
    let tail = tail.join(";");
    if component.is_empty() {
        return tail;
    }
    match position {
        Position::Front => format!("{component}{SEPARATOR}{tail}"),
        Position::Back => format!("{tail}{SEPARATOR}{component}"),
    }
}

/// Drops every copy of `component` from `existing`.
pub fn remove_path(existing: &str, component: &str) -> String {
    others(existing, component).collect::<Vec<_>>().join(";")
}
