// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn args(words: &[&str]) -> Vec<String> {
    std::iter::once("wsh").chain(words.iter().copied()).map(String::from).collect()
}

#[parameterized(
    run = { &["/c", "echo", "hi"], &["-c", "echo", "hi"] },
    upper = { &["/C", "exit", "3"], &["-c", "exit", "3"] },
    keep = { &["/k", "set"], &["-k", "set"] },
    subshell = { &["/ss", "true"], &["--subshell", "true"] },
    help = { &["/?"], &["--help"] },
    command_untouched = { &["/c", "dir", "/k"], &["-c", "dir", "/k"] },
    dash_flags_pass = { &["-c", "/ss"], &["-c", "/ss"] },
    unknown_slash = { &["/x"], &["/x"] },
    none = { &[], &[] },
)]
fn normalizes_slash_switches(input: &[&str], expected: &[&str]) {
    assert_eq!(normalize(args(input)), args(expected));
}

#[test]
fn words_after_first_command_word_are_kept() {
    assert_eq!(normalize(args(&["script.wsh", "/c"])), args(&["script.wsh", "/c"]));
}

#[parameterized(
    single_word_verbatim = { &["echo a && echo b"], "echo a && echo b" },
    plain_words = { &["echo", "hi"], "echo hi" },
    quotes_spaces = { &["echo", "a b"], "echo \"a b\"" },
    quotes_empty = { &["echo", ""], "echo \"\"" },
    nothing = { &[], "" },
)]
fn joins_command_words(words: &[&str], expected: &str) {
    let words: Vec<String> = words.iter().map(|w| w.to_string()).collect();
    assert_eq!(command_line(&words), expected);
}
