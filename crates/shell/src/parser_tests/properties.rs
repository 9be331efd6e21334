// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

fn plain_word() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.:\\\\/-]{1,8}".prop_filter("not a bare handle number", |w| {
        !w.chars().all(|c| c.is_ascii_digit())
    })
}

fn link() -> impl Strategy<Value = (&'static str, Link)> {
    prop_oneof![
        Just(("|", Link::Pipe)),
        Just(("&", Link::Then)),
        Just(("&&", Link::And)),
        Just(("||", Link::Or)),
    ]
}

proptest! {
    #[test]
    fn chains_round_trip(
        first in prop::collection::vec(plain_word(), 1..4),
        rest in prop::collection::vec((link(), prop::collection::vec(plain_word(), 1..4)), 0..4),
    ) {
        let mut input = first.join(" ");
        let mut expected_links = Vec::new();
        for ((text, link), words) in &rest {
            input.push_str(&format!(" {text} {}", words.join(" ")));
            expected_links.push(Some(*link));
        }
        expected_links.push(None);

        let line = Parser::parse(&input).unwrap();
        prop_assert_eq!(links(&line), expected_links);
        prop_assert_eq!(line.commands[0].command.words.len(), first.len());
    }

    #[test]
    fn quoted_text_is_one_word(text in "[^\"\\r\\n]{0,20}") {
        let line = Parser::parse(&format!("echo \"{text}\"")).unwrap();
        let command = &line.commands[0].command;
        prop_assert_eq!(words(command), vec!["echo", text.as_str()]);
    }
}
