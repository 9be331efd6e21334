// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

#[test]
fn names_are_case_insensitive() {
    let mut env = Environment::new();
    env.set("Path", "C:\\bin");
    assert_eq!(env.get("PATH"), Some("C:\\bin"));
    assert!(env.contains("path"));

    env.set("PATH", "D:\\bin");
    assert_eq!(env.len(), 1);
    assert_eq!(env.iter().next(), Some(("PATH", "D:\\bin")));
}

#[test]
fn remove_returns_old_value() {
    let mut env: Environment = [("FOO", "bar")].into_iter().collect();
    assert_eq!(env.remove("foo"), Some("bar".to_string()));
    assert!(env.is_empty());
}

#[test]
fn drive_records_are_not_inherited() {
    let env: Environment = [("=C:", "C:\\work"), ("FOO", "1")].into_iter().collect();
    let inherited: Vec<_> = env.inheritable().collect();
    assert_eq!(inherited, vec![("FOO", "1")]);
}

#[yare::parameterized(
    plain = { "FOO=bar", Some(("FOO", "bar")) },
    empty_value = { "FOO=", Some(("FOO", "")) },
    value_with_equals = { "A=b=c", Some(("A", "b=c")) },
    drive_record = { "=C:=C:\\work", Some(("=C:", "C:\\work")) },
    no_separator = { "FOO", None },
)]
fn split_entry_cases(entry: &str, expected: Option<(&str, &str)>) {
    assert_eq!(Environment::split_entry(entry), expected);
}

#[test]
fn diff_produces_sets_and_removes() {
    let before: Environment = [("A", "1"), ("B", "2"), ("C", "3")].into_iter().collect();
    let after: Environment = [("a", "1"), ("B", "20"), ("D", "4")].into_iter().collect();

    let changes = before.diff(&after);
    assert_eq!(
        changes,
        vec![
            EnvChange::Remove { name: "C".to_string() },
            EnvChange::Set { name: "B".to_string(), value: "20".to_string() },
            EnvChange::Set { name: "D".to_string(), value: "4".to_string() },
        ]
    );

    let mut patched = before.clone();
    patched.apply(&changes);
    assert_eq!(patched.get("B"), Some("20"));
    assert_eq!(patched.get("D"), Some("4"));
    assert!(!patched.contains("C"));
}

#[yare::parameterized(
    decimal = { "42", Some(42) },
    negative = { "-7", Some(-7) },
    plus = { "+3", Some(3) },
    padded = { "  12  ", Some(12) },
    trailing_text = { "15 minutes", Some(15) },
    hex = { "0x1F", Some(31) },
    hex_upper_prefix = { "0X10", Some(16) },
    no_digits = { "abc", None },
    empty = { "", None },
    sign_only = { "-", None },
)]
fn parse_number_cases(text: &str, expected: Option<i64>) {
    assert_eq!(parse_number(text), expected);
}

#[test]
fn get_as_number_reads_and_reports() {
    let env: Environment = [("COUNT", "12"), ("WORD", "many")].into_iter().collect();
    assert_eq!(env.get_as_number("count"), Ok(12));
    assert_eq!(
        env.get_as_number("WORD"),
        Err(EnvError::NotANumber { name: "WORD".to_string(), value: "many".to_string() })
    );
    assert_eq!(env.get_as_number("MISSING"), Err(EnvError::NotSet { name: "MISSING".to_string() }));
}

#[yare::parameterized(
    front = { "C:\\a;C:\\b", "C:\\new", Position::Front, "C:\\new;C:\\a;C:\\b" },
    back = { "C:\\a;C:\\b", "C:\\new", Position::Back, "C:\\a;C:\\b;C:\\new" },
    moves_existing_front = { "C:\\a;C:\\B;C:\\c", "c:\\b", Position::Front, "c:\\b;C:\\a;C:\\c" },
    moves_existing_back = { "C:\\a;C:\\b;C:\\c", "C:\\A", Position::Back, "C:\\b;C:\\c;C:\\A" },
    empty_existing = { "", "C:\\new", Position::Front, "C:\\new" },
    drops_empty_parts = { ";C:\\a;;", "C:\\b", Position::Back, "C:\\a;C:\\b" },
    only_duplicate = { "C:\\a", "c:\\a", Position::Back, "c:\\a" },
)]
fn merge_path_cases(existing: &str, component: &str, position: Position, expected: &str) {
    assert_eq!(merge_path(existing, component, position), expected);
}

#[yare::parameterized(
    middle = { "C:\\a;C:\\b;C:\\c", "c:\\B", "C:\\a;C:\\c" },
    all_copies = { "x;y;X", "x", "y" },
    absent = { "x;y", "z", "x;y" },
    empty = { "", "x", "" },
)]
fn remove_path_cases(existing: &str, component: &str, expected: &str) {
    assert_eq!(remove_path(existing, component), expected);
}

proptest! {
    #[test]
    fn merge_places_component_once(
        parts in prop::collection::vec("[a-z]{1,4}", 0..6),
        component in "[a-z]{1,4}",
        front in any::<bool>(),
    ) {
        let existing = parts.join(";");
        let position = if front { Position::Front } else { Position::Back };
        let merged = merge_path(&existing, &component, position);
        let pieces: Vec<&str> = merged.split(';').collect();
        prop_assert_eq!(pieces.iter().filter(|p| **p == component).count(), 1);
        let expected_at = if front { 0 } else { pieces.len() - 1 };
        prop_assert_eq!(pieces[expected_at], component.as_str());
        prop_assert!(!remove_path(&merged, &component).split(';').any(|p| p == component));
    }
}
