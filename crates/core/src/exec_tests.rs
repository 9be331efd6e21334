// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn exec(argv: &[&str], next: NextCondition) -> ExecContext {
    let mut ctx = ExecContext::new(argv.iter().map(|s| s.to_string()).collect());
    ctx.next = next;
    ctx
}

#[yare::parameterized(
    unconditional_success = { NextCondition::Unconditional, 0, true },
    unconditional_failure = { NextCondition::Unconditional, 3, true },
    concurrent = { NextCondition::Concurrent, 1, true },
    on_success_with_zero = { NextCondition::OnSuccess, 0, true },
    on_success_with_failure = { NextCondition::OnSuccess, 1, false },
    on_failure_with_zero = { NextCondition::OnFailure, 0, false },
    on_failure_with_failure = { NextCondition::OnFailure, -1, true },
    never = { NextCondition::Never, 0, false },
)]
fn next_condition(condition: NextCondition, exit_code: i32, expected: bool) {
    assert_eq!(condition.should_continue(exit_code), expected);
}

#[test]
fn new_context_waits_and_captures() {
    let ctx = ExecContext::new(vec!["cmd".to_string()]);
    assert!(ctx.wait_for_completion);
    assert!(ctx.capture_environment);
    assert_eq!(ctx.next, NextCondition::Never);
    assert_eq!(ctx.program(), Some("cmd"));
}

#[test]
fn background_buffers_default_streams_only() {
    let mut ctx = exec(&["build"], NextCondition::Never);
    ctx.stderr = OutputRedirect::Null;
    let ctx = ctx.into_background();
    assert!(!ctx.wait_for_completion);
    assert!(!ctx.capture_environment);
    assert_eq!(ctx.stdout, OutputRedirect::Buffer);
    assert_eq!(ctx.stderr, OutputRedirect::Null);
}

#[yare::parameterized(
    new_console = { true, false, false, OutputRedirect::Default },
    new_console_waited = { true, true, true, OutputRedirect::Default },
    same_console = { false, false, false, OutputRedirect::Buffer },
    same_console_waited = { false, true, true, OutputRedirect::Default },
)]
fn started_programs(new_console: bool, wait: bool, waits: bool, stdout: OutputRedirect) {
    let ctx = exec(&["server"], NextCondition::Never).into_started(new_console, wait);
    assert!(ctx.terminate_gracefully);
    assert!(ctx.include_escapes);
    assert!(!ctx.capture_environment);
    assert_eq!(ctx.run_on_second_console, new_console);
    assert_eq!(ctx.wait_for_completion, waits);
    assert_eq!(ctx.stdout, stdout);
}

#[yare::parameterized(
    plain = { &["echo", "hi"], false, "echo hi" },
    spaces = { &["copy", "my file.txt", "b"], false, "copy \"my file.txt\" b" },
    operator = { &["echo", "a&b"], false, "echo \"a&b\"" },
    empty_arg = { &["x", ""], false, "x \"\"" },
    escapes_kept = { &["echo", "a^b"], true, "echo a^^b" },
    escapes_plain = { &["echo", "a^b"], false, "echo a^b" },
)]
fn command_line_quoting(argv: &[&str], include_escapes: bool, expected: &str) {
    let mut ctx = exec(argv, NextCondition::Never);
    ctx.include_escapes = include_escapes;
    assert_eq!(ctx.command_line(), expected);
    assert_eq!(ctx.to_string(), expected);
}

#[test]
fn pipeline_groups_concurrent_runs() {
    let pipeline = Pipeline::new(vec![
        exec(&["a"], NextCondition::Concurrent),
        exec(&["b"], NextCondition::OnSuccess),
        exec(&["c"], NextCondition::Unconditional),
        exec(&["d"], NextCondition::Never),
    ]);
    let groups: Vec<Vec<&str>> = pipeline
        .groups()
        .iter()
        .map(|group| group.iter().filter_map(|e| e.program()).collect())
        .collect();
    assert_eq!(groups, vec![vec!["a", "b"], vec!["c"], vec!["d"]]);
}

#[test]
fn pipeline_groups_trailing_concurrent() {
    let pipeline = Pipeline::new(vec![exec(&["a"], NextCondition::Concurrent)]);
    assert_eq!(pipeline.groups().len(), 1);
    assert!(Pipeline::default().groups().is_empty());
}
