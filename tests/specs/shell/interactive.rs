//! Interactive loop specs
//!
//! Verify lines are read from stdin until end of input or `exit`.

use crate::prelude::*;

#[test]
fn runs_each_line_until_end_of_input() {
    cli().stdin("echo one\necho two\n").passes().stdout_eq("one\ntwo\n");
}

#[test]
fn exit_ends_the_session_with_its_code() {
    cli().stdin("exit 6\necho unreachable\n").exits(6).stdout_eq("");
}

#[test]
fn end_of_input_exits_with_last_code() {
    cli().stdin("false\n").exits(1);
}

#[test]
fn errorlevel_tracks_the_previous_line() {
    cli().stdin("false\necho %ERRORLEVEL%\n").passes().stdout_eq("1\n");
}

#[test]
fn prompt_is_rendered_before_each_line() {
    cli().env("WSH_PROMPT", "$G$ ").stdin("echo hi\n").passes().stdout_eq("> hi\n> ");
}

#[test]
fn keep_runs_the_command_then_prompts() {
    cli().args(&["-k", "echo first"]).stdin("echo second\n").passes().stdout_eq("first\nsecond\n");
}

#[test]
fn keep_with_exit_does_not_prompt() {
    cli().args(&["/k", "exit 2"]).stdin("echo unreachable\n").exits(2).stdout_lacks("unreachable");
}

#[test]
fn init_script_runs_before_the_first_prompt() {
    let project = Project::empty();
    let init = project.file("init.ys1", "set FROM_INIT=yes\n");
    project.wsh().env("WSH_INIT", &init).stdin("echo %FROM_INIT%\n").passes().stdout_eq("yes\n");
}

#[test]
fn variables_persist_between_lines() {
    cli().stdin("set GREETING=hello\necho %GREETING% there\n").passes().stdout_eq("hello there\n");
}

#[test]
fn cd_persists_between_lines() {
    let project = Project::empty();
    std::fs::create_dir(project.path().join("sub")).unwrap();
    let out = project.wsh().stdin("cd sub\ncd\n").passes().stdout();
    assert!(out.trim_end().ends_with("sub"), "{out}");
}

#[test]
fn aliases_expand_on_later_lines() {
    cli().stdin("alias greet=echo hello\ngreet world\n").passes().stdout_eq("hello world\n");
}
