//! Command-line surface specs
//!
//! Verify help, version and argument errors.

use crate::prelude::*;

#[test]
fn help_shows_usage_and_modes() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("--command")
        .stdout_has("--subshell");
}

#[test]
fn slash_question_mark_shows_help() {
    cli().args(&["/?"]).passes().stdout_has("Usage:");
}

#[test]
fn version_shows_package_version() {
    cli().args(&["--version"]).passes().stdout_has("wsh 0.2.0");
}

#[test]
fn unknown_flag_is_a_usage_error() {
    cli().args(&["--bogus"]).exits(2).stderr_has("--bogus");
}

#[test]
fn command_words_need_a_mode() {
    cli().args(&["echo", "hi"]).fails();
}

#[test]
fn two_modes_conflict() {
    cli().args(&["-c", "-k", "echo"]).fails().stderr_has("cannot be used with");
}
