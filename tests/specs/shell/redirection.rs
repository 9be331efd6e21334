//! Redirection specs
//!
//! Verify builtin output follows file and stream redirections.

use crate::prelude::*;

#[test]
fn output_to_file() {
    let project = Project::empty();
    project.wsh().args(&["-c", "echo hello > out.txt"]).passes().stdout_eq("");
    assert_eq!(project.read("out.txt"), "hello\n");
}

#[test]
fn append_to_file() {
    let project = Project::empty();
    project.file("log.txt", "first\n");
    project.wsh().args(&["-c", "echo second >> log.txt"]).passes();
    assert_eq!(project.read("log.txt"), "first\nsecond\n");
}

#[test]
fn stdout_onto_stderr() {
    cli().args(&["-c", "echo oops 1>&2"]).passes().stdout_eq("").stderr_has("oops");
}

#[test]
fn errors_to_file() {
    let project = Project::empty();
    project.wsh().args(&["-c", "cd missing 2> err.txt"]).exits(1);
    assert!(project.read("err.txt").contains("missing"), "{}", project.read("err.txt"));
}

#[test]
fn missing_input_file_fails() {
    let project = Project::empty();
    project.wsh().args(&["-c", "echo hi < absent.txt"]).exits(1).stderr_has("wsh: redirect failed");
}
