//! Script specs
//!
//! Verify `.ys1` scripts run with arguments, labels and subroutines.

use crate::prelude::*;

#[test]
fn script_receives_arguments() {
    let project = Project::empty();
    project.file("greet.ys1", "echo hello %1%\necho all: %*%\n");
    project
        .wsh()
        .args(&["-c", "greet.ys1 world again"])
        .passes()
        .stdout_eq("hello world\nall: world again\n");
}

#[test]
fn goto_skips_lines() {
    let project = Project::empty();
    project.file("jump.ys1", "goto :end\necho skipped\n:end\necho done\n");
    project.wsh().args(&["-c", "jump.ys1"]).passes().stdout_eq("done\n");
}

#[test]
fn exit_in_script_sets_code() {
    let project = Project::empty();
    project.file("quit.ys1", "echo leaving\nexit 9\necho unreachable\n");
    project.wsh().args(&["-c", "quit.ys1"]).exits(9).stdout_eq("leaving\n");
}

#[test]
fn script_changes_outlive_the_script() {
    let project = Project::empty();
    project.file("setup.ys1", "set MODE=release\n");
    project.wsh().stdin("setup.ys1\necho %MODE%\n").passes().stdout_eq("release\n");
}

#[test]
fn missing_label_is_an_error() {
    let project = Project::empty();
    project.file("bad.ys1", "goto nowhere\n");
    project
        .wsh()
        .args(&["-c", "bad.ys1"])
        .exits(1)
        .stderr_has("wsh: goto failed: label 'nowhere' not found");
}

#[test]
fn missing_script_is_an_error() {
    let project = Project::empty();
    project.wsh().args(&["-c", "absent.ys1"]).exits(1).stderr_has("wsh: script failed");
}
