// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use wsh_core::{JobState, Priority};

use super::*;

fn started(h: &mut Harness, line: &str) -> FakeChild {
    let child = FakeChild::new(0);
    h.launcher.push_child(child.clone());
    h.run(line);
    child
}

#[test]
fn background_launch_prints_job_line() {
    let mut h = Harness::new();
    assert_eq!(h.run("server --port 80 &!"), 0);
    assert_eq!(h.stdout(), "Job 1: server --port 80\n");

    let launch = &h.launcher.launches()[0];
    assert!(!launch.capture_environment);
    assert_eq!((launch.stdout, launch.stderr), ("pipe-write", "pipe-write"));
}

#[test]
fn start_launches_a_job_on_a_new_console() {
    let mut h = Harness::new();
    assert_eq!(h.run("start server a^^b"), 0);
    assert_eq!(h.stdout(), "Job 1: server a^^b\n");

    let launch = &h.launcher.launches()[0];
    assert_eq!(launch.argv, ["server", "a^b"]);
    assert!(launch.new_console);
    assert!(launch.new_group);
    assert!(!launch.capture_environment);
    assert_eq!(launch.stdout, "inherit");
}

#[test]
fn start_on_the_same_console_buffers_output() {
    let mut h = Harness::new();
    h.run("start /b server");
    let launch = &h.launcher.launches()[0];
    assert!(!launch.new_console);
    assert!(launch.new_group);
    assert_eq!((launch.stdout, launch.stderr), ("pipe-write", "pipe-write"));
}

#[test]
fn background_line_keeps_file_redirects() {
    let mut h = Harness::new();
    h.run("server > log.txt &!");
    assert_eq!(h.launcher.launches()[0].stdout, "file");
}

#[test]
fn background_job_completes_at_scan() {
    let mut h = Harness::new();
    let child = started(&mut h, "server &!");

    h.shell.scan_jobs(false);
    assert_eq!(h.stdout(), "Job 1: server\n");

    child.finish(3);
    h.shell.scan_jobs(false);
    assert_eq!(h.stdout(), "Job 1: server\nJob 1 completed, result 3: server\n");
}

#[test]
fn completed_job_is_deleted_after_retention() {
    let mut h = Harness::new();
    let child = started(&mut h, "server &!");
    child.finish(0);
    for _ in 0..=wsh_core::job::RETENTION_SCANS {
        h.shell.scan_jobs(false);
    }
    assert!(h.stdout().ends_with("Job 1 deleted, result 0: server\n"));
    assert!(h.shell.jobs().is_empty());
}

#[test]
fn job_ids_increase() {
    let mut h = Harness::new();
    h.run("a &!");
    h.run("b &!");
    let ids: Vec<u32> = h.shell.jobs().iter().map(|job| job.id.get()).collect();
    assert_eq!(ids, [1, 2]);
}

#[test]
fn job_lists_jobs() {
    let mut h = Harness::new();
    let child = started(&mut h, "first &!");
    h.run("second &!");
    child.finish(2);
    h.shell.scan_jobs(false);

    let before = h.stdout().len();
    assert_eq!(h.run("job"), 0);
    let listing = h.stdout()[before..].to_string();
    assert_eq!(
        listing,
        "Job 1 (completed, result 2): first\nJob 2 (executing, pid 1002): second\n"
    );
}

#[test]
fn job_json() {
    let mut h = Harness::new();
    h.run("server &!");
    let before = h.stdout().len();
    h.run("job --json");

    let listing: serde_json::Value = serde_json::from_str(&h.stdout()[before..]).unwrap();
    assert_eq!(listing[0]["id"], 1);
    assert_eq!(listing[0]["state"], "executing");
    assert_eq!(listing[0]["command"], "server");
}

#[test]
fn job_kill() {
    let mut h = Harness::new();
    let child = started(&mut h, "server &!");
    assert_eq!(h.run("job -k 1"), 0);
    assert_eq!(child.terminated_with(), Some(wsh_core::TERMINATED_EXIT_CODE));
}

#[test]
fn job_priority() {
    let mut h = Harness::new();
    let child = started(&mut h, "server &!");
    assert_eq!(h.run("job -p 1 idle"), 0);
    assert_eq!(child.priority(), Some(Priority::Idle));

    assert_eq!(h.run("job -p 1 fastest"), 1);
    assert_eq!(h.stderr(), "wsh: job failed: unknown priority class 'fastest'\n");
}

#[test]
fn job_output() {
    let mut h = Harness::new();
    h.launcher.push_child(FakeChild::new(0).with_output("built\n"));
    h.run("build &!");

    assert!(eventually(|| {
        let before = h.stdout().len();
        h.run("job -o 1");
        h.stdout()[before..] == *"built\n"
    }));
}

#[test]
fn job_retain_survives_scans() {
    let mut h = Harness::new();
    let child = started(&mut h, "server &!");
    h.run("job -r 1");
    child.finish(0);
    for _ in 0..=wsh_core::job::RETENTION_SCANS {
        h.shell.scan_jobs(false);
    }
    assert_eq!(h.shell.jobs()[0].state, JobState::Retained);
}

#[test]
fn job_wait_blocks_until_exit() {
    let mut h = Harness::new();
    let child = started(&mut h, "server &!");
    assert_eq!(h.run("job -w 1"), 0);
    assert!(child.is_finished());
}

#[test]
fn job_errors() {
    let mut h = Harness::new();
    assert_eq!(h.run("job -k 9"), 1);
    assert_eq!(h.stderr(), "wsh: job failed: job 9 not found\n");

    assert_eq!(h.run("job -k x"), 1);
    assert!(h.stderr().ends_with("wsh: job failed: invalid job id 'x'\n"));

    assert_eq!(h.run("job --bogus"), 1);
    assert!(h.stderr().ends_with("wsh: job failed: usage: job [--json | -k N | -p N CLASS | -o N | -w N | -r N | -t N]\n"));
}

#[test]
fn teardown_reports_executing_jobs_as_deleted() {
    let mut h = Harness::new();
    h.run("server &!");
    h.shell.scan_jobs(true);
    assert_eq!(h.stdout(), "Job 1: server\nJob 1 deleted: server\n");
    assert!(h.shell.jobs().is_empty());
}

#[test]
fn builtins_in_background_lines_run_inline() {
    let mut h = Harness::new();
    assert_eq!(h.run("echo inline &!"), 0);
    assert_eq!(h.stdout(), "inline\n");
    assert!(h.shell.jobs().is_empty());
}

#[test]
fn job_tee_forwards_future_output() {
    let mut h = Harness::new();
    h.run("server &!");
    assert_eq!(h.run("job -t 1"), 0);
    assert_eq!(h.run("job -t 7"), 1);
}
