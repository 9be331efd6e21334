// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::buffer::OutputStream;
use crate::test_support::strategies::*;
use crate::test_support::FakeProcess;
use proptest::prelude::*;

fn table_with(pids: &[u32]) -> (JobTable<FakeProcess>, Vec<FakeProcess>) {
    let mut table = JobTable::new();
    let mut handles = Vec::new();
    for pid in pids {
        let process = FakeProcess::new(*pid);
        handles.push(process.clone());
        table.create(process, format!("cmd{pid}"), None);
    }
    (table, handles)
}

#[test]
fn create_assigns_ids_from_one_and_reports() {
    let mut table = JobTable::new();
    let (id, notice) = table.create(FakeProcess::new(10), "build all", None);
    assert_eq!(id, JobId::new(1));
    assert_eq!(notice.to_string(), "Job 1: build all");

    let (id, _) = table.create(FakeProcess::new(11), "test", None);
    assert_eq!(id.get(), 2);
    assert_eq!(table.len(), 2);
}

#[test]
fn scan_reports_completion_once_then_deletes_after_retention() {
    let (mut table, handles) = table_with(&[100]);
    assert!(table.scan(false).is_empty());

    handles[0].exit(3);
    let notices = table.scan(false);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].to_string(), "Job 1 completed, result 3: cmd100");
    assert_eq!(table.info(JobId::new(1)).map(|i| i.state), Some(JobState::CompletedAwaitingDelete));

    for _ in 1..RETENTION_SCANS {
        assert!(table.scan(false).is_empty());
    }
    let notices = table.scan(false);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].to_string(), "Job 1 deleted, result 3: cmd100");
    assert!(table.is_empty());
}

#[test]
fn retained_job_survives_scans() {
    let (mut table, handles) = table_with(&[1]);
    table.retain(JobId::new(1)).unwrap();
    handles[0].exit(0);
    table.scan(false);
    assert_eq!(table.info(JobId::new(1)).map(|i| i.state), Some(JobState::Retained));
    for _ in 0..(RETENTION_SCANS * 2) {
        assert!(table.scan(false).is_empty());
    }
    assert_eq!(table.len(), 1);
}

#[test]
fn retain_after_completion() {
    let (mut table, handles) = table_with(&[1]);
    handles[0].exit(0);
    table.scan(false);
    table.retain(JobId::new(1)).unwrap();
    assert_eq!(table.info(JobId::new(1)).map(|i| i.state), Some(JobState::Retained));
}

#[test]
fn teardown_deletes_everything() {
    let (mut table, handles) = table_with(&[1, 2, 3]);
    handles[0].exit(0);
    table.scan(false);
    table.retain(JobId::new(1)).unwrap();
    handles[1].exit(5);

    let notices: Vec<String> = table.scan(true).iter().map(ToString::to_string).collect();
    assert_eq!(
        notices,
        vec![
            "Job 2 completed, result 5: cmd2",
            "Job 1 deleted, result 0: cmd1",
            "Job 2 deleted, result 5: cmd2",
            "Job 3 deleted: cmd3",
        ]
    );
    assert!(table.is_empty());
}

#[test]
fn ids_are_not_reused_after_teardown() {
    let (mut table, _) = table_with(&[1, 2]);
    table.scan(true);
    let (id, _) = table.create(FakeProcess::new(3), "again", None);
    assert_eq!(id.get(), 3);
}

#[test]
fn terminate_uses_exit_code_one() {
    let (mut table, handles) = table_with(&[7]);
    table.terminate(JobId::new(1)).unwrap();
    assert_eq!(handles[0].terminated_with(), Some(1));

    let notices = table.scan(false);
    assert_eq!(notices[0].to_string(), "Job 1 completed, result 1: cmd7");
    assert!(matches!(table.terminate(JobId::new(1)), Err(JobError::NotExecuting(_))));
}

#[test]
fn unknown_job_is_not_found() {
    let (mut table, _) = table_with(&[1]);
    assert!(matches!(table.terminate(JobId::new(9)), Err(JobError::NotFound(_))));
    assert!(matches!(table.retain(JobId::new(9)), Err(JobError::NotFound(_))));
}

#[test]
fn set_priority_reaches_process() {
    let (mut table, handles) = table_with(&[1]);
    table.set_priority(JobId::new(1), Priority::BelowNormal).unwrap();
    assert_eq!(handles[0].priority(), Some(Priority::BelowNormal));
}

#[yare::parameterized(
    idle = { "idle", Priority::Idle },
    low_alias = { "LOW", Priority::Idle },
    below = { "belownormal", Priority::BelowNormal },
    normal = { "Normal", Priority::Normal },
    above = { "above_normal", Priority::AboveNormal },
    high = { "high", Priority::High },
    realtime = { "realtime", Priority::Realtime },
)]
fn priority_parses(text: &str, expected: Priority) {
    assert_eq!(text.parse::<Priority>().unwrap(), expected);
}

#[test]
fn unknown_priority_is_rejected() {
    assert!(matches!("urgent".parse::<Priority>(), Err(JobError::UnknownPriority(_))));
}

#[test]
fn output_requires_buffer() {
    let mut table = JobTable::new();
    let buffer = OutputBuffer::new();
    buffer.append(OutputStream::Stdout, b"hello\n");
    table.create(FakeProcess::new(1), "with output", Some(buffer));
    table.create(FakeProcess::new(2), "without", None);

    assert_eq!(table.output(JobId::new(1)).unwrap(), (b"hello\n".to_vec(), Vec::new()));
    assert!(matches!(table.output(JobId::new(2)), Err(JobError::NoOutput(_))));
    assert!(matches!(
        table.pipe(JobId::new(2), Box::new(io::sink()), Box::new(io::sink())),
        Err(JobError::NoOutput(_))
    ));
    assert!(table.pipe(JobId::new(1), Box::new(io::sink()), Box::new(io::sink())).is_ok());
}

#[test]
fn wait_cancel_terminates() {
    let (mut table, handles) = table_with(&[1, 2]);
    let outcome = table.wait(JobId::new(1), |_| WaitOutcome::Cancel).unwrap();
    assert_eq!(outcome, WaitOutcome::Cancel);
    assert_eq!(handles[0].terminated_with(), Some(1));

    let outcome = table.wait(JobId::new(2), |_| WaitOutcome::ProcessExit).unwrap();
    assert_eq!(outcome, WaitOutcome::ProcessExit);
    assert_eq!(handles[1].terminated_with(), None);
}

#[test]
fn next_id_walks_in_order() {
    let (mut table, handles) = table_with(&[1, 2, 3]);
    handles[1].exit(0);
    table.scan(false);
    for _ in 0..RETENTION_SCANS {
        table.scan(false);
    }
    assert_eq!(table.next_id(0), 1);
    assert_eq!(table.next_id(1), 3);
    assert_eq!(table.next_id(3), 0);
}

#[test]
fn job_info_serializes() {
    let (table, _) = table_with(&[42]);
    let json = serde_json::to_value(table.list()).unwrap();
    assert_eq!(json[0]["id"], 1);
    assert_eq!(json[0]["state"], "executing");
    assert_eq!(json[0]["pid"], 42);
}

proptest! {
    /// Emitted ids are strictly increasing and completion precedes deletion.
    #[test]
    fn ids_increase_and_reports_are_ordered(ops in job_ops()) {
        let mut table = JobTable::new();
        let mut handles = Vec::new();
        let mut started = Vec::new();
        let mut events: Vec<JobNotice> = Vec::new();

        for create in ops {
            if create {
                let process = FakeProcess::new(handles.len() as u32);
                handles.push(process.clone());
                let (id, _) = table.create(process, "x", None);
                started.push(id.get());
            } else {
                if let Some(first) = handles.iter().find(|h| h.polls() > 0) {
                    first.exit(0);
                }
                events.extend(table.scan(false));
            }
        }

        prop_assert!(started.windows(2).all(|w| w[0] < w[1]));
        for event in &events {
            if let JobNotice::Deleted { id, .. } = event {
                let completed_at = events.iter().position(|e| matches!(e, JobNotice::Completed { id: c, .. } if c == id));
                let deleted_at = events.iter().position(|e| e == event);
                prop_assert!(completed_at < deleted_at);
            }
        }
        for info in table.list() {
            if info.state == JobState::Executing {
                prop_assert!(info.exit_code.is_none());
            }
        }
    }
}
