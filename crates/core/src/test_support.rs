// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fakes and proptest strategies shared by this crate's tests and by
//! dependent crates (behind the `test-support` feature).

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::job::{JobProcess, Priority};

#[derive(Debug, Default)]
struct FakeProcessState {
    exit_code: Option<i32>,
    terminated_with: Option<u32>,
    priority: Option<Priority>,
    polls: usize,
}

/// A [`JobProcess`] whose completion is controlled by the test.
///
/// Clones share state, so a test can keep one handle while the job table
/// owns another.
#[derive(Debug, Clone)]
pub struct FakeProcess {
    pid: u32,
    state: Arc<Mutex<FakeProcessState>>,
}

impl FakeProcess {
    pub fn new(pid: u32) -> Self {
        Self { pid, state: Arc::new(Mutex::new(FakeProcessState::default())) }
    }

    pub fn exit(&self, code: i32) {
        self.state.lock().exit_code = Some(code);
    }

    pub fn terminated_with(&self) -> Option<u32> {
        self.state.lock().terminated_with
    }

    pub fn priority(&self) -> Option<Priority> {
        self.state.lock().priority
    }

    pub fn polls(&self) -> usize {
        self.state.lock().polls
    }
}

impl JobProcess for FakeProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn poll_exit(&mut self) -> io::Result<Option<i32>> {
        let mut state = self.state.lock();
        state.polls += 1;
        Ok(state.exit_code)
    }

    fn terminate(&mut self, exit_code: u32) -> io::Result<()> {
        let mut state = self.state.lock();
        state.terminated_with = Some(exit_code);
        state.exit_code = Some(exit_code as i32);
        Ok(())
    }

    fn set_priority(&mut self, priority: Priority) -> io::Result<()> {
        self.state.lock().priority = Some(priority);
        Ok(())
    }
}

pub mod strategies {
    use proptest::prelude::*;

    /// Environment variable names (uppercase, Windows-safe).
    pub fn var_name() -> impl Strategy<Value = String> {
        "[A-Z][A-Z0-9_]{0,7}".prop_map(String::from)
    }

    /// Values without delimiters, escapes, or NULs.
    pub fn var_value() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 ._-]{0,12}".prop_map(String::from)
    }

    /// A job-table workload: `true` creates a job, `false` runs a scan.
    pub fn job_ops() -> impl Strategy<Value = Vec<bool>> {
        prop::collection::vec(any::<bool>(), 1..40)
    }
}
