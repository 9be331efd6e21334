// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Lifecycle of one debuggee as the pump sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildState {
    Unknown,
    Created,
    Running,
    Exited,
    Reaped,
}

#[derive(Debug)]
pub struct DebuggedChild<O> {
    pub pid: u32,
    pub tid: u32,
    pub process: O,
    pub thread: O,
    pub state: ChildState,
    pub stepped_initial_breakpoint: bool,
}

/// Debuggees of one pump, keyed by pid. Small, so lookups are linear.
#[derive(Debug)]
pub struct DebuggedChildren<O> {
    entries: Vec<DebuggedChild<O>>,
}

impl<O> Default for DebuggedChildren<O> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<O> DebuggedChildren<O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks a new debuggee, replacing a stale entry with the same pid.
    pub fn insert(&mut self, pid: u32, tid: u32, process: O, thread: O) {
        self.entries.retain(|child| child.pid != pid);
        self.entries.push(DebuggedChild {
            pid,
            tid,
            process,
            thread,
            state: ChildState::Created,
            stepped_initial_breakpoint: false,
        });
    }

    pub fn get(&self, pid: u32) -> Option<&DebuggedChild<O>> {
        self.entries.iter().find(|child| child.pid == pid)
    }

    pub fn get_mut(&mut self, pid: u32) -> Option<&mut DebuggedChild<O>> {
        self.entries.iter_mut().find(|child| child.pid == pid)
    }

    pub fn state(&self, pid: u32) -> ChildState {
        self.get(pid).map_or(ChildState::Unknown, |child| child.state)
    }

    pub fn remove(&mut self, pid: u32) -> Option<DebuggedChild<O>> {
        let index = self.entries.iter().position(|child| child.pid == pid)?;
        let mut child = self.entries.remove(index);
        child.state = ChildState::Reaped;
        Some(child)
    }

    pub fn pids(&self) -> Vec<u32> {
        self.entries.iter().map(|child| child.pid).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
