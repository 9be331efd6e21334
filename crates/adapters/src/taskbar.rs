// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{self, IsTerminal, Write};

use parking_lot::Mutex;

/// OSC 9;4 state 3: indeterminate progress.
const PROGRESS_SET: &str = "\x1b]9;4;3;0\x07";
/// OSC 9;4 state 0: no progress.
const PROGRESS_CLEAR: &str = "\x1b]9;4;0;0\x07";

/// Adapter for the console window's taskbar progress indicator
pub trait Taskbar: Send + Sync {
    /// Show (or clear) the "task in progress" state
    fn set_in_progress(&self, in_progress: bool);
}

/// Taskbar adapter writing ConEmu/Windows Terminal progress sequences.
///
/// The sequence is only written when the target is a terminal, so redirected
/// output never sees it.
pub struct TerminalTaskbar {
    out: Mutex<Box<dyn Write + Send>>,
    enabled: bool,
}

impl TerminalTaskbar {
    pub fn stdout() -> Self {
        let enabled = io::stdout().is_terminal();
        Self { out: Mutex::new(Box::new(io::stdout())), enabled }
    }

    /// Writes to `out` unconditionally.
    pub fn to_writer(out: Box<dyn Write + Send>) -> Self {
        Self { out: Mutex::new(out), enabled: true }
    }
}

impl Taskbar for TerminalTaskbar {
    fn set_in_progress(&self, in_progress: bool) {
        if !self.enabled {
            return;
        }
        let sequence = if in_progress { PROGRESS_SET } else { PROGRESS_CLEAR };
        let mut out = self.out.lock();
        if let Err(e) = out.write_all(sequence.as_bytes()).and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "taskbar progress update failed");
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::Taskbar;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct FakeTaskbarState {
        calls: Vec<bool>,
    }

    /// Fake taskbar recording each progress update
    #[derive(Clone)]
    pub struct FakeTaskbar {
        inner: Arc<Mutex<FakeTaskbarState>>,
    }

    impl Default for FakeTaskbar {
        fn default() -> Self {
            Self { inner: Arc::new(Mutex::new(FakeTaskbarState { calls: Vec::new() })) }
        }
    }

    impl FakeTaskbar {
        pub fn new() -> Self {
            Self::default()
        }

        /// Get all recorded updates
        pub fn calls(&self) -> Vec<bool> {
            self.inner.lock().calls.clone()
        }
    }

    impl Taskbar for FakeTaskbar {
        fn set_in_progress(&self, in_progress: bool) {
            self.inner.lock().calls.push(in_progress);
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTaskbar;

#[cfg(test)]
#[path = "taskbar_tests.rs"]
mod tests;
