// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Non-destructive access to the console input queue.

use wsh_core::wait::InputRecord;

/// Records are peeked, not consumed, so typed input still reaches whatever
/// reads the console next.
pub trait ConsoleInput: Send + Sync {
    /// Whether any record is queued.
    fn has_input(&self) -> bool;

    fn peek(&self) -> Vec<InputRecord>;

    /// Drops queued records (the Ctrl+B presses that backgrounded a child).
    fn discard_pending(&self);

    /// Whether this is the OS console, whose input handle waits can block on.
    fn is_system_console(&self) -> bool {
        false
    }
}

/// The shell's own console input.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemConsole;

impl SystemConsole {
    pub fn new() -> Self {
        Self
    }
}

impl ConsoleInput for SystemConsole {
    fn has_input(&self) -> bool {
        crate::sys::console_has_input()
    }

    fn peek(&self) -> Vec<InputRecord> {
        crate::sys::console_peek()
    }

    fn discard_pending(&self) {
        crate::sys::console_discard();
    }

    fn is_system_console(&self) -> bool {
        true
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::ConsoleInput;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use wsh_core::wait::InputRecord;

    #[derive(Default)]
    struct FakeConsoleState {
        /// Each peek consumes one pass.
        passes: VecDeque<Vec<InputRecord>>,
        discards: usize,
    }

    /// Console whose queue is scripted pass by pass.
    #[derive(Clone, Default)]
    pub struct FakeConsole {
        inner: Arc<Mutex<FakeConsoleState>>,
    }

    impl FakeConsole {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues the records the next peek returns.
        pub fn push_pass(&self, records: Vec<InputRecord>) {
            self.inner.lock().passes.push_back(records);
        }

        /// Queues `count` identical passes.
        pub fn hold(&self, records: Vec<InputRecord>, count: usize) {
            let mut inner = self.inner.lock();
            for _ in 0..count {
                inner.passes.push_back(records.clone());
            }
        }

        pub fn discards(&self) -> usize {
            self.inner.lock().discards
        }
    }

    impl ConsoleInput for FakeConsole {
        fn has_input(&self) -> bool {
            self.inner.lock().passes.front().is_some_and(|pass| !pass.is_empty())
        }

        fn peek(&self) -> Vec<InputRecord> {
            self.inner.lock().passes.pop_front().unwrap_or_default()
        }

        fn discard_pending(&self) {
            let mut inner = self.inner.lock();
            inner.passes.clear();
            inner.discards += 1;
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeConsole;
