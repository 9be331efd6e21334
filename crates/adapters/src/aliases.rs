// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console-host aliases shared with child processes of the same console.

use std::io;

use wsh_core::alias::AliasTable;

/// Executable name the console keys the shell's aliases under.
pub const ALIAS_EXE_NAME: &str = "wsh.exe";

pub trait ConsoleAliases: Send + Sync {
    /// The aliases the console currently holds for the shell.
    fn snapshot(&self) -> AliasTable;

    /// Defines (`Some`) or deletes (`None`) an alias.
    fn set(&self, name: &str, value: Option<&str>) -> io::Result<()>;
}

/// The console host's alias store. Outside Windows there is no shared store
/// and the shell's own table is authoritative.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAliases;

impl ConsoleAliases for SystemAliases {
    fn snapshot(&self) -> AliasTable {
        crate::sys::console_aliases(ALIAS_EXE_NAME)
    }

    fn set(&self, name: &str, value: Option<&str>) -> io::Result<()> {
        crate::sys::set_console_alias(ALIAS_EXE_NAME, name, value)
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::ConsoleAliases;
    use parking_lot::Mutex;
    use std::io;
    use std::sync::Arc;
    use wsh_core::alias::AliasTable;

    /// In-memory alias store a test can edit behind the shell's back,
    /// the way a child running `doskey` would.
    #[derive(Clone, Default)]
    pub struct FakeAliases {
        inner: Arc<Mutex<AliasTable>>,
    }

    impl FakeAliases {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn table(&self) -> AliasTable {
            self.inner.lock().clone()
        }
    }

    impl ConsoleAliases for FakeAliases {
        fn snapshot(&self) -> AliasTable {
            self.inner.lock().clone()
        }

        fn set(&self, name: &str, value: Option<&str>) -> io::Result<()> {
            let mut inner = self.inner.lock();
            match value {
                Some(value) => inner.set(name, value),
                None => {
                    inner.remove(name);
                }
            }
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeAliases;
