// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wsh-adapters: Operating system access for the wsh shell

pub mod aliases;
pub mod cancel;
pub mod console;
pub mod process;
pub mod taskbar;

mod sys;

pub use aliases::{ConsoleAliases, SystemAliases, ALIAS_EXE_NAME};
pub use cancel::CancelToken;
pub use console::{ConsoleInput, SystemConsole};
pub use process::{
    ChildProcess, LaunchError, LaunchRequest, ProcessLauncher, StdioSpec, SystemChild,
    SystemLauncher,
};
pub use taskbar::{Taskbar, TerminalTaskbar};

#[cfg(any(test, feature = "test-support"))]
pub use aliases::FakeAliases;
#[cfg(any(test, feature = "test-support"))]
pub use console::FakeConsole;
#[cfg(any(test, feature = "test-support"))]
pub use process::{FakeChild, FakeLauncher, LaunchRecord};
#[cfg(any(test, feature = "test-support"))]
pub use taskbar::FakeTaskbar;
