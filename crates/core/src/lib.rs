// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wsh-core: Platform-neutral engine for the wsh shell

pub mod alias;
pub mod buffer;
pub mod debug;
pub mod env;
pub mod exec;
pub mod format;
pub mod job;
pub mod script;
pub mod wait;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use alias::{AliasChange, AliasTable};
pub use buffer::{OutputBuffer, OutputStream};
pub use debug::{Architecture, CapturedState, DebugError, DebugSession, SessionOutcome};
pub use env::{merge_path, parse_number, remove_path, EnvBlock, EnvChange, EnvError, Environment};
pub use exec::{ExecContext, InputRedirect, NextCondition, OutputRedirect, Pipeline};
pub use format::{expand_with, FnResolver, Resolver, Template, VariableBuffer};
pub use job::{
    JobError, JobId, JobInfo, JobNotice, JobProcess, JobState, JobTable, Priority,
    TERMINATED_EXIT_CODE,
};
pub use script::{is_script, Script, ScriptError, ScriptHost};
pub use wait::{
    InputRecord, KeyRecord, Modifiers, WaitController, WaitOutcome, WaitSignal, WaitSource,
};
