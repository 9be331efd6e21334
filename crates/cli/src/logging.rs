// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup: stderr by default, daily files under `WSH_LOG_DIR`.

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::env;

/// Prefix of the daily log files.
pub const LOG_FILE_PREFIX: &str = "wsh.log";

/// Parses `directives`, falling back to the default filter when they are
/// malformed.
pub fn filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|e| {
        eprintln!("wsh: ignoring WSH_LOG '{directives}': {e}");
        EnvFilter::new(env::DEFAULT_LOG_FILTER)
    })
}

/// Installs the global subscriber. The returned guard flushes file output
/// on drop and must live until exit.
pub fn init() -> anyhow::Result<Option<WorkerGuard>> {
    let filter = filter(&env::log_filter());
    match env::log_dir() {
        Some(dir) => {
            let (writer, guard) = file_writer(&dir)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .try_init()
                .context("cannot install log subscriber")?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init()
                .context("cannot install log subscriber")?;
            Ok(None)
        }
    }
}

fn file_writer(
    dir: &Path,
) -> anyhow::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
