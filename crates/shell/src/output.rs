// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared handles to the shell's own output streams.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// A cloneable writer. Job output forwarding holds clones while the shell
/// keeps writing through its own.
#[derive(Clone)]
pub struct Output {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Output {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self { inner: Arc::new(Mutex::new(Box::new(writer))) }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Writes `text` and a newline, then flushes.
    pub fn line(&self, text: &str) {
        let mut inner = self.inner.lock();
        if let Err(e) = writeln!(inner, "{text}").and_then(|()| inner.flush()) {
            tracing::debug!(error = %e, "shell output closed");
        }
    }

    pub fn bytes(&self, bytes: &[u8]) {
        let mut inner = self.inner.lock();
        if let Err(e) = inner.write_all(bytes).and_then(|()| inner.flush()) {
            tracing::debug!(error = %e, "shell output closed");
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

impl std::fmt::Debug for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Output").finish_non_exhaustive()
    }
}
