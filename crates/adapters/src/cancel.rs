// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shell's cancel event, raised by Ctrl+C / Ctrl+Break.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// The token the OS interrupt handler raises.
static CONSOLE_TOKEN: OnceLock<CancelToken> = OnceLock::new();

/// Manual-reset cancel flag shared between the interrupt handler and waits.
/// On Windows the flag is mirrored by an event that blocking waits include.
#[derive(Debug, Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    #[cfg(windows)]
    event: Option<Arc<crate::sys::CancelEvent>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    /// A token no OS handler raises.
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            #[cfg(windows)]
            event: crate::sys::CancelEvent::new()
                .inspect_err(|e| tracing::warn!(error = %e, "no cancel event, waits will poll"))
                .ok()
                .map(Arc::new),
        }
    }

    /// The process-wide token, with the console interrupt handler installed
    /// on first use.
    pub fn console() -> io::Result<Self> {
        if let Some(token) = CONSOLE_TOKEN.get() {
            return Ok(token.clone());
        }
        let token = CONSOLE_TOKEN.get_or_init(CancelToken::new).clone();
        crate::sys::install_interrupt_handler()?;
        tracing::debug!("interrupt handler installed");
        Ok(token)
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        #[cfg(windows)]
        if let Some(event) = &self.event {
            event.set();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
        #[cfg(windows)]
        if let Some(event) = &self.event {
            event.reset();
        }
    }

    #[cfg(windows)]
    pub(crate) fn event(&self) -> Option<&crate::sys::CancelEvent> {
        self.event.as_deref()
    }
}

/// Called from the OS handler.
pub(crate) fn raise_console_token() {
    if let Some(token) = CONSOLE_TOKEN.get() {
        token.cancel();
    }
}

#[cfg(test)]
#[path = "cancel_tests.rs"]
mod tests;
