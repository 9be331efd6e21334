// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Waiting on a foreground program while watching the console.
//!
//! The controller never consumes console input: it peeks at pending records
//! so that keys meant for the child stay queued. A gesture has to be seen
//! on [`GESTURE_PASSES`] consecutive polling passes before it counts.

use std::time::Duration;

/// Polling cadence while console input is pending.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Consecutive passes needed for Ctrl+B or focus loss to take effect.
pub const GESTURE_PASSES: u32 = 8;

const VK_B: u16 = 0x42;

/// Modifier keys held during a key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub left_ctrl: bool,
    pub right_ctrl: bool,
    pub left_alt: bool,
    pub right_alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const CTRL: Modifiers = Modifiers {
        left_ctrl: true,
        right_ctrl: false,
        left_alt: false,
        right_alt: false,
        shift: false,
    };

    fn exactly_one_ctrl(&self) -> bool {
        self.left_ctrl != self.right_ctrl
    }

    fn any_alt(&self) -> bool {
        self.left_alt || self.right_alt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRecord {
    pub key_down: bool,
    pub virtual_key: u16,
    pub modifiers: Modifiers,
}

impl KeyRecord {
    pub fn ctrl_b() -> Self {
        Self { key_down: true, virtual_key: VK_B, modifiers: Modifiers::CTRL }
    }

    pub fn is_ctrl_b(&self) -> bool {
        self.key_down
            && self.virtual_key == VK_B
            && self.modifiers.exactly_one_ctrl()
            && !self.modifiers.any_alt()
    }
}

/// A console input record as seen by a non-consuming peek.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRecord {
    Key(KeyRecord),
    Focus { gained: bool },
    /// Mouse, resize, and menu records.
    Other,
}

/// What woke a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitSignal {
    Target,
    Cancel,
    ConsoleInput,
    Timeout,
}

/// The handles a wait multiplexes.
pub trait WaitSource {
    /// Blocks until the target or cancel event signals, console input
    /// arrives (only when `watch_console`), or `timeout` elapses.
    fn wait(&mut self, timeout: Option<Duration>, watch_console: bool) -> WaitSignal;

    /// Pending console records, left in the queue.
    fn peek_input(&mut self) -> Vec<InputRecord>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    ProcessExit,
    Cancel,
    Background,
    LoseFocus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Nothing,
    Gestures { ctrl_b: bool, lose_focus: bool },
    Interrupted,
}

fn classify(records: &[InputRecord]) -> Pass {
    if records.is_empty() {
        return Pass::Nothing;
    }
    let mut ctrl_b = false;
    let mut lose_focus = false;
    for record in records {
        match record {
            InputRecord::Key(key) if key.is_ctrl_b() => ctrl_b = true,
            InputRecord::Key(key) if key.key_down => return Pass::Interrupted,
            InputRecord::Key(_) | InputRecord::Other => {}
            InputRecord::Focus { gained: false } => lose_focus = true,
            InputRecord::Focus { gained: true } => return Pass::Interrupted,
        }
    }
    Pass::Gestures { ctrl_b, lose_focus }
}

/// Gesture counters for one foreground wait. Keep the same controller
/// across `LoseFocus` returns so a held gesture is not reported twice.
#[derive(Debug, Default)]
pub struct WaitController {
    ctrl_b_passes: u32,
    lose_focus_passes: u32,
}

impl WaitController {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        self.ctrl_b_passes = 0;
        self.lose_focus_passes = 0;
    }

    pub fn wait(&mut self, source: &mut dyn WaitSource) -> WaitOutcome {
        let mut timeout = None;
        loop {
            let watch_console = timeout.is_none();
            match source.wait(timeout, watch_console) {
                WaitSignal::Target => return WaitOutcome::ProcessExit,
                WaitSignal::Cancel => return WaitOutcome::Cancel,
                WaitSignal::ConsoleInput | WaitSignal::Timeout => {}
            }

            match classify(&source.peek_input()) {
                Pass::Nothing => {
                    self.reset();
                    timeout = None;
                }
                Pass::Interrupted => {
                    self.reset();
                    timeout = Some(POLL_INTERVAL);
                }
                Pass::Gestures { ctrl_b, lose_focus } => {
                    timeout = Some(POLL_INTERVAL);
                    self.ctrl_b_passes = if ctrl_b { self.ctrl_b_passes + 1 } else { 0 };
                    self.lose_focus_passes =
                        if lose_focus { self.lose_focus_passes + 1 } else { 0 };
                    if self.ctrl_b_passes == GESTURE_PASSES {
                        tracing::debug!("ctrl+b held, backgrounding");
                        return WaitOutcome::Background;
                    }
                    if self.lose_focus_passes == GESTURE_PASSES {
                        return WaitOutcome::LoseFocus;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod tests;
