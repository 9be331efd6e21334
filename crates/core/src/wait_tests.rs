// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::VecDeque;

/// Replays one (signal, peeked records) pair per wait call, then reports
/// the target as finished.
#[derive(Default)]
struct ScriptedSource {
    steps: VecDeque<(WaitSignal, Vec<InputRecord>)>,
    current: Vec<InputRecord>,
    waits: Vec<(Option<Duration>, bool)>,
}

impl ScriptedSource {
    fn step(mut self, signal: WaitSignal, records: Vec<InputRecord>) -> Self {
        self.steps.push_back((signal, records));
        self
    }

    fn repeat(mut self, count: u32, records: Vec<InputRecord>) -> Self {
        for _ in 0..count {
            self.steps.push_back((WaitSignal::Timeout, records.clone()));
        }
        self
    }
}

impl WaitSource for ScriptedSource {
    fn wait(&mut self, timeout: Option<Duration>, watch_console: bool) -> WaitSignal {
        self.waits.push((timeout, watch_console));
        match self.steps.pop_front() {
            Some((signal, records)) => {
                self.current = records;
                signal
            }
            None => WaitSignal::Target,
        }
    }

    fn peek_input(&mut self) -> Vec<InputRecord> {
        self.current.clone()
    }
}

fn ctrl_b() -> InputRecord {
    InputRecord::Key(KeyRecord::ctrl_b())
}

fn key(virtual_key: u16) -> InputRecord {
    InputRecord::Key(KeyRecord { key_down: true, virtual_key, modifiers: Modifiers::default() })
}

fn lose_focus() -> InputRecord {
    InputRecord::Focus { gained: false }
}

#[test]
fn target_exit_returns_process_exit() {
    let mut source = ScriptedSource::default();
    assert_eq!(WaitController::new().wait(&mut source), WaitOutcome::ProcessExit);
    assert_eq!(source.waits, vec![(None, true)]);
}

#[test]
fn cancel_returns_cancel() {
    let mut source = ScriptedSource::default().step(WaitSignal::Cancel, vec![]);
    assert_eq!(WaitController::new().wait(&mut source), WaitOutcome::Cancel);
}

#[test]
fn eight_ctrl_b_passes_background() {
    let mut source = ScriptedSource::default()
        .step(WaitSignal::ConsoleInput, vec![ctrl_b()])
        .repeat(GESTURE_PASSES - 1, vec![ctrl_b()]);
    assert_eq!(WaitController::new().wait(&mut source), WaitOutcome::Background);
    assert_eq!(source.waits.len(), GESTURE_PASSES as usize);
    assert!(source.waits[1..].iter().all(|w| *w == (Some(POLL_INTERVAL), false)));
}

#[test]
fn seven_ctrl_b_passes_are_not_enough() {
    let mut source = ScriptedSource::default()
        .step(WaitSignal::ConsoleInput, vec![ctrl_b()])
        .repeat(GESTURE_PASSES - 2, vec![ctrl_b()]);
    assert_eq!(WaitController::new().wait(&mut source), WaitOutcome::ProcessExit);
}

#[test]
fn other_key_resets_ctrl_b_count() {
    let mut source = ScriptedSource::default()
        .step(WaitSignal::ConsoleInput, vec![ctrl_b()])
        .repeat(4, vec![ctrl_b()])
        .repeat(1, vec![ctrl_b(), key(0x41)])
        .repeat(GESTURE_PASSES - 1, vec![ctrl_b()]);
    assert_eq!(WaitController::new().wait(&mut source), WaitOutcome::ProcessExit);
}

#[test]
fn ctrl_b_requires_exactly_one_ctrl_and_no_alt() {
    let both_ctrl = KeyRecord {
        modifiers: Modifiers { left_ctrl: true, right_ctrl: true, ..Modifiers::default() },
        ..KeyRecord::ctrl_b()
    };
    let with_alt = KeyRecord {
        modifiers: Modifiers { left_alt: true, ..Modifiers::CTRL },
        ..KeyRecord::ctrl_b()
    };
    let right_ctrl = KeyRecord {
        modifiers: Modifiers { right_ctrl: true, ..Modifiers::default() },
        ..KeyRecord::ctrl_b()
    };
    let key_up = KeyRecord { key_down: false, ..KeyRecord::ctrl_b() };

    assert!(KeyRecord::ctrl_b().is_ctrl_b());
    assert!(right_ctrl.is_ctrl_b());
    assert!(!both_ctrl.is_ctrl_b());
    assert!(!with_alt.is_ctrl_b());
    assert!(!key_up.is_ctrl_b());
}

#[test]
fn key_up_records_do_not_interrupt() {
    let release = InputRecord::Key(KeyRecord { key_down: false, virtual_key: 0x11, modifiers: Modifiers::default() });
    let mut source = ScriptedSource::default()
        .step(WaitSignal::ConsoleInput, vec![ctrl_b()])
        .repeat(GESTURE_PASSES - 1, vec![ctrl_b(), release]);
    assert_eq!(WaitController::new().wait(&mut source), WaitOutcome::Background);
}

#[test]
fn empty_peek_returns_to_indefinite_wait() {
    let mut source = ScriptedSource::default()
        .step(WaitSignal::ConsoleInput, vec![ctrl_b()])
        .repeat(3, vec![ctrl_b()])
        .repeat(1, vec![])
        .repeat(GESTURE_PASSES - 1, vec![ctrl_b()]);
    assert_eq!(WaitController::new().wait(&mut source), WaitOutcome::ProcessExit);
    assert_eq!(source.waits[5], (None, true));
}

#[test]
fn irrelevant_records_keep_polling() {
    let mut source = ScriptedSource::default().step(WaitSignal::ConsoleInput, vec![InputRecord::Other]);
    WaitController::new().wait(&mut source);
    assert_eq!(source.waits[1], (Some(POLL_INTERVAL), false));
}

#[test]
fn focus_loss_reported_once() {
    let mut controller = WaitController::new();
    let mut source = ScriptedSource::default()
        .step(WaitSignal::ConsoleInput, vec![lose_focus()])
        .repeat(GESTURE_PASSES - 1, vec![lose_focus()])
        .repeat(4, vec![lose_focus()]);
    assert_eq!(controller.wait(&mut source), WaitOutcome::LoseFocus);
    assert_eq!(controller.wait(&mut source), WaitOutcome::ProcessExit);
}

#[test]
fn focus_gain_resets_focus_count() {
    let mut source = ScriptedSource::default()
        .step(WaitSignal::ConsoleInput, vec![lose_focus()])
        .repeat(GESTURE_PASSES - 2, vec![lose_focus()])
        .repeat(1, vec![InputRecord::Focus { gained: true }])
        .repeat(GESTURE_PASSES - 1, vec![lose_focus()]);
    assert_eq!(WaitController::new().wait(&mut source), WaitOutcome::ProcessExit);
}
