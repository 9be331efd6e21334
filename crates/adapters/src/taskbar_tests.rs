// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Arc;

#[derive(Clone, Default)]
struct SharedWriter(Arc<Mutex<Vec<u8>>>);

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn writes_progress_sequences() {
    let sink = SharedWriter::default();
    let taskbar = TerminalTaskbar::to_writer(Box::new(sink.clone()));
    taskbar.set_in_progress(true);
    taskbar.set_in_progress(false);
    let written = String::from_utf8(sink.0.lock().clone()).unwrap();
    assert_eq!(written, "\x1b]9;4;3;0\x07\x1b]9;4;0;0\x07");
}

#[test]
fn fake_records_calls() {
    let taskbar = FakeTaskbar::new();
    taskbar.set_in_progress(true);
    taskbar.clone().set_in_progress(false);
    assert_eq!(taskbar.calls(), vec![true, false]);
}
