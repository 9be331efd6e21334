// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retained output of background programs.

use std::io::{self, Read, Write};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

type Sink = Box<dyn Write + Send>;

#[derive(Default)]
struct BufferState {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    stdout_sink: Option<Sink>,
    stderr_sink: Option<Sink>,
}

/// Shared stdout/stderr capture. Clones refer to the same buffer.
#[derive(Clone, Default)]
pub struct OutputBuffer {
    state: Arc<Mutex<BufferState>>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `bytes` and forwards them to the stream's sink, if any.
    ///
    /// A sink that fails to accept data is detached.
    pub fn append(&self, stream: OutputStream, bytes: &[u8]) {
        let mut state = self.state.lock();
        let state = &mut *state;
        let (data, sink) = match stream {
            OutputStream::Stdout => (&mut state.stdout, &mut state.stdout_sink),
            OutputStream::Stderr => (&mut state.stderr, &mut state.stderr_sink),
        };
        data.extend_from_slice(bytes);
        if let Some(writer) = sink {
            if writer.write_all(bytes).and_then(|()| writer.flush()).is_err() {
                tracing::debug!(?stream, "output sink closed, detaching");
                *sink = None;
            }
        }
    }

    /// Copies of everything retained so far.
    pub fn contents(&self) -> (Vec<u8>, Vec<u8>) {
        let state = self.state.lock();
        (state.stdout.clone(), state.stderr.clone())
    }

    /// Forwards future appends to the given writers as well as the buffer.
    pub fn pipe_to(&self, stdout: Sink, stderr: Sink) {
        let mut state = self.state.lock();
        state.stdout_sink = Some(stdout);
        state.stderr_sink = Some(stderr);
    }

    /// Number of handles sharing this buffer.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.state)
    }

    /// Copies `reader` into the buffer on a background thread until EOF.
    pub fn spawn_reader<R>(&self, stream: OutputStream, mut reader: R) -> io::Result<JoinHandle<()>>
    where
        R: Read + Send + 'static,
    {
        let buffer = self.clone();
        std::thread::Builder::new().name(format!("wsh-buffer-{stream:?}").to_lowercase()).spawn(
            move || {
                let mut chunk = [0u8; 4096];
                loop {
                    match reader.read(&mut chunk) {
                        Ok(0) => break,
                        Ok(n) => buffer.append(stream, &chunk[..n]),
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            tracing::debug!(?stream, error = %e, "buffer reader stopped");
                            break;
                        }
                    }
                }
            },
        )
    }
}

impl std::fmt::Debug for OutputBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("OutputBuffer")
            .field("stdout_len", &state.stdout.len())
            .field("stderr_len", &state.stderr.len())
            .field("piped", &state.stdout_sink.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
