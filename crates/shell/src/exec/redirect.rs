// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opening the standard handles of one launch group.

use std::fs::{File, OpenOptions};
use std::io::{self, PipeReader, Write};
use std::path::Path;

use wsh_adapters::StdioSpec;
use wsh_core::{ExecContext, InputRedirect, OutputBuffer, OutputRedirect, OutputStream};

use super::error::ExecError;
use crate::output::Output;

/// Opened handles for one program of a group.
#[derive(Debug, Default)]
pub(crate) struct ProcessStdio {
    pub(crate) stdin: StdioSpec,
    pub(crate) stdout: StdioSpec,
    pub(crate) stderr: StdioSpec,
    /// Set when either output stream feeds a job buffer.
    pub(crate) buffer: Option<OutputBuffer>,
}

// ---------------------------------------------------------------------------
// Preparation
// ---------------------------------------------------------------------------

/// Opens every redirection of `group` before anything is launched, so a
/// failure leaves no program running. `is_builtin` programs never get job
/// buffers; their output goes to the shell's streams instead.
pub(crate) fn prepare<F>(
    group: &[ExecContext],
    cwd: &Path,
    is_builtin: F,
) -> Result<Vec<ProcessStdio>, ExecError>
where
    F: Fn(&ExecContext) -> bool,
{
    let mut prepared = Vec::with_capacity(group.len());
    let mut pipe: Option<PipeReader> = None;

    for exec in group {
        let incoming = pipe.take();
        let stdin = match &exec.stdin {
            InputRedirect::Default => StdioSpec::Inherit,
            InputRedirect::Null => StdioSpec::Null,
            InputRedirect::File(path) => {
                let path = cwd.join(path);
                let file = File::open(&path)
                    .map_err(|source| ExecError::RedirectFailed { target: path, source })?;
                StdioSpec::File(file)
            }
            InputRedirect::Pipe => incoming.map(StdioSpec::PipeRead).unwrap_or(StdioSpec::Null),
        };

        let buffered = !is_builtin(exec);
        let mut buffer = None;
        let stdout = open_output(
            &exec.stdout,
            OutputStream::Stdout,
            cwd,
            buffered.then_some(&mut buffer),
            &mut pipe,
        )?;
        let stderr = open_output(
            &exec.stderr,
            OutputStream::Stderr,
            cwd,
            buffered.then_some(&mut buffer),
            &mut pipe,
        )?;

        let (stdout, stderr) = match (stdout, stderr) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            (None, Some(stderr)) => (share(&stderr, StdioSpec::ParentStderr)?, stderr),
            (Some(stdout), None) => {
                let stderr = share(&stdout, StdioSpec::ParentStdout)?;
                (stdout, stderr)
            }
            (None, None) => (StdioSpec::Inherit, StdioSpec::Inherit),
        };

        prepared.push(ProcessStdio { stdin, stdout, stderr, buffer });
    }
    Ok(prepared)
}

/// Opens one output target; `None` means the stream follows the other one.
fn open_output(
    redirect: &OutputRedirect,
    stream: OutputStream,
    cwd: &Path,
    buffer: Option<&mut Option<OutputBuffer>>,
    pipe: &mut Option<PipeReader>,
) -> Result<Option<StdioSpec>, ExecError> {
    let spec = match redirect {
        OutputRedirect::Default => StdioSpec::Inherit,
        OutputRedirect::Null => StdioSpec::Null,
        OutputRedirect::Overwrite(path) => StdioSpec::File(open_file(cwd, path, false)?),
        OutputRedirect::Append(path) => StdioSpec::File(open_file(cwd, path, true)?),
        OutputRedirect::Pipe => {
            let (reader, writer) = io::pipe().map_err(pipe_error)?;
            *pipe = Some(reader);
            StdioSpec::PipeWrite(writer)
        }
        OutputRedirect::Buffer => match buffer {
            Some(buffer) => {
                let (reader, writer) = io::pipe().map_err(pipe_error)?;
                buffer
                    .get_or_insert_with(OutputBuffer::new)
                    .spawn_reader(stream, reader)
                    .map_err(pipe_error)?;
                StdioSpec::PipeWrite(writer)
            }
            None => StdioSpec::Inherit,
        },
        OutputRedirect::ToOther => return Ok(None),
    };
    Ok(Some(spec))
}

fn open_file(cwd: &Path, path: &Path, append: bool) -> Result<File, ExecError> {
    let path = cwd.join(path);
    let mut options = OpenOptions::new();
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options
        .create(true)
        .open(&path)
        .map_err(|source| ExecError::RedirectFailed { target: path, source })
}

/// A second handle on `other`; an inherited stream maps to the shell's own.
fn share(other: &StdioSpec, inherited: StdioSpec) -> Result<StdioSpec, ExecError> {
    match other {
        StdioSpec::Inherit => Ok(inherited),
        other => other.try_clone().map_err(pipe_error),
    }
}

fn pipe_error(source: io::Error) -> ExecError {
    ExecError::RedirectFailed { target: "pipe".into(), source }
}

// ---------------------------------------------------------------------------
// Builtin output
// ---------------------------------------------------------------------------

/// Writes a builtin's output for `stream` to wherever `spec` points.
pub(crate) fn deliver(
    spec: StdioSpec,
    stream: OutputStream,
    bytes: Vec<u8>,
    stdout: &Output,
    stderr: &Output,
) -> io::Result<()> {
    match spec {
        StdioSpec::Inherit => {
            match stream {
                OutputStream::Stdout => stdout.bytes(&bytes),
                OutputStream::Stderr => stderr.bytes(&bytes),
            }
            Ok(())
        }
        StdioSpec::ParentStdout => {
            stdout.bytes(&bytes);
            Ok(())
        }
        StdioSpec::ParentStderr => {
            stderr.bytes(&bytes);
            Ok(())
        }
        StdioSpec::Null | StdioSpec::PipeRead(_) => Ok(()),
        StdioSpec::File(mut file) => file.write_all(&bytes),
        // The reader may be launched after us; don't block on a full pipe.
        StdioSpec::PipeWrite(mut pipe) => std::thread::Builder::new()
            .name("wsh-builtin-pipe".into())
            .spawn(move || {
                if let Err(e) = pipe.write_all(&bytes) {
                    tracing::debug!(error = %e, "builtin pipe closed");
                }
            })
            .map(drop),
    }
}

#[cfg(test)]
#[path = "redirect_tests.rs"]
mod tests;
