// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Walks a debuggee's PEB to its environment block and current directory.
//!
//! PEB → ProcessParameters → { Environment, CurrentDirectory.DosPath }.
//! Offsets depend only on the pointer width of the debuggee.

use std::path::PathBuf;

use super::{CapturedState, DebugError};
use crate::env::{BlockEncoding, EnvBlock};

pub const PAGE_SIZE: u64 = 0x1000;

/// Largest environment read, measured from the start of the pointer's page.
pub const ENVIRONMENT_WINDOW: u64 = 0x10000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFailure {
    PartialCopy,
    NoAccess,
    Other,
}

/// Cross-process memory access.
pub trait MemoryReader {
    /// Fills all of `buf` from `address` or fails.
    fn read(&self, address: u64, buf: &mut [u8]) -> Result<(), ReadFailure>;
}

/// Field offsets for one pointer width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PebLayout {
    pub pointer_size: u64,
    /// `PEB.ProcessParameters`
    pub process_parameters: u64,
    /// `RTL_USER_PROCESS_PARAMETERS.CurrentDirectory.DosPath`
    pub current_directory: u64,
    /// `RTL_USER_PROCESS_PARAMETERS.Environment`
    pub environment: u64,
}

impl PebLayout {
    pub const BITS32: PebLayout = PebLayout {
        pointer_size: 4,
        process_parameters: 0x10,
        current_directory: 0x24,
        environment: 0x48,
    };

    pub const BITS64: PebLayout = PebLayout {
        pointer_size: 8,
        process_parameters: 0x20,
        current_directory: 0x38,
        environment: 0x80,
    };

    /// Offset of `UNICODE_STRING.Buffer`.
    fn string_buffer(&self) -> u64 {
        self.pointer_size
    }
}

fn read_exact<M: MemoryReader + ?Sized>(
    reader: &M,
    address: u64,
    buf: &mut [u8],
    what: &'static str,
) -> Result<(), DebugError> {
    reader.read(address, buf).map_err(|_| DebugError::Read { what, address })
}

pub fn read_pointer<M: MemoryReader + ?Sized>(
    reader: &M,
    address: u64,
    layout: PebLayout,
    what: &'static str,
) -> Result<u64, DebugError> {
    if layout.pointer_size == 4 {
        let mut raw = [0u8; 4];
        read_exact(reader, address, &mut raw, what)?;
        Ok(u64::from(u32::from_le_bytes(raw)))
    } else {
        let mut raw = [0u8; 8];
        read_exact(reader, address, &mut raw, what)?;
        Ok(u64::from_le_bytes(raw))
    }
}

/// Reads a `UNICODE_STRING` located at `address`.
pub fn read_unicode_string<M: MemoryReader + ?Sized>(
    reader: &M,
    address: u64,
    layout: PebLayout,
) -> Result<String, DebugError> {
    let mut length = [0u8; 2];
    read_exact(reader, address, &mut length, "string length")?;
    let length = u16::from_le_bytes(length);
    if length == 0 {
        return Ok(String::new());
    }
    let buffer = read_pointer(reader, address + layout.string_buffer(), layout, "string buffer")?;
    let mut raw = vec![0u8; usize::from(length)];
    read_exact(reader, buffer, &mut raw, "string contents")?;
    let units: Vec<u16> =
        raw.chunks_exact(2).map(|pair| u16::from_le_bytes([pair[0], pair[1]])).collect();
    Ok(String::from_utf16_lossy(&units))
}

/// Reads as much of the block at `address` as is contiguous and readable.
///
/// Starts with the window that ends 64 KiB past the pointer's page and
/// retreats one page per partial-copy or no-access failure.
pub fn read_environment_block<M: MemoryReader + ?Sized>(
    reader: &M,
    address: u64,
) -> Result<Vec<u8>, DebugError> {
    let mut window = ENVIRONMENT_WINDOW - (address % PAGE_SIZE);
    let mut buf = vec![0u8; window as usize];
    loop {
        match reader.read(address, &mut buf[..window as usize]) {
            Ok(()) if window >= 2 => {
                buf.truncate(window as usize);
                return Ok(buf);
            }
            Err(ReadFailure::PartialCopy | ReadFailure::NoAccess) if window > PAGE_SIZE => {
                window -= PAGE_SIZE;
            }
            _ => return Err(DebugError::Read { what: "environment block", address }),
        }
    }
}

/// `C:\work\` → `C:\work`; roots keep their separator.
fn trim_directory(dir: &str) -> &str {
    let trimmed = dir.trim_end_matches(['\\', '/']);
    if trimmed.is_empty() || trimmed.ends_with(':') {
        dir
    } else {
        trimmed
    }
}

/// Reads the environment and current directory of the process whose PEB
/// lives at `peb`. `widen` converts ANSI blocks to UTF-16.
pub fn capture<M, F>(
    reader: &M,
    peb: u64,
    layout: PebLayout,
    encoding: BlockEncoding,
    widen: F,
) -> Result<CapturedState, DebugError>
where
    M: MemoryReader + ?Sized,
    F: FnOnce(&[u8]) -> Vec<u16>,
{
    let params = read_pointer(reader, peb + layout.process_parameters, layout, "process parameters")?;
    let environment = read_pointer(reader, params + layout.environment, layout, "environment pointer")?;
    let current_dir = read_unicode_string(reader, params + layout.current_directory, layout)?;

    let raw = read_environment_block(reader, environment)?;
    let block = match encoding {
        BlockEncoding::Wide => EnvBlock::from_wide_bytes(&raw)?,
        BlockEncoding::Ansi => EnvBlock::from_ansi(&raw, widen)?,
    };
    tracing::debug!(bytes = raw.len(), entries = block.entries().count(), "captured environment");

    Ok(CapturedState {
        environment: block.decode(),
        current_dir: PathBuf::from(trim_directory(&current_dir)),
    })
}

#[cfg(test)]
#[path = "peb_tests.rs"]
mod tests;
