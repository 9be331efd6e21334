// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serialized environment blocks: `KEY=VALUE\0` records followed by `\0`.

use super::{EnvError, Environment};

/// Storage encoding of a captured block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEncoding {
    /// UTF-16LE, used everywhere except NT 3.10.
    Wide,
    /// Bytes in the active ANSI code page (NT 3.10 only).
    Ansi,
}

/// A validated UTF-16 environment block.
///
/// The logical length runs through the double-NUL terminator; anything the
/// allocation held beyond that is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvBlock {
    units: Vec<u16>,
}

impl EnvBlock {
    pub fn encode(env: &Environment) -> Self {
        let mut units = Vec::new();
        for (name, value) in env.iter() {
            units.extend(name.encode_utf16());
            units.push(u16::from(b'='));
            units.extend(value.encode_utf16());
            units.push(0);
        }
        if units.is_empty() {
            units.push(0);
        }
        units.push(0);
        Self { units }
    }

    /// Validates a raw UTF-16 allocation.
    pub fn from_wide(mut units: Vec<u16>) -> Result<Self, EnvError> {
        let len = validate(&units).ok_or(EnvError::MissingTerminator)?;
        units.truncate(len);
        Ok(Self { units })
    }

    /// Validates a raw little-endian byte buffer holding UTF-16 units.
    pub fn from_wide_bytes(bytes: &[u8]) -> Result<Self, EnvError> {
        let units = bytes.chunks_exact(2).map(|pair| u16::from_le_bytes([pair[0], pair[1]])).collect();
        Self::from_wide(units)
    }

    /// Validates an ANSI allocation and widens it with `widen`.
    pub fn from_ansi<F>(bytes: &[u8], widen: F) -> Result<Self, EnvError>
    where
        F: FnOnce(&[u8]) -> Vec<u16>,
    {
        let len = validate(bytes).ok_or(EnvError::MissingTerminator)?;
        Self::from_wide(widen(&bytes[..len]))
    }

    pub fn as_units(&self) -> &[u16] {
        &self.units
    }

    /// Records in block order, without their terminators.
    pub fn entries(&self) -> impl Iterator<Item = String> + '_ {
        self.units
            .split(|unit| *unit == 0)
            .take_while(|record| !record.is_empty())
            .map(String::from_utf16_lossy)
    }

    pub fn decode(&self) -> Environment {
        let mut env = Environment::new();
        for entry in self.entries() {
            if let Some((name, value)) = Environment::split_entry(&entry) {
                env.set(name, value);
            }
        }
        env
    }
}

/// Returns the logical length of a block (through its double-NUL), if any.
pub fn validate<T: Copy + Default + PartialEq>(units: &[T]) -> Option<usize> {
    let nul = T::default();
    units.windows(2).position(|pair| pair[0] == nul && pair[1] == nul).map(|at| at + 2)
}

#[cfg(test)]
#[path = "block_tests.rs"]
mod tests;
