// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Byte ranges within a command line, for error reporting.

/// Half-open byte range `start..end` of the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Self { start, end }
    }

    /// Zero-width span at `pos`, used for errors at end of input.
    pub fn at(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Up to `context_chars` characters either side of `span`, with a caret
/// line underneath:
///
/// ```text
/// echo | | bad
///        ^
/// ```
pub fn context_snippet(input: &str, span: Span, context_chars: usize) -> String {
    let mut at = span.start.min(input.len());
    while !input.is_char_boundary(at) {
        at -= 1;
    }

    let before: Vec<usize> = input[..at].char_indices().map(|(i, _)| i).collect();
    let from = before.len().checked_sub(context_chars).and_then(|k| before.get(k).copied());
    let from = from.unwrap_or(0);
    let to = input[at..]
        .char_indices()
        .nth(context_chars + 1)
        .map_or(input.len(), |(i, _)| at + i);

    let indent = input[from..at].chars().count();
    format!("{}\n{}{}", &input[from..to], " ".repeat(indent), "^".repeat(span.len().max(1)))
}

#[cfg(test)]
#[path = "span_tests.rs"]
mod tests;
