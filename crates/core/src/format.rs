// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delimited variable expansion (`$NAME$`, `%NAME%`).
//!
//! A [`Template`] walks its text once. Runs enclosed by a pair of delimiter
//! characters are handed to a [`Resolver`]; unknown names are emitted back
//! verbatim with their delimiters. Outside a pair, `^` escapes the next
//! character so that it is copied literally and never opens a variable.

/// Initial capacity offered to resolvers before any growth.
const INITIAL_CAPACITY: usize = 64;

/// Caller-supplied mapping from variable name to rendered value.
///
/// `resolve` returns `None` when the name is unknown. Otherwise it returns the
/// number of bytes the value needs; the value is only committed when that
/// number fits within [`VariableBuffer::capacity`]. A larger answer makes the
/// engine grow the buffer and ask again.
pub trait Resolver {
    fn resolve(&mut self, name: &str, out: &mut VariableBuffer) -> Option<usize>;
}

impl<R: Resolver + ?Sized> Resolver for &mut R {
    fn resolve(&mut self, name: &str, out: &mut VariableBuffer) -> Option<usize> {
        (**self).resolve(name, out)
    }
}

/// Resolver that treats every name as unknown.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unresolved;

impl Resolver for Unresolved {
    fn resolve(&mut self, _name: &str, _out: &mut VariableBuffer) -> Option<usize> {
        None
    }
}

/// Adapts a closure returning owned values into a [`Resolver`].
pub struct FnResolver<F>(pub F);

impl<F> Resolver for FnResolver<F>
where
    F: FnMut(&str) -> Option<String>,
{
    fn resolve(&mut self, name: &str, out: &mut VariableBuffer) -> Option<usize> {
        let value = (self.0)(name)?;
        Some(out.offer(&value))
    }
}

/// Bounded output slot handed to a [`Resolver`].
#[derive(Debug)]
pub struct VariableBuffer {
    text: String,
    capacity: usize,
}

impl VariableBuffer {
    fn with_capacity(capacity: usize) -> Self {
        Self { text: String::with_capacity(capacity), capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Writes `value` if it fits and returns the length it requires either way.
    pub fn offer(&mut self, value: &str) -> usize {
        self.text.clear();
        if value.len() <= self.capacity {
            self.text.push_str(value);
        }
        value.len()
    }

    fn grow(&mut self, needed: usize) {
        self.capacity = needed.max(self.capacity * 2);
        self.text = String::with_capacity(self.capacity);
    }

    fn committed(&self, len: usize) -> &str {
        self.text.get(..len).unwrap_or(&self.text)
    }
}

/// An immutable template plus the rules used to expand it.
#[derive(Debug, Clone, Copy)]
pub struct Template<'a> {
    text: &'a str,
    delimiter: char,
    include_escapes: bool,
}

impl<'a> Template<'a> {
    /// A template using `$` as its delimiter.
    pub fn new(text: &'a str) -> Self {
        Self { text, delimiter: '$', include_escapes: false }
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Keep `^` escape characters in the output so that a later parse sees them.
    pub fn include_escapes(mut self, include: bool) -> Self {
        self.include_escapes = include;
        self
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn expand<R: Resolver + ?Sized>(&self, resolver: &mut R) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut buffer = VariableBuffer::with_capacity(INITIAL_CAPACITY);
        let mut rest = self.text;

        while let Some(ch) = rest.chars().next() {
            let after = &rest[ch.len_utf8()..];
            if ch == '^' {
                match after.chars().next() {
                    Some(next) => {
                        if self.include_escapes {
                            out.push('^');
                        }
                        out.push(next);
                        rest = &after[next.len_utf8()..];
                    }
                    None => {
                        out.push('^');
                        rest = after;
                    }
                }
                continue;
            }

            if ch != self.delimiter {
                out.push(ch);
                rest = after;
                continue;
            }

            let Some(close) = after.find(self.delimiter) else {
                // Unterminated run: the delimiter is literal text.
                out.push(ch);
                rest = after;
                continue;
            };

            let name = &after[..close];
            match resolve_into(resolver, name, &mut buffer) {
                Some(value) => out.push_str(value),
                None => {
                    out.push(self.delimiter);
                    out.push_str(name);
                    out.push(self.delimiter);
                }
            }
            rest = &after[close + self.delimiter.len_utf8()..];
        }

        out
    }
}

fn resolve_into<'b, R: Resolver + ?Sized>(
    resolver: &mut R,
    name: &str,
    buffer: &'b mut VariableBuffer,
) -> Option<&'b str> {
    let mut needed = resolver.resolve(name, buffer)?;
    while needed > buffer.capacity() {
        buffer.grow(needed);
        needed = resolver.resolve(name, buffer)?;
    }
    Some(buffer.committed(needed))
}

/// Expands `text` with a closure resolver and `$` as the delimiter.
pub fn expand_with<F>(text: &str, resolve: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    Template::new(text).expand(&mut FnResolver(resolve))
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
