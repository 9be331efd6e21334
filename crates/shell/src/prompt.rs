// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt templates such as `$P$$G$ `.

use std::path::Path;

use wsh_core::expand_with;

/// Prompt used when `WSH_PROMPT` is unset.
pub const DEFAULT_PROMPT: &str = "$P$$G$ ";

/// Expands a prompt template. Names sit between `$` pairs: `$P$` is the
/// working directory and `$G$`, `$L$`, `$B$`, `$Q$`, `$E$`, `$_$` stand
/// for `>`, `<`, `|`, `=`, escape and newline. Unknown names are kept as
/// written.
pub fn render(template: &str, cwd: &Path) -> String {
    expand_with(template, |name| {
        let value = match name.to_ascii_uppercase().as_str() {
            "P" => return Some(cwd.display().to_string()),
            "G" => ">",
            "L" => "<",
            "B" => "|",
            "Q" => "=",
            "E" => "\x1b",
            "_" => "\n",
            _ => return None,
        };
        Some(value.to_string())
    })
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
