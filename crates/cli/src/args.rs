// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line surface: slash switches and the command to run.

/// Rewrites leading slash switches (`/c`, `/k`, `/ss`, `/?`) to the flags
/// clap understands. Rewriting stops at the first word that is not a
/// switch, so the command itself is passed through untouched.
pub fn normalize<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut normalized: Vec<String> = args.next().into_iter().collect();
    let mut switches = true;
    for arg in args {
        if !switches {
            normalized.push(arg);
            continue;
        }
        let arg = switch(&arg).map(str::to_string).unwrap_or(arg);
        // Words after a mode flag, or after any plain word, are the command.
        switches = arg.starts_with('-') && !is_mode(&arg);
        normalized.push(arg);
    }
    normalized
}

fn is_mode(flag: &str) -> bool {
    matches!(flag, "-c" | "-k" | "--subshell" | "--command" | "--keep")
}

fn switch(arg: &str) -> Option<&'static str> {
    let name = arg.strip_prefix('/')?;
    match name.to_ascii_lowercase().as_str() {
        "c" => Some("-c"),
        "k" => Some("-k"),
        "ss" => Some("--subshell"),
        "?" => Some("--help"),
        _ => None,
    }
}

/// Joins the command words into one line. A single word is the line
/// itself; otherwise words containing whitespace are quoted.
pub fn command_line(words: &[String]) -> String {
    if let [line] = words {
        return line.clone();
    }
    words
        .iter()
        .map(|word| {
            if word.is_empty() || word.chars().any(char::is_whitespace) {
                format!("\"{word}\"")
            } else {
                word.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
