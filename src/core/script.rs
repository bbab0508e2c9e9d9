//! Script interpreter for `./name` execution.
//!
//! Deliberately smaller than the interactive grammar: it understands an
//! optional shebang line, comments, and a fixed set of built-ins (`echo`,
//! `export`, `cd`, `ls`). `echo` substitutes `$VAR` references from the
//! environment. Any line it does not understand aborts the whole script.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::RECOGNIZED_SHELLS;
use crate::core::env::Environment;
use crate::core::tree::VirtualTree;
use crate::models::OutputLine;

static VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$[A-Za-z_][A-Za-z0-9_]*").unwrap());

/// Run the script at `target`, appending its output to `out`.
///
/// A shebang is optional: when the first non-blank line starts with `#!`
/// it must name a recognized interpreter, otherwise execution just starts
/// at the top. Returns `false` when the file is missing, is a directory,
/// declares an unrecognized interpreter, or contains a line the interpreter
/// cannot execute. Lines produced before an abort are kept in `out`.
pub fn run(
    target: &str,
    tree: &mut VirtualTree,
    env: &mut Environment,
    out: &mut Vec<OutputLine>,
) -> bool {
    let Some(content) = tree.get_node(target).and_then(|n| n.content()).map(str::to_string)
    else {
        warn!(target, "script not found or not a file");
        return false;
    };

    let all: Vec<&str> = content.lines().collect();
    let mut start = 0;
    if let Some(idx) = all.iter().position(|l| !l.trim().is_empty())
        && let Some(interpreter) = all[idx].trim().strip_prefix("#!")
    {
        if !RECOGNIZED_SHELLS.iter().any(|s| interpreter.contains(s)) {
            warn!(target, interpreter, "unrecognized interpreter");
            return false;
        }
        start = idx + 1;
    }

    for line in &all[start..] {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !run_line(line, tree, env, out) {
            warn!(target, line, "script aborted");
            return false;
        }
    }
    debug!(target, "script finished");
    true
}

/// Execute a single script line. Unknown commands fail the script.
fn run_line(
    line: &str,
    tree: &mut VirtualTree,
    env: &mut Environment,
    out: &mut Vec<OutputLine>,
) -> bool {
    let words = split_words(line);
    let Some((command, rest)) = words.split_first() else {
        return true;
    };

    match command.as_str() {
        "echo" => {
            let joined = rest.join(" ");
            out.push(OutputLine::text(substitute_vars(&joined, env)));
            true
        }
        "export" => {
            let Some((key, value)) = rest.first().and_then(|w| w.split_once('=')) else {
                return false;
            };
            env.set(key.trim(), value.trim()).is_ok()
        }
        "cd" => {
            let target = rest.first().map(String::as_str).unwrap_or("~");
            tree.set_current_directory(target)
        }
        "ls" => {
            for entry in tree.list(rest.first().map(String::as_str)) {
                if entry.is_dir {
                    out.push(OutputLine::dir_entry(entry.name));
                } else {
                    out.push(OutputLine::file_entry(entry.name));
                }
            }
            true
        }
        _ => false,
    }
}

/// Replace `$VAR` references with their environment values; unknown
/// variables expand to the empty string.
fn substitute_vars(text: &str, env: &Environment) -> String {
    VAR_PATTERN
        .replace_all(text, |caps: &regex::Captures<'_>| {
            env.get(&caps[0][1..]).unwrap_or("").to_string()
        })
        .into_owned()
}

/// Split a line on spaces, honoring single and double quotes. Quote
/// characters delimit words and are not kept; there is no escape syntax.
fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == ' ' => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            None => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
