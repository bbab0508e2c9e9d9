//! Input parser: tokens into command, arguments, flags, and redirection.

use std::collections::HashMap;

use crate::core::tokenizer::tokenize;

// =============================================================================
// Parsed Command
// =============================================================================

/// Value attached to a parsed flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlagValue {
    /// Flag present with no value (`-l`, `--verbose`).
    Present,
    /// Flag with a string value (`--out=x`, `--out x`, `-o x`).
    Value(String),
}

impl FlagValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Present => None,
            Self::Value(v) => Some(v),
        }
    }
}

/// Flag mapping keyed by flag name without dashes. Repeated flags overwrite.
pub type FlagMap = HashMap<String, FlagValue>;

/// Output redirection mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedirectMode {
    /// `>`: overwrite the target file.
    Write,
    /// `>>`: append to the target file.
    Append,
}

/// Parsed output redirection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub target: String,
    pub mode: RedirectMode,
}

/// One fully parsed input line. Transient, never persisted.
#[derive(Clone, Debug, Default)]
pub struct ParsedCommand {
    pub command: String,
    pub args: Vec<String>,
    pub flags: FlagMap,
    pub redirect: Option<Redirect>,
}

impl ParsedCommand {
    /// True when the line had no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.command.is_empty()
    }
}

// =============================================================================
// Parser
// =============================================================================

/// Parse a raw input line.
///
/// The first token is the command name, except that `./name` splits into the
/// literal command `./` with `name` pushed as the first positional argument.
///
/// Remaining tokens are classified left to right. A flag's value and a
/// redirection target are both "the next token": whichever rule reaches a
/// token first wins. A `>` or `>>` is matched as its own token and is never
/// consumed as a flag value, so `ls -l > out.txt` redirects, while
/// `ls -o out.txt` swallows `out.txt` as the value of `o`. This is an
/// accepted quirk of the grammar, kept because changing it would change
/// which existing scripts parse.
pub fn parse(line: &str) -> ParsedCommand {
    let tokens = tokenize(line);
    let mut parsed = ParsedCommand::default();

    let Some(first) = tokens.first() else {
        return parsed;
    };
    if first.len() > 2 && first.starts_with("./") {
        parsed.command = "./".to_string();
        parsed.args.push(first[2..].to_string());
    } else {
        parsed.command = first.clone();
    }

    let mut i = 1;
    while i < tokens.len() {
        let token = &tokens[i];

        if token == ">" || token == ">>" {
            let mode = if token == ">>" {
                RedirectMode::Append
            } else {
                RedirectMode::Write
            };
            // no target token: the operator is dropped with no effect
            if let Some(target) = tokens.get(i + 1) {
                parsed.redirect = Some(Redirect {
                    target: target.clone(),
                    mode,
                });
                i += 1;
            }
        } else if token == "--" {
            // a bare double dash names no flag; it stays positional
            parsed.args.push(token.clone());
        } else if let Some(name) = token.strip_prefix("--") {
            if let Some((key, value)) = name.split_once('=') {
                parsed
                    .flags
                    .insert(key.to_string(), FlagValue::Value(value.to_string()));
            } else if let Some(value) = value_lookahead(&tokens, i) {
                parsed
                    .flags
                    .insert(name.to_string(), FlagValue::Value(value.to_string()));
                i += 1;
            } else {
                parsed.flags.insert(name.to_string(), FlagValue::Present);
            }
        } else if token.starts_with('-') && token.len() > 1 {
            let short_flags: Vec<char> = token[1..].chars().collect();
            if short_flags.len() == 1 {
                let name = short_flags[0].to_string();
                if let Some(value) = value_lookahead(&tokens, i) {
                    parsed.flags.insert(name, FlagValue::Value(value.to_string()));
                    i += 1;
                } else {
                    parsed.flags.insert(name, FlagValue::Present);
                }
            } else {
                // grouped short flags are all boolean
                for c in short_flags {
                    parsed.flags.insert(c.to_string(), FlagValue::Present);
                }
            }
        } else {
            parsed.args.push(token.clone());
        }

        i += 1;
    }

    parsed
}

/// The next token, when it is eligible as a flag value: it must exist, must
/// not start with `-`, and must not be a redirection operator.
fn value_lookahead<'a>(tokens: &'a [String], i: usize) -> Option<&'a str> {
    tokens
        .get(i + 1)
        .filter(|t| !t.starts_with('-') && *t != ">" && *t != ">>")
        .map(|t| t.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_command() {
        let parsed = parse("pwd");
        assert_eq!(parsed.command, "pwd");
        assert!(parsed.args.is_empty());
        assert!(parsed.flags.is_empty());
        assert!(parsed.redirect.is_none());
    }

    #[test]
    fn test_empty_line() {
        assert!(parse("").is_empty());
        assert!(parse("   ").is_empty());
    }

    #[test]
    fn test_grouped_short_flags_stay_boolean() {
        let parsed = parse("ls -la /tmp");
        assert_eq!(parsed.command, "ls");
        assert_eq!(parsed.flags.get("l"), Some(&FlagValue::Present));
        assert_eq!(parsed.flags.get("a"), Some(&FlagValue::Present));
        assert_eq!(parsed.args, vec!["/tmp"]);
    }

    #[test]
    fn test_single_short_flag_takes_value() {
        let parsed = parse("ls -o out.txt");
        assert_eq!(
            parsed.flags.get("o"),
            Some(&FlagValue::Value("out.txt".to_string()))
        );
        assert!(parsed.args.is_empty());
    }

    #[test]
    fn test_long_flag_forms() {
        let parsed = parse("cp --force --mode=fast --out target x");
        assert_eq!(parsed.flags.get("force"), Some(&FlagValue::Present));
        assert_eq!(
            parsed.flags.get("mode").and_then(FlagValue::as_str),
            Some("fast")
        );
        assert_eq!(
            parsed.flags.get("out"),
            Some(&FlagValue::Value("target".to_string()))
        );
        assert_eq!(parsed.args, vec!["x"]);
    }

    #[test]
    fn test_long_flag_before_flag_stays_boolean() {
        let parsed = parse("ls --all -l");
        assert_eq!(parsed.flags.get("all"), Some(&FlagValue::Present));
        assert_eq!(parsed.flags.get("l"), Some(&FlagValue::Present));
    }

    #[test]
    fn test_bare_double_dash_is_positional() {
        let parsed = parse("echo -- after");
        assert!(parsed.flags.is_empty());
        assert_eq!(parsed.args, vec!["--", "after"]);
    }

    #[test]
    fn test_redirect_write() {
        let parsed = parse("echo hi > out.txt");
        assert_eq!(parsed.args, vec!["hi"]);
        assert!(parsed.flags.is_empty());
        assert_eq!(
            parsed.redirect,
            Some(Redirect {
                target: "out.txt".to_string(),
                mode: RedirectMode::Write,
            })
        );
    }

    #[test]
    fn test_redirect_append() {
        let parsed = parse("echo hi >> log.txt");
        assert_eq!(parsed.redirect.unwrap().mode, RedirectMode::Append);
    }

    #[test]
    fn test_redirect_without_target_is_dropped() {
        let parsed = parse("echo hi >");
        assert_eq!(parsed.args, vec!["hi"]);
        assert!(parsed.redirect.is_none());
    }

    #[test]
    fn test_flag_then_redirect() {
        // `>` is matched as its own token before flag look-ahead reaches it
        let parsed = parse("ls -l > out.txt");
        assert_eq!(parsed.flags.get("l"), Some(&FlagValue::Present));
        assert_eq!(parsed.redirect.unwrap().target, "out.txt");
    }

    #[test]
    fn test_repeated_flags_overwrite() {
        let parsed = parse("x --mode=a --mode=b");
        assert_eq!(
            parsed.flags.get("mode"),
            Some(&FlagValue::Value("b".to_string()))
        );
    }

    #[test]
    fn test_dot_slash_command_split() {
        let parsed = parse("./deploy.sh arg2");
        assert_eq!(parsed.command, "./");
        assert_eq!(parsed.args, vec!["deploy.sh", "arg2"]);
    }

    #[test]
    fn test_bare_dot_slash_is_not_split() {
        let parsed = parse("./");
        assert_eq!(parsed.command, "./");
        assert!(parsed.args.is_empty());
    }

    #[test]
    fn test_quoted_arg_with_dash_stays_positional() {
        let parsed = parse("echo \"-n\"");
        // quoting does not protect from flag classification; the token is
        // the same string either way
        assert_eq!(parsed.flags.get("n"), Some(&FlagValue::Present));
        assert!(parsed.args.is_empty());
    }
}
