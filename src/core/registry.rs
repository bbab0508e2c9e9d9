//! Command registry and dispatcher.
//!
//! Commands are trait objects behind one capability interface. Primary
//! names and aliases share a single flat lowercase namespace; the last
//! registration wins. Dispatch is the shell's sole recovery boundary: any
//! error a handler returns is downgraded to a failure result instead of
//! propagating.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::core::env::Environment;
use crate::core::parser::{self, FlagMap, RedirectMode};
use crate::core::tree::VirtualTree;
use crate::error::ShellError;
use crate::models::{CommandResult, OutputLine, TextStyle};

// =============================================================================
// Execution Context
// =============================================================================

/// Everything a handler gets to work with for one invocation.
///
/// Holding `&mut VirtualTree` for the duration of the call is what
/// serializes command execution: no two commands can mutate the tree at the
/// same time because no two contexts can exist at the same time.
pub struct ExecutionContext<'a> {
    pub args: Vec<String>,
    pub flags: FlagMap,
    pub tree: &'a mut VirtualTree,
    pub env: &'a mut Environment,
    /// Working directory at dispatch time, in display form.
    pub cwd: String,
    sink: Vec<OutputLine>,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(
        args: Vec<String>,
        flags: FlagMap,
        tree: &'a mut VirtualTree,
        env: &'a mut Environment,
    ) -> Self {
        let cwd = tree.current_directory().to_string();
        Self {
            args,
            flags,
            tree,
            env,
            cwd,
            sink: Vec::new(),
        }
    }

    /// Send one line to the output sink.
    pub fn emit(&mut self, text: impl Into<String>, style: TextStyle) {
        self.sink.push(OutputLine {
            text: text.into(),
            style,
        });
    }

    pub fn emit_line(&mut self, line: OutputLine) {
        self.sink.push(line);
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    fn into_output(self) -> Vec<OutputLine> {
        self.sink
    }
}

// =============================================================================
// Command Handlers
// =============================================================================

/// Capability interface implemented by every command.
pub trait CommandHandler {
    /// Run the command. Output goes through the context sink; failures are
    /// returned, never panicked.
    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), ShellError>;

    /// Argument completion hook, consulted once the command name itself is
    /// complete. Default: no suggestions.
    fn completions(&self, _args: &[String], _tree: &VirtualTree) -> Vec<String> {
        Vec::new()
    }
}

/// Static description of one registered command.
pub struct CommandDescriptor {
    pub name: String,
    pub aliases: Vec<String>,
    pub handler: Box<dyn CommandHandler>,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>, handler: impl CommandHandler + 'static) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            handler: Box::new(handler),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Maps command names and aliases to handlers.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandDescriptor>,
    /// alias -> primary name, both lowercase.
    aliases: HashMap<String, String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its lowercased name and aliases. Names and
    /// aliases live in one flat namespace: whatever previously held any of
    /// the new entries, primary or alias, is evicted (along with the evicted
    /// command's own aliases). Last registration wins.
    pub fn register(&mut self, descriptor: CommandDescriptor) {
        let name = descriptor.name.to_lowercase();
        self.aliases.remove(&name);
        for alias in &descriptor.aliases {
            let alias = alias.to_lowercase();
            if self.commands.remove(&alias).is_some() {
                self.aliases.retain(|_, primary| *primary != alias);
            }
            self.aliases.insert(alias, name.clone());
        }
        self.commands.insert(name, descriptor);
    }

    /// Remove a command and every alias pointing at it.
    pub fn unregister(&mut self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.aliases.retain(|_, primary| *primary != name);
        self.commands.remove(&name).is_some()
    }

    /// Look up a descriptor by primary name or alias, case-insensitively.
    /// Registration keeps the two maps' keys disjoint, so at most one of
    /// them can match.
    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        let name = name.to_lowercase();
        self.commands
            .get(&name)
            .or_else(|| self.commands.get(self.aliases.get(&name)?))
    }

    /// Sorted, duplicate-free union of primary names and aliases matching a
    /// prefix case-insensitively. Returned in stored lowercase form.
    pub fn complete_name(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        let mut matches: Vec<String> = self
            .commands
            .keys()
            .chain(self.aliases.keys())
            .filter(|name| name.starts_with(&prefix))
            .cloned()
            .collect();
        matches.sort();
        matches.dedup();
        matches
    }

    /// Completion entry point for a whole input line. Until the first space
    /// this completes command names; afterwards it delegates to the matched
    /// command's completion hook.
    pub fn complete(&self, input: &str, tree: &VirtualTree) -> Vec<String> {
        let input = input.trim_start();
        match input.split_once(' ') {
            None => self.complete_name(input),
            Some((command, rest)) => {
                let args: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
                self.get(command)
                    .map(|d| d.handler.completions(&args, tree))
                    .unwrap_or_default()
            }
        }
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Parse and execute one raw input line against the tree and
    /// environment.
    ///
    /// Empty input is a successful no-op. An unknown command fails with
    /// exit code 127. A handler error becomes a failure result with that
    /// error's exit code; nothing propagates past this boundary. Redirected
    /// output is written into the tree and stripped from the displayed
    /// result.
    pub fn dispatch(
        &self,
        line: &str,
        tree: &mut VirtualTree,
        env: &mut Environment,
    ) -> CommandResult {
        let parsed = parser::parse(line);
        if parsed.is_empty() {
            return CommandResult::empty();
        }

        let Some(descriptor) = self.get(&parsed.command) else {
            let err = ShellError::CommandNotFound(parsed.command.clone());
            return CommandResult::failure(err.to_string(), err.exit_code());
        };

        debug!(command = %descriptor.name, args = ?parsed.args, "dispatching");
        let mut ctx = ExecutionContext::new(parsed.args, parsed.flags, tree, env);
        let outcome = descriptor.handler.execute(&mut ctx);
        let output = ctx.into_output();

        match outcome {
            Err(err) => {
                debug!(command = %descriptor.name, %err, "command failed");
                CommandResult::failure_with_output(err.to_string(), err.exit_code(), output)
            }
            Ok(()) => {
                let Some(redirect) = parsed.redirect else {
                    return CommandResult::ok(output);
                };
                if output.is_empty() {
                    return CommandResult::ok(output);
                }
                let text: String = output
                    .iter()
                    .map(|l| l.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n");
                let append = redirect.mode == RedirectMode::Append;
                if tree.write_file_at(&redirect.target, &text, append) {
                    // redirected output is not displayed
                    CommandResult::empty()
                } else {
                    warn!(target = %redirect.target, "redirect write failed");
                    let err = ShellError::RedirectFailed(redirect.target);
                    CommandResult::failure(err.to_string(), err.exit_code())
                }
            }
        }
    }
}
