//! Shell session facade.
//!
//! Owns the three pieces of session state (file tree, environment, command
//! registry) and exposes the line-in, result-out surface a frontend drives:
//! run a line, ask for completions, snapshot or restore the tree.

use tracing::debug;

use crate::core::{builtin_registry, CommandDescriptor, CommandRegistry, Environment, VirtualTree};
use crate::models::CommandResult;

/// One interactive shell session.
pub struct Shell {
    tree: VirtualTree,
    env: Environment,
    registry: CommandRegistry,
}

impl Shell {
    /// Fresh session: seeded tree, default environment, built-in commands.
    pub fn new() -> Self {
        debug!("starting shell session");
        Self {
            tree: VirtualTree::new(),
            env: Environment::new(),
            registry: builtin_registry(),
        }
    }

    /// Session over a tree restored from a storage blob. Corrupt blobs fall
    /// back to the seeded tree.
    pub fn with_tree_blob(blob: &str) -> Self {
        Self {
            tree: VirtualTree::from_json(blob),
            env: Environment::new(),
            registry: builtin_registry(),
        }
    }

    /// Execute one input line.
    pub fn run_line(&mut self, line: &str) -> CommandResult {
        self.registry.dispatch(line, &mut self.tree, &mut self.env)
    }

    /// Completion candidates for a partial input line.
    pub fn complete(&self, line: &str) -> Vec<String> {
        self.registry.complete(line, &self.tree)
    }

    /// The working directory in display form, for prompt rendering.
    pub fn prompt_path(&self) -> &str {
        self.tree.current_directory()
    }

    /// Serialize the file tree for persistence.
    pub fn save_tree(&self) -> serde_json::Result<String> {
        self.tree.to_json()
    }

    /// Add or replace a command. Frontends use this to layer their own
    /// commands over the built-ins.
    pub fn register(&mut self, descriptor: CommandDescriptor) {
        self.registry.register(descriptor);
    }

    pub fn tree(&self) -> &VirtualTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut VirtualTree {
        &mut self.tree
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        let shell = Shell::new();
        assert_eq!(shell.prompt_path(), "~");
        assert_eq!(shell.env().get("HOME"), Some("/home/user"));
    }

    #[test]
    fn test_run_line_updates_prompt() {
        let mut shell = Shell::new();
        assert!(shell.run_line("cd /tmp").success);
        assert_eq!(shell.prompt_path(), "/tmp");
    }

    #[test]
    fn test_save_and_restore() {
        let mut shell = Shell::new();
        shell.run_line("echo persisted > keep.txt");
        let blob = shell.save_tree().unwrap();

        let restored = Shell::with_tree_blob(&blob);
        assert_eq!(
            restored.tree().read_file("keep.txt").as_deref(),
            Some("persisted")
        );
        // working directory is session state, not persisted state
        assert_eq!(restored.prompt_path(), "~");
    }
}
