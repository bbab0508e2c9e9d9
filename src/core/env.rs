//! Environment variable mapping.
//!
//! One `Environment` is created at process start and threaded by mutable
//! reference into every dispatch call; there is no ambient global state.

use std::collections::BTreeMap;

use crate::config;
use crate::error::ShellError;

/// Check if a variable name is valid.
///
/// Valid names must:
/// - Not be empty
/// - Start with a letter or underscore
/// - Contain only alphanumeric characters and underscores
pub fn is_valid_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Mutable environment variable mapping shared by prompt commands and the
/// script interpreter. Iteration is sorted by key.
#[derive(Clone, Debug)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Environment seeded with the configured defaults.
    pub fn new() -> Self {
        let mut env = Self::empty();
        for (key, value) in config::DEFAULT_ENV_VARS {
            env.vars.insert(key.to_string(), value.to_string());
        }
        env
    }

    pub fn empty() -> Self {
        Self {
            vars: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Set a variable, validating its name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ShellError> {
        if !is_valid_var_name(key) {
            return Err(ShellError::InvalidVariableName(key.to_string()));
        }
        self.vars.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Remove a variable. Returns whether it existed.
    pub fn unset(&mut self, key: &str) -> bool {
        self.vars.remove(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
