//! Error types for command execution.
//!
//! Everything here is recoverable: handlers return [`ShellError`] values and
//! the dispatcher converts them into failure results. Nothing in this crate
//! is fatal to the process; the worst outcome is a failed `CommandResult`.

use thiserror::Error;

/// Exit code for a successful command.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for a generic command failure.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code for an unknown command name, matching shell convention.
pub const EXIT_NOT_FOUND: i32 = 127;

/// Failure raised inside a command handler.
///
/// The dispatcher is the sole recovery boundary: any of these surfaces as a
/// user-visible message with an exit code, never as a propagated fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    /// Command name matched nothing in the registry.
    #[error("{0}: command not found")]
    CommandNotFound(String),

    /// Path or file lookup failed.
    #[error("{0}: no such file or directory")]
    NotFound(String),

    /// Expected a directory, found a file.
    #[error("{0}: not a directory")]
    NotADirectory(String),

    /// Expected a file, found a directory.
    #[error("{0}: is a directory")]
    IsADirectory(String),

    /// Creating over an existing name.
    #[error("{0}: file exists")]
    AlreadyExists(String),

    /// Deleting a non-empty directory without `-r`.
    #[error("{0}: directory not empty")]
    DirectoryNotEmpty(String),

    /// Redirected output could not be written into the tree.
    #[error("cannot redirect output to '{0}'")]
    RedirectFailed(String),

    /// Environment variable name failed validation.
    #[error("invalid variable name '{0}' (use letters, digits, underscores)")]
    InvalidVariableName(String),

    /// Script execution aborted.
    #[error("{0}: script failed")]
    ScriptFailed(String),

    /// Anything else a handler wants to report verbatim.
    #[error("{0}")]
    CommandFailed(String),
}

impl ShellError {
    /// Exit code carried by the failure result this error turns into.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandNotFound(_) => EXIT_NOT_FOUND,
            _ => EXIT_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ShellError::CommandNotFound("x".into()).exit_code(), 127);
        assert_eq!(ShellError::NotFound("x".into()).exit_code(), 1);
        assert_eq!(ShellError::CommandFailed("boom".into()).exit_code(), 1);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ShellError::CommandNotFound("frob".into()).to_string(),
            "frob: command not found"
        );
        assert_eq!(
            ShellError::NotFound("a.txt".into()).to_string(),
            "a.txt: no such file or directory"
        );
    }
}
