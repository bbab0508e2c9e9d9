//! Output lines and command results.

use crate::error::EXIT_SUCCESS;

/// Style tag attached to each output line so the display surface can
/// render it without re-parsing the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyle {
    Plain,
    /// Error message (red)
    Error,
    /// Success message (green)
    Success,
    /// Info message (yellow)
    Info,
    /// Directory entry in a listing (cyan, bold)
    Directory,
    /// File entry in a listing
    File,
}

/// A single line of command output plus its style tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLine {
    pub text: String,
    pub style: TextStyle,
}

impl OutputLine {
    fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::new(s, TextStyle::Plain)
    }

    pub fn error(s: impl Into<String>) -> Self {
        Self::new(s, TextStyle::Error)
    }

    pub fn success(s: impl Into<String>) -> Self {
        Self::new(s, TextStyle::Success)
    }

    pub fn info(s: impl Into<String>) -> Self {
        Self::new(s, TextStyle::Info)
    }

    /// Directory entry in a listing.
    pub fn dir_entry(s: impl Into<String>) -> Self {
        Self::new(s, TextStyle::Directory)
    }

    /// File entry in a listing.
    pub fn file_entry(s: impl Into<String>) -> Self {
        Self::new(s, TextStyle::File)
    }
}

/// Result of dispatching one input line.
#[derive(Clone, Debug)]
pub struct CommandResult {
    pub success: bool,
    /// Lines for the display surface; empty when output was redirected.
    pub output: Vec<OutputLine>,
    pub error: Option<String>,
    /// 0 = success, 1 = generic failure, 127 = command not found.
    pub exit_code: i32,
}

impl CommandResult {
    /// Successful result carrying output lines.
    pub fn ok(output: Vec<OutputLine>) -> Self {
        Self {
            success: true,
            output,
            error: None,
            exit_code: EXIT_SUCCESS,
        }
    }

    /// Successful no-op result (empty input, redirected output).
    pub fn empty() -> Self {
        Self::ok(Vec::new())
    }

    /// Failure result with a message and exit code.
    pub fn failure(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            success: false,
            output: Vec::new(),
            error: Some(message.into()),
            exit_code,
        }
    }

    /// Failure that still carries the lines emitted before the fault.
    pub fn failure_with_output(
        message: impl Into<String>,
        exit_code: i32,
        output: Vec<OutputLine>,
    ) -> Self {
        Self {
            success: false,
            output,
            error: Some(message.into()),
            exit_code,
        }
    }
}

impl Default for CommandResult {
    fn default() -> Self {
        Self::empty()
    }
}
