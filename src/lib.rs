//! # sandsh
//!
//! A sandboxed shell core: a virtual file tree plus a POSIX-flavored
//! command line on top of it. Nothing here touches the host filesystem
//! or spawns processes; the whole world is the in-memory tree.
//!
//! ## Architecture
//!
//! - **`models`**: tree nodes, persisted records, command output types
//! - **`core`**: path resolution, the virtual tree, tokenizer and parser,
//!   the command registry and built-ins, the script interpreter
//! - **`shell`**: the session facade frontends drive
//!
//! ## Quick start
//!
//! ```
//! use sandsh::Shell;
//!
//! let mut shell = Shell::new();
//! let result = shell.run_line("echo hello > greeting.txt");
//! assert!(result.success);
//! assert_eq!(
//!     shell.tree().read_file("greeting.txt").as_deref(),
//!     Some("hello")
//! );
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod shell;

pub use crate::core::{
    builtin_registry, CommandDescriptor, CommandHandler, CommandRegistry, Environment,
    ExecutionContext, VirtualTree,
};
pub use error::ShellError;
pub use models::{CommandResult, OutputLine, TextStyle};
pub use shell::Shell;
