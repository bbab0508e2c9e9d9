//! Core shell machinery: path resolution, the virtual file tree, the
//! line tokenizer and parser, the command registry, and script execution.

pub mod commands;
pub mod env;
pub mod parser;
pub mod path;
pub mod registry;
pub mod script;
pub mod tokenizer;
pub mod tree;

pub use commands::builtin_registry;
pub use env::Environment;
pub use parser::{parse, FlagMap, FlagValue, ParsedCommand, Redirect, RedirectMode};
pub use registry::{CommandDescriptor, CommandHandler, CommandRegistry, ExecutionContext};
pub use tokenizer::tokenize;
pub use tree::{DirEntry, VirtualTree};
