//! Data types shared across the shell core.

mod node;
mod output;

pub use node::{Node, NodeKind, NodeRecord, RecordKind};
pub use output::{CommandResult, OutputLine, TextStyle};
