//! Go source parsing built on tree-sitter.

pub mod nodes;
pub mod parser;
pub mod render;

pub use parser::{GoParser, SourceUnit};
