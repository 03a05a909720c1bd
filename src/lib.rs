// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod go;
pub mod io;
pub mod resolve;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{Diagnostic, LintResults, RuleId, Span, SuggestedFix, TextEdit};

pub use crate::go::{GoParser, SourceUnit};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};

pub use crate::resolve::UnitTypes;

pub use crate::rules::{lint_unit, lint_unit_with, LintOptions, DEFAULT_LIBRARY_PATH};
