//! CLI command implementations.
//!
//! Each submodule handles one subcommand: `check` runs the lint pass
//! over the requested paths, `init` writes a starter configuration file.

pub mod check;
pub mod init;

pub use check::{run_check, CheckConfig};
pub use init::init_config;
