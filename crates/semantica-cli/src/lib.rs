//! Semantica provenance CLI library.
//!
//! Inspects and maintains a SQLite provenance store from the command line:
//! showing and listing entries, walking lineage, reporting statistics,
//! verifying checksums and recording entries by hand.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
