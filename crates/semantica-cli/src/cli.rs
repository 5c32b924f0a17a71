//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// semantica-prov - Inspect and maintain a Semantica provenance database.
#[derive(Debug, Parser)]
#[command(name = "semantica-prov")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite provenance database (overrides the config file)
    #[arg(long, env = "SEMANTICA_PROV_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show one provenance entry
    Show(ShowArgs),

    /// List provenance entries
    List(ListArgs),

    /// Show the lineage of an entity
    Lineage(LineageArgs),

    /// Show aggregate statistics
    Stats,

    /// Re-verify stored checksums
    Verify(VerifyArgs),

    /// Record a provenance entry by hand
    Track(TrackArgs),

    /// Delete every entry
    Clear(ClearArgs),
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Entity ID
    pub id: String,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Only entries of this entity type
    #[arg(short = 't', long = "type")]
    pub entity_type: Option<String>,

    /// Maximum number of results
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the lineage command.
#[derive(Debug, Parser)]
pub struct LineageArgs {
    /// Entity ID
    pub id: String,
}

/// Arguments for the verify command.
#[derive(Debug, Parser)]
pub struct VerifyArgs {
    /// Verify only this entry
    pub id: Option<String>,
}

/// Arguments for the track command.
#[derive(Debug, Parser)]
pub struct TrackArgs {
    /// Entity ID
    pub id: String,

    /// Source document or upstream entity
    #[arg(short, long)]
    pub source: String,

    /// Entity type
    #[arg(short = 't', long = "type", default_value = "entity")]
    pub entity_type: String,

    /// Producing activity
    #[arg(short, long)]
    pub activity: Option<String>,

    /// Parent entity
    #[arg(short, long)]
    pub parent: Option<String>,

    /// Additional upstream entities
    #[arg(short, long = "used")]
    pub used: Vec<String>,

    /// Location within the source (page, section, ...)
    #[arg(long)]
    pub location: Option<String>,

    /// Verbatim excerpt from the source
    #[arg(long)]
    pub quote: Option<String>,

    /// Confidence (0.0-1.0)
    #[arg(long, default_value = "1.0")]
    pub confidence: f64,
}

/// Arguments for the clear command.
#[derive(Debug, Parser)]
pub struct ClearArgs {
    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
