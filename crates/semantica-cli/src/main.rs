//! semantica-prov - command-line access to a provenance store.

use clap::Parser;
use semantica_cli::commands;
use semantica_cli::{Cli, Command, Config, Formatter};
use semantica_provenance::ProvenanceManager;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> semantica_cli::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let manager_config = config.manager_config(cli.db.as_deref())?;
    if let Some(parent) = manager_config
        .storage_path
        .as_deref()
        .and_then(|path| path.parent())
    {
        std::fs::create_dir_all(parent)?;
    }
    let mut manager = ProvenanceManager::new(manager_config)?;

    let output = match cli.command {
        Command::Show(args) => commands::execute_show(args, &manager, &formatter)?,
        Command::List(args) => commands::execute_list(args, &manager, &formatter)?,
        Command::Lineage(args) => commands::execute_lineage(args, &manager, &formatter)?,
        Command::Stats => commands::execute_stats(&manager, &formatter)?,
        Command::Verify(args) => commands::execute_verify(args, &manager, &formatter)?,
        Command::Track(args) => commands::execute_track(args, &mut manager, &formatter)?,
        Command::Clear(args) => commands::execute_clear(args, &mut manager, &formatter)?,
    };

    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
