//! CLI application for German tax invoice tracking.

mod archive;
mod commands;
mod ledger;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use beleg_core::BelegConfig;

use commands::{config, list, process, report};

/// German tax invoices - extract structured data from vendor PDFs into an
/// xlsx ledger
#[derive(Parser)]
#[command(name = "beleg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process all pending invoices in the inbox folder
    Process,

    /// Show summary statistics from the ledger
    Report(report::ReportArgs),

    /// List pending invoices without processing
    List,

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let app_config = load_config(cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Commands::Process => process::run(&app_config),
        Commands::Report(args) => report::run(args, &app_config),
        Commands::List => list::run(&app_config),
        Commands::Config(args) => config::run(args),
    }
}

fn load_config(path: Option<&str>) -> anyhow::Result<BelegConfig> {
    match path {
        Some(path) => BelegConfig::from_file(Path::new(path))
            .with_context(|| format!("loading config from {}", path)),
        None => {
            let default = Path::new(config::DEFAULT_CONFIG_FILE);
            if default.exists() {
                BelegConfig::from_file(default)
                    .with_context(|| format!("loading config from {}", default.display()))
            } else {
                Ok(BelegConfig::default())
            }
        }
    }
}
