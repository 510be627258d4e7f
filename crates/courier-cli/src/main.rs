//! Courier CLI - demo driver for the Courier event router.
//!
//! Loads the layered configuration, sets up logging, then either replays
//! the storefront scenario through a live dispatcher or inspects the
//! configuration and event catalogue.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod commands;
mod config_bridge;
mod scenario;
mod theme;

use commands::{config, run, types};

/// Courier - in-process event router demo
#[derive(Parser)]
#[command(name = "courier")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a configuration file
    #[arg(short, long, global = true, env = "COURIER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the demo scenario through the dispatcher
    Run(run::RunArgs),

    /// View and validate configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// List event types and their standard handlers
    Types,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the resolved configuration
    Show {
        /// Output format: toml (default) or json
        #[arg(long, default_value = "toml")]
        format: String,
    },
    /// Check that the configuration loads and validates
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = courier_config::Config::load(cli.config.as_deref());

    // Set up logging from config, with --verbose override.
    let log_config = if let Ok(resolved) = &loaded {
        let mut lc = config_bridge::to_log_config(&resolved.config);
        if cli.verbose {
            "debug".clone_into(&mut lc.level);
        }
        lc
    } else {
        // Fallback if config loading fails.
        let level = if cli.verbose { "debug" } else { "info" };
        courier_telemetry::LogConfig::new(level)
            .with_format(courier_telemetry::LogFormat::Compact)
    };
    if let Err(e) = courier_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match cli.command {
        Commands::Run(args) => {
            let resolved = loaded.context("failed to load configuration")?;
            run::run(&resolved.config, &args).await?;
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show { format } => config::show_config(loaded, &format)?,
            ConfigCommands::Validate => config::validate_config(loaded)?,
        },
        Commands::Types => types::list_types(),
    }

    Ok(())
}
