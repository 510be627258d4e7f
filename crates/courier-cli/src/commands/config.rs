//! CLI handlers for the `courier config` subcommand.

use anyhow::{Context, Result};
use courier_config::{ConfigResult, ResolvedConfig, ShowFormat, env::supported_vars};

use crate::theme::Theme;

/// Print the resolved configuration with source annotations.
pub(crate) fn show_config(loaded: ConfigResult<ResolvedConfig>, format: &str) -> Result<()> {
    let resolved = loaded.context("failed to load configuration")?;
    let show_format: ShowFormat = format.parse()?;

    let output = resolved.show(show_format)?;
    println!("{output}");
    Ok(())
}

/// Report whether the configuration loads and validates.
pub(crate) fn validate_config(loaded: ConfigResult<ResolvedConfig>) -> Result<()> {
    let resolved = loaded.context("configuration is invalid")?;

    println!("{}", Theme::success("Configuration is valid."));
    if resolved.loaded_files.is_empty() {
        println!("{}", Theme::dimmed("No config file given; using built-in defaults."));
    } else {
        println!("\nLoaded files:");
        for path in &resolved.loaded_files {
            println!("  - {path}");
        }
    }
    if resolved.env_applied > 0 {
        println!(
            "\n{} environment fallback(s) applied from: {}",
            resolved.env_applied,
            supported_vars().join(", ")
        );
    }
    Ok(())
}
