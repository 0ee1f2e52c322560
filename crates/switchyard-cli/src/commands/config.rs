//! Config command - configuration management

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;
use switchyard_core::Config;
use tracing::info;

use crate::args::Args as GlobalArgs;

/// Config command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with every option at its default
    Generate {
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a configuration file
    Validate {
        /// Config file to validate
        file: PathBuf,
    },
}

/// Execute config command
pub fn execute(args: &ConfigArgs, global: &GlobalArgs) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(global),
        ConfigAction::Generate { ref output } => generate_config(output.as_ref()),
        ConfigAction::Validate { ref file } => validate_config(file),
    }
}

fn show_config(global: &GlobalArgs) -> Result<()> {
    let config = global.load_config()?;
    let toml_str = config.to_toml().context("Failed to serialize config")?;
    println!("{toml_str}");
    Ok(())
}

fn generate_config(output: Option<&PathBuf>) -> Result<()> {
    let toml_str = Config::default()
        .to_toml()
        .context("Failed to serialize config")?;

    // Add header comment
    let content = format!(
        "# switchyard configuration\n\
         # name = \"router1\"  # defaults to the host name\n\
         # [devices] include = [] captures on every interface that is up\n\n\
         {toml_str}"
    );

    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write config to {}", path.display()))?;
            info!(path = %path.display(), "Generated config file");
            println!("Configuration file generated: {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

fn validate_config(file: &PathBuf) -> Result<()> {
    let config = Config::load(file)
        .with_context(|| format!("Failed to load config from {}", file.display()))?;

    config.validate().context("Configuration validation failed")?;

    println!("✓ Configuration is valid");
    println!("  Name: {}", config.name.as_deref().unwrap_or("(host name)"));
    println!("  Poll interval: {} ms", config.capture.poll_interval_ms);
    println!("  Promiscuous: {}", config.capture.promiscuous);
    if config.devices.include.is_empty() {
        println!("  Devices: every interface that is up");
    } else {
        println!("  Devices: {}", config.devices.include.join(", "));
    }
    if !config.devices.exclude.is_empty() {
        println!("  Excluded: {}", config.devices.exclude.join(", "));
    }

    Ok(())
}
