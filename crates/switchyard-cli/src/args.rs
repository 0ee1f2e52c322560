//! Command-line argument parsing

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use switchyard_core::Config;

use crate::commands::Command;

/// switchyard - multi-interface packet capture
///
/// Opens a capture device on each selected interface and delivers every
/// frame through a single receive loop.
#[derive(Parser, Debug)]
#[command(name = "switchyard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Subcommand to execute (default: run)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true, env = "SWITCHYARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Capture on this interface (repeatable)
    #[arg(short = 'i', long = "interface", value_name = "NAME", global = true)]
    pub interfaces: Vec<String>,

    /// Never capture on this interface (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "NAME", global = true)]
    pub excludes: Vec<String>,

    /// Include loopback interfaces when none are named
    #[arg(long, global = true)]
    pub include_loopback: bool,

    /// Node name (default: host name)
    #[arg(short = 'n', long, value_name = "NAME", global = true)]
    pub name: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format for logs
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Log file path
    #[arg(long, value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Run in quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// Compact format
    Compact,
}

impl Args {
    /// Configuration from the file (or defaults) with command-line overrides
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match self.config {
            Some(ref path) => Config::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::default(),
        };
        self.apply_overrides(&mut config);
        config.validate().context("Configuration validation failed")?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut Config) {
        if !self.interfaces.is_empty() {
            config.devices.include = self.interfaces.clone();
        }
        config.devices.exclude.extend(self.excludes.iter().cloned());
        if self.include_loopback {
            config.devices.include_loopback = true;
        }
        if let Some(ref name) = self.name {
            config.name = Some(name.clone());
        }
    }
}
