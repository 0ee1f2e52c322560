//! CLI commands

pub mod completions;
pub mod config;
pub mod interfaces;
pub mod run;

use clap::Subcommand;

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Capture on the selected interfaces and print every packet (default)
    Run(run::RunArgs),

    /// List network interfaces
    Interfaces,

    /// Configuration management
    Config(config::ConfigArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
