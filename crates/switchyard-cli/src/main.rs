//! switchyard CLI
//!
//! Captures on several interfaces at once and prints what arrives.

mod args;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use args::Args;

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    logging::init(&args)?;

    let result = run(args);

    if let Err(ref e) = result {
        error!("Fatal error: {:#}", e);
    }

    result
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Some(commands::Command::Run(ref run_args)) => {
            if !args.quiet {
                print_banner();
            }
            commands::run::execute(run_args, args.load_config()?)
        }
        Some(commands::Command::Interfaces) => commands::interfaces::execute(),
        Some(commands::Command::Config(ref config_args)) => {
            commands::config::execute(config_args, &args)
        }
        Some(commands::Command::Completions(ref comp_args)) => {
            commands::completions::execute(comp_args)
        }
        None => {
            if !args.quiet {
                print_banner();
            }
            commands::run::execute(&commands::run::RunArgs::default(), args.load_config()?)
        }
    }
}

fn print_banner() {
    use colored::Colorize;

    eprintln!();
    eprintln!(
        "{} {}",
        "switchyard".green().bold(),
        env!("CARGO_PKG_VERSION").white()
    );
    eprintln!("{}", "multi-interface packet capture".cyan());
    eprintln!();
}
