//! Logging initialization

use anyhow::{Context, Result};
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::args::{Args, LogFormat};

/// Initialize logging based on CLI arguments
///
/// Console logs go to stderr so packet and config output on stdout stays
/// clean.
pub fn init(args: &Args) -> Result<()> {
    // Determine log level
    let level = if args.quiet {
        Level::ERROR
    } else {
        match args.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    // Build env filter
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let log_file = match args.log_file {
        Some(ref path) => Some(
            std::fs::File::create(path)
                .map(Mutex::new)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?,
        ),
        None => None,
    };

    match args.log_format {
        LogFormat::Text => {
            let console = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(args.verbose >= 2)
                .with_thread_names(args.verbose >= 2)
                .with_file(args.verbose >= 3)
                .with_line_number(args.verbose >= 3);
            let file = log_file.map(|file| fmt::layer().with_ansi(false).with_writer(file));
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console)
                .with(file)
                .init();
        }
        LogFormat::Json => {
            let console = fmt::layer().json().with_writer(std::io::stderr);
            let file = log_file.map(|file| fmt::layer().json().with_writer(file));
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console)
                .with(file)
                .init();
        }
        LogFormat::Compact => {
            let console = fmt::layer().compact().with_writer(std::io::stderr);
            let file = log_file
                .map(|file| fmt::layer().compact().with_ansi(false).with_writer(file));
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console)
                .with(file)
                .init();
        }
    }

    Ok(())
}
