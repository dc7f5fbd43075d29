//! proctree - version 0.1.0
//!
//! Process tree viewer with tracing logging.
//! This is the main entry point that resolves configuration and dispatches subcommands.

mod cli;
mod commands;
mod config;

use std::io::{self, BufWriter, IsTerminal};

use clap::Parser;
use tracing::{debug, level_filters::LevelFilter};

use cli::{Args, Commands};
use commands::{command_check, command_config, command_snapshot, command_tree};
use config::{resolve_config, show_config, validate_effective_config, Config, DEFAULT_LOG_LEVEL};

/// Initializes tracing logging subsystem with configured log level.
///
/// Logs go to stderr; stdout carries only the tree.
fn setup_logging(config: &Config) {
    let level = match config
        .log_level
        .as_deref()
        .unwrap_or(DEFAULT_LOG_LEVEL)
        .to_ascii_lowercase()
        .as_str()
    {
        "off" => LevelFilter::OFF,
        "error" => LevelFilter::ERROR,
        "info" => LevelFilter::INFO,
        "debug" => LevelFilter::DEBUG,
        "trace" => LevelFilter::TRACE,
        _ => LevelFilter::WARN,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    debug!("Logging initialized with level: {}", level);
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    setup_logging(&config);

    if args.check_config {
        if let Err(e) = validate_effective_config(&config) {
            eprintln!("❌ Configuration invalid: {}", e);
            std::process::exit(1);
        }
        println!("✅ Configuration is valid");
        return Ok(());
    }

    if args.show_config {
        return show_config(&config, &args.config_format);
    }

    if let Some(command) = args.command {
        return match command {
            Commands::Check => command_check(&config),
            Commands::Config {
                output,
                format,
                commented,
            } => command_config(output, format, commented),
            Commands::Snapshot { output } => command_snapshot(output, &config),
        };
    }

    validate_effective_config(&config)?;

    let stdout = io::stdout();
    let color_supported = proctree::style::color_supported(stdout.is_terminal());
    let mut out = BufWriter::new(stdout.lock());
    command_tree(&config, args.root_pid, color_supported, &mut out)
}
