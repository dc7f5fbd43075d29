//! CLI arguments and subcommands for proctree.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use proctree::parse_pid;
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "proctree",
    about = "Display running processes as a colored tree",
    long_about = "Display running processes as a colored tree.\n\n\
                  Reads the process list from /proc (or a recorded snapshot), rebuilds the \
                  parent/child hierarchy and draws it with box-drawing connectors, one color \
                  per tree level.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Display process ID
    #[arg(short = 'i', long, visible_alias = "id")]
    pub show_pid: bool,

    /// Display process command name
    #[arg(short = 'c', long, visible_alias = "comm")]
    pub show_comm: bool,

    /// Display process command line
    #[arg(short = 'm', long, visible_alias = "cmd")]
    pub show_cmdline: bool,

    /// Disable color output
    #[arg(short = 'n', long)]
    pub no_color: bool,

    /// Include kernel threads
    #[arg(short = 'k', long, visible_alias = "kernel")]
    pub include_kernel_threads: bool,

    /// Only display processes under a specified process ID
    #[arg(short = 'p', long, value_name = "PID", value_parser = parse_pid)]
    pub root_pid: Option<u32>,

    /// Render a recorded JSON snapshot instead of reading /proc
    #[arg(short = 's', long, value_name = "PATH")]
    pub snapshot_file: Option<PathBuf>,

    /// Location of the proc filesystem
    #[arg(long, value_name = "PATH")]
    pub proc_root: Option<PathBuf>,

    /// Log level (logs go to stderr)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the process list can be read
    Check,

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },

    /// Record the current process list as a JSON snapshot
    Snapshot {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long, default_value = "snapshot.json")]
        output: PathBuf,
    },
}
