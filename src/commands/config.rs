//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{format_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> anyhow::Result<()> {
    let config = Config::default();
    let output = output.unwrap_or_else(|| PathBuf::from("proctree.yaml"));

    let mut content = format_config(&config, &format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# proctree Configuration
# ======================
#
# Display
# -------
# show_pid: false              # Prefix each line with [pid]
# show_comm: false             # Append (command name)
# show_cmdline: false          # Append [command line]
# color: true                  # Per-depth colors (off when stdout is not a terminal)
#
# Process Selection
# -----------------
# include_kernel_threads: false # Show kthreadd and its kernel threads
#
# Sources
# -------
# proc_root: "/proc"           # proc filesystem to scan
# snapshot_file: null          # Render a recorded JSON snapshot instead
#
# Logging
# -------
# log_level: "warn"            # off, error, warn, info, debug, trace (stderr)
"#;

    format!("{comments}\n{yaml}")
}
