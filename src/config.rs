//! Configuration management for proctree.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat, LogLevel};
use anyhow::{bail, Context};
use proctree::{BuildOptions, RenderOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// Default configuration constants
pub const DEFAULT_PROC_ROOT: &str = "/proc";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Default config file locations, searched in order.
const DEFAULT_CONFIG_PATHS: [&str; 6] = [
    "/etc/proctree/proctree.yaml",
    "/etc/proctree/proctree.yml",
    "./proctree.yaml",
    "./proctree.yml",
    "./proctree.json",
    "./proctree.toml",
];

/// Effective configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // Display
    #[serde(alias = "show-pid")]
    pub show_pid: Option<bool>,
    #[serde(alias = "show-comm")]
    pub show_comm: Option<bool>,
    #[serde(alias = "show-cmdline")]
    pub show_cmdline: Option<bool>,
    pub color: Option<bool>,

    // Process selection
    #[serde(alias = "include-kernel-threads")]
    pub include_kernel_threads: Option<bool>,

    // Sources
    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,
    #[serde(alias = "snapshot-file")]
    pub snapshot_file: Option<PathBuf>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_pid: Some(false),
            show_comm: Some(false),
            show_cmdline: Some(false),
            color: Some(true),
            include_kernel_threads: Some(false),
            proc_root: Some(PathBuf::from(DEFAULT_PROC_ROOT)),
            snapshot_file: None,
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
        }
    }
}

impl Config {
    pub fn proc_root(&self) -> PathBuf {
        self.proc_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROC_ROOT))
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            include_kernel_threads: self.include_kernel_threads.unwrap_or(false),
        }
    }

    /// Render options; `color_supported` is the terminal capability check.
    pub fn render_options(&self, color_supported: bool) -> RenderOptions {
        RenderOptions {
            show_pid: self.show_pid.unwrap_or(false),
            show_comm: self.show_comm.unwrap_or(false),
            show_cmdline: self.show_cmdline.unwrap_or(false),
            color: self.color.unwrap_or(true) && color_supported,
        }
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> anyhow::Result<()> {
    if let Some(level) = cfg.log_level.as_deref() {
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            bail!(
                "Invalid log_level '{}', expected one of: {}",
                level,
                LOG_LEVELS.join(", ")
            );
        }
    }

    match &cfg.snapshot_file {
        Some(path) => {
            if !path.exists() {
                bail!("Snapshot file not found: {}", path.display());
            }
        }
        None => {
            let root = cfg.proc_root();
            if !root.is_dir() {
                bail!("proc root is not a directory: {}", root.display());
            }
        }
    }

    Ok(())
}

fn log_level_name(level: &LogLevel) -> &'static str {
    match level {
        LogLevel::Off => "off",
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    // Flags only ever switch things on (or colors off)
    if args.show_pid {
        config.show_pid = Some(true);
    }
    if args.show_comm {
        config.show_comm = Some(true);
    }
    if args.show_cmdline {
        config.show_cmdline = Some(true);
    }
    if args.no_color {
        config.color = Some(false);
    }
    if args.include_kernel_threads {
        config.include_kernel_threads = Some(true);
    }

    if let Some(root) = &args.proc_root {
        config.proc_root = Some(root.clone());
    }
    if let Some(file) = &args.snapshot_file {
        config.snapshot_file = Some(file.clone());
    }
    if let Some(level) = &args.log_level {
        config.log_level = Some(log_level_name(level).to_string());
    }

    Ok(config)
}

/// Loads a config file; without a path, the first existing default location.
/// No file at all yields the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                bail!("Config file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => match DEFAULT_CONFIG_PATHS.iter().map(Path::new).find(|p| p.exists()) {
            Some(p) => p.to_path_buf(),
            None => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    // Missing keys fall back to the defaults
    let loaded: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON config {}", path.display()))?,
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("Invalid TOML config {}", path.display()))?,
        _ => {
            // Default to YAML
            serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML config {}", path.display()))?
        }
    };
    info!("Loaded configuration from: {}", path.display());

    Ok(merge_defaults(loaded))
}

fn merge_defaults(loaded: Config) -> Config {
    let defaults = Config::default();
    Config {
        show_pid: loaded.show_pid.or(defaults.show_pid),
        show_comm: loaded.show_comm.or(defaults.show_comm),
        show_cmdline: loaded.show_cmdline.or(defaults.show_cmdline),
        color: loaded.color.or(defaults.color),
        include_kernel_threads: loaded
            .include_kernel_threads
            .or(defaults.include_kernel_threads),
        proc_root: loaded.proc_root.or(defaults.proc_root),
        snapshot_file: loaded.snapshot_file.or(defaults.snapshot_file),
        log_level: loaded.log_level.or(defaults.log_level),
    }
}

/// Serializes a config in the requested format.
pub fn format_config(config: &Config, format: &ConfigFormat) -> anyhow::Result<String> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: &ConfigFormat) -> anyhow::Result<()> {
    println!("{}", format_config(config, format)?);
    Ok(())
}
