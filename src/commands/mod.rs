//! CLI command implementations for proctree.
//!
//! This module provides implementations for all CLI subcommands:
//! - `tree`: Process tree rendering (default)
//! - `check`: System validation
//! - `config`: Configuration file generation
//! - `snapshot`: Snapshot recording

pub mod check;
pub mod config;
pub mod snapshot;
pub mod tree;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use snapshot::command_snapshot;
pub use tree::command_tree;
