//! Process snapshot acquisition.
//!
//! This module provides:
//! - `record`: the `ProcessRecord` type every source produces
//! - `scanner`: live snapshots read from /proc
//! - `snapshot`: recorded JSON snapshots

pub mod record;
pub mod scanner;
pub mod snapshot;

// Re-export commonly used types
pub use record::{ProcessRecord, KERNEL_PID, KTHREADD_PID};
pub use scanner::{collect_proc_entries, kernel_record, scan_processes};
pub use snapshot::{load_snapshot, Snapshot};
