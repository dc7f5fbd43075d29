//! Recorded snapshots.
//!
//! A snapshot file is a JSON document holding a full process list, so a
//! tree can be rendered again later or on another machine.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::SnapshotError;
use crate::process::record::ProcessRecord;

pub const SNAPSHOT_VERSION: &str = "1";

/// Root structure for snapshot JSON files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: String,
    pub generated_at: String,
    pub processes: Vec<ProcessRecord>,
}

impl Snapshot {
    /// Wraps a process list, stamped with the current time.
    pub fn new(processes: Vec<ProcessRecord>) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            generated_at: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            processes,
        }
    }

    /// Writes the snapshot as pretty-printed JSON.
    pub fn write(&self, path: &Path) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            "Wrote snapshot with {} processes to {}",
            self.processes.len(),
            path.display()
        );
        Ok(())
    }
}

/// Load a snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
    debug!("Loading snapshot from: {}", path.display());

    if !path.exists() {
        return Err(SnapshotError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot: Snapshot = serde_json::from_str(&content)?;

    info!(
        "Loaded snapshot version {} from {} ({} processes)",
        snapshot.version,
        snapshot.generated_at,
        snapshot.processes.len()
    );

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snap.json");

        let snapshot = Snapshot::new(vec![
            ProcessRecord::new(1, 0, "init").with_command_line("/sbin/init"),
            ProcessRecord::new(5, 1, "sh").with_command_name("bash"),
        ]);
        snapshot.write(&path).unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.version, SNAPSHOT_VERSION);
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load_snapshot(&tmp.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, SnapshotError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, "{\"version\": \"1\"").unwrap();
        let err = load_snapshot(&path).unwrap_err();
        assert!(matches!(err, SnapshotError::Json(_)));
    }
}
