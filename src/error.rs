//! Error types for tree construction, rendering and snapshot acquisition.

use std::path::PathBuf;

/// Errors raised by the tree builder and root selection.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("PID {0} does not exist")]
    NotFound(u32),
}

/// Errors raised while acquiring a process snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Cannot read process list from {path}: {source}")]
    ProcUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot file not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {what}: {detail}")]
    Parse { what: String, detail: String },

    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses a user-supplied PID value.
pub fn parse_pid(value: &str) -> Result<u32, TreeError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| TreeError::InvalidInput(format!("Could not parse PID \"{value}\"")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pid() {
        assert_eq!(parse_pid("42").unwrap(), 42);
        assert_eq!(parse_pid(" 1 ").unwrap(), 1);
    }

    #[test]
    fn test_parse_pid_invalid() {
        for bad in ["", "abc", "-3", "1.5", "99999999999"] {
            let err = parse_pid(bad).unwrap_err();
            assert!(matches!(err, TreeError::InvalidInput(_)), "{bad}");
        }
        let msg = parse_pid("abc").unwrap_err().to_string();
        assert!(msg.contains("\"abc\""));
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(TreeError::NotFound(99).to_string(), "PID 99 does not exist");
    }
}
