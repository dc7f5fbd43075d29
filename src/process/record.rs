//! Process record type shared by every snapshot source and the tree builder.

use serde::{Deserialize, Serialize};

/// PID of the kernel root node.
pub const KERNEL_PID: u32 = 0;

/// PID of the kernel thread supervisor (`kthreadd`) on Linux.
pub const KTHREADD_PID: u32 = 2;

/// One process as seen in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub parent_pid: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_line: Option<String>,
}

impl ProcessRecord {
    pub fn new(pid: u32, parent_pid: u32, name: impl Into<String>) -> Self {
        Self {
            pid,
            parent_pid,
            name: name.into(),
            command_name: None,
            command_line: None,
        }
    }

    pub fn with_command_name(mut self, command_name: impl Into<String>) -> Self {
        self.command_name = Some(command_name.into());
        self
    }

    pub fn with_command_line(mut self, command_line: impl Into<String>) -> Self {
        self.command_line = Some(command_line.into());
        self
    }

    /// Bare kernel root used when a snapshot carries no pid 0 record.
    pub fn kernel() -> Self {
        Self::new(KERNEL_PID, KERNEL_PID, "Kernel")
    }

    /// Command name, if present and non-empty.
    pub fn command_name(&self) -> Option<&str> {
        self.command_name.as_deref().filter(|s| !s.is_empty())
    }

    /// Command line, if present and non-empty.
    pub fn command_line(&self) -> Option<&str> {
        self.command_line.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_optional_fields_are_hidden() {
        let rec = ProcessRecord::new(7, 1, "idle")
            .with_command_name("")
            .with_command_line("");
        assert_eq!(rec.command_name(), None);
        assert_eq!(rec.command_line(), None);

        let rec = rec.with_command_name("bash");
        assert_eq!(rec.command_name(), Some("bash"));
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let rec: ProcessRecord =
            serde_json::from_str(r#"{"pid": 5, "parent_pid": 0, "name": "sh"}"#).unwrap();
        assert_eq!(rec, ProcessRecord::new(5, 0, "sh"));
    }

    #[test]
    fn test_kernel_record() {
        let k = ProcessRecord::kernel();
        assert_eq!(k.pid, KERNEL_PID);
        assert_eq!(k.name, "Kernel");
        assert!(k.command_line.is_none());
    }
}
