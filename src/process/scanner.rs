//! Process scanning utilities for building a snapshot from /proc.
//!
//! This module lists the numeric entries of a proc filesystem and reads the
//! pieces of each process the tree needs: name and parent pid from `stat`,
//! the command line from `cmdline`, and the executable name from `exe`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::SnapshotError;
use crate::process::record::{ProcessRecord, KERNEL_PID};

/// Process entry representing a directory in /proc filesystem.
#[derive(Debug, Clone)]
pub struct ProcEntry {
    pub pid: u32,
    pub proc_path: PathBuf,
}

/// Scans the proc root for process entries with numeric PIDs, sorted by pid.
pub fn collect_proc_entries(root: &Path) -> Result<Vec<ProcEntry>, SnapshotError> {
    let entries = fs::read_dir(root).map_err(|source| SnapshotError::ProcUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut out = Vec::new();
    for entry in entries.flatten() {
        let p = entry.path();
        let name = match p.file_name().and_then(|s| s.to_str()) {
            Some(v) => v,
            None => continue,
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let pid: u32 = match name.parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        out.push(ProcEntry { pid, proc_path: p });
    }
    out.sort_by_key(|e| e.pid);
    Ok(out)
}

/// Fields of `/proc/<pid>/stat` needed for the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatFields {
    pub pid: u32,
    pub comm: String,
    pub ppid: u32,
}

/// Parses a `stat` line. The comm field is wrapped in parentheses and may
/// itself contain spaces and parentheses, so it extends to the last `)`.
pub fn parse_stat(content: &str) -> Result<StatFields, SnapshotError> {
    let malformed = |detail: &str| SnapshotError::Parse {
        what: "stat line".to_string(),
        detail: detail.to_string(),
    };

    let open = content.find('(').ok_or_else(|| malformed("missing '('"))?;
    let close = content.rfind(')').ok_or_else(|| malformed("missing ')'"))?;
    if close < open {
        return Err(malformed("unbalanced comm field"));
    }

    let pid = content[..open]
        .trim()
        .parse::<u32>()
        .map_err(|_| malformed("invalid pid"))?;
    let comm = content[open + 1..close].to_string();

    // After the comm: state, ppid, ...
    let mut rest = content[close + 1..].split_whitespace();
    let _state = rest.next().ok_or_else(|| malformed("missing state"))?;
    let ppid = rest
        .next()
        .ok_or_else(|| malformed("missing ppid"))?
        .parse::<u32>()
        .map_err(|_| malformed("invalid ppid"))?;

    Ok(StatFields { pid, comm, ppid })
}

/// Joins the NUL separated arguments of a `cmdline` file with spaces.
pub fn parse_cmdline(content: &[u8]) -> Option<String> {
    let parts: Vec<String> = content
        .split(|&b| b == 0u8)
        .filter(|s| !s.is_empty())
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Reads the executable name from the `exe` link or extracts it from cmdline.
pub fn read_command_name(proc_path: &Path, cmdline: Option<&[u8]>) -> Option<String> {
    if let Ok(target) = fs::read_link(proc_path.join("exe")) {
        if let Some(name) = target.file_name().and_then(|s| s.to_str()) {
            // A replaced binary shows up as "name (deleted)".
            let name = name.trim_end_matches(" (deleted)");
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }

    let content = cmdline?;
    let argv0 = content.split(|&b| b == 0u8).next()?;
    let argv0 = std::str::from_utf8(argv0).ok()?;
    if argv0.is_empty() {
        return None;
    }
    Path::new(argv0)
        .file_name()
        .and_then(|name| name.to_str())
        .map(|s| s.to_string())
}

/// Reads one process. Returns `None` if it exited while being read.
pub fn read_process(entry: &ProcEntry) -> Option<ProcessRecord> {
    let stat = match fs::read_to_string(entry.proc_path.join("stat")) {
        Ok(s) => s,
        Err(e) => {
            debug!(pid = entry.pid, "Skipping process, stat unreadable: {}", e);
            return None;
        }
    };
    let fields = match parse_stat(&stat) {
        Ok(f) => f,
        Err(e) => {
            debug!(pid = entry.pid, "Skipping process: {}", e);
            return None;
        }
    };

    let cmdline = fs::read(entry.proc_path.join("cmdline")).ok();

    Some(ProcessRecord {
        pid: entry.pid,
        parent_pid: fields.ppid,
        name: fields.comm,
        command_name: read_command_name(&entry.proc_path, cmdline.as_deref()),
        command_line: cmdline.as_deref().and_then(parse_cmdline),
    })
}

/// Builds the record standing for the kernel itself.
///
/// The command name is the lower-cased OS name, the command line is the
/// kernel boot command line when readable.
pub fn kernel_record(proc_root: &Path) -> ProcessRecord {
    let mut record = ProcessRecord::kernel();

    match nix::sys::utsname::uname() {
        Ok(uts) => {
            record.command_name = Some(uts.sysname().to_string_lossy().to_lowercase());
        }
        Err(e) => debug!("uname failed: {}", e),
    }

    if let Ok(cmdline) = fs::read_to_string(proc_root.join("cmdline")) {
        let cmdline = cmdline.trim();
        if !cmdline.is_empty() {
            record.command_line = Some(cmdline.to_string());
        }
    }

    record
}

/// Takes a full snapshot of the processes under `proc_root`.
pub fn scan_processes(proc_root: &Path) -> Result<Vec<ProcessRecord>, SnapshotError> {
    let entries = collect_proc_entries(proc_root)?;
    let total = entries.len();

    let mut records: Vec<ProcessRecord> = entries
        .iter()
        .filter(|entry| entry.pid != KERNEL_PID)
        .filter_map(read_process)
        .collect();

    info!(
        "Scanned {} of {} process entries under {}",
        records.len(),
        total,
        proc_root.display()
    );

    records.push(kernel_record(proc_root));
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fake_process(root: &Path, pid: u32, stat: &str, cmdline: &[u8]) {
        let dir = root.join(pid.to_string());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("stat"), stat).unwrap();
        fs::write(dir.join("cmdline"), cmdline).unwrap();
    }

    #[test]
    fn test_parse_stat_simple() {
        let f = parse_stat("1234 (bash) S 1000 1234 1234 34816 0").unwrap();
        assert_eq!(
            f,
            StatFields {
                pid: 1234,
                comm: "bash".into(),
                ppid: 1000
            }
        );
    }

    #[test]
    fn test_parse_stat_comm_with_spaces_and_parens() {
        let f = parse_stat("77 (Web Content (x)) R 12 77 77 0 -1").unwrap();
        assert_eq!(f.comm, "Web Content (x)");
        assert_eq!(f.ppid, 12);
    }

    #[test]
    fn test_parse_stat_invalid() {
        assert!(parse_stat("").is_err());
        assert!(parse_stat("12 bash S 1").is_err());
        assert!(parse_stat("12 (bash)").is_err());
        assert!(parse_stat("x (bash) S 1").is_err());
    }

    #[test]
    fn test_parse_cmdline() {
        assert_eq!(
            parse_cmdline(b"/usr/bin/python3\0-m\0http.server\0"),
            Some("/usr/bin/python3 -m http.server".to_string())
        );
        assert_eq!(parse_cmdline(b""), None);
    }

    #[test]
    fn test_command_name_from_argv0() {
        let tmp = TempDir::new().unwrap();
        let name = read_command_name(tmp.path(), Some(b"/usr/sbin/sshd\0-D\0"));
        assert_eq!(name, Some("sshd".to_string()));
        assert_eq!(read_command_name(tmp.path(), Some(b"")), None);
        assert_eq!(read_command_name(tmp.path(), None), None);
    }

    #[test]
    fn test_scan_fake_proc_tree() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fake_process(root, 1, "1 (systemd) S 0 1 1 0 -1", b"/sbin/init\0splash\0");
        fake_process(root, 2, "2 (kthreadd) S 0 0 0 0 -1", b"");
        fake_process(root, 420, "420 (sshd) S 1 420 420 0 -1", b"sshd: /usr/sbin/sshd\0");
        fs::create_dir_all(root.join("self")).unwrap();
        fs::create_dir_all(root.join("99")).unwrap(); // exited mid-scan
        fs::write(root.join("cmdline"), "BOOT_IMAGE=/vmlinuz ro quiet\n").unwrap();

        let records = scan_processes(root).unwrap();
        let pids: Vec<u32> = records.iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![1, 2, 420, 0]);

        assert_eq!(records[0].name, "systemd");
        assert_eq!(records[0].parent_pid, 0);
        assert_eq!(records[0].command_name.as_deref(), Some("init"));
        assert_eq!(records[0].command_line.as_deref(), Some("/sbin/init splash"));
        assert_eq!(records[1].command_line, None);
        assert_eq!(records[1].command_name, None);
        assert_eq!(records[2].parent_pid, 1);

        let kernel = &records[3];
        assert_eq!(kernel.name, "Kernel");
        assert_eq!(
            kernel.command_line.as_deref(),
            Some("BOOT_IMAGE=/vmlinuz ro quiet")
        );
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let tmp = TempDir::new().unwrap();
        let err = scan_processes(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, SnapshotError::ProcUnreadable { .. }));
    }
}
