//! Snapshot command implementation.
//!
//! Records the current process list to a JSON file that `--snapshot-file`
//! can render later.

use std::path::PathBuf;

use anyhow::Context;
use proctree::process::scan_processes;
use proctree::Snapshot;
use tracing::debug;

use crate::config::Config;

/// Scans the proc root and writes the snapshot to `output` ("-" for stdout).
pub fn command_snapshot(output: PathBuf, config: &Config) -> anyhow::Result<()> {
    let root = config.proc_root();
    debug!(
        "Recording snapshot: proc_root={}, output={}",
        root.display(),
        output.display()
    );

    let records = scan_processes(&root).context("Failed to read process list")?;
    let snapshot = Snapshot::new(records);

    if output.to_string_lossy() == "-" {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    snapshot.write(&output)?;
    println!(
        "✅ Recorded snapshot: {} processes in {}",
        snapshot.processes.len(),
        output.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proctree::process::load_snapshot;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_records_fake_proc() {
        let tmp = TempDir::new().unwrap();
        let proc_dir = tmp.path().join("proc");
        for (pid, stat) in [(1, "1 (init) S 0 1 1 0 -1"), (7, "7 (sh) S 1 7 7 0 -1")] {
            let dir = proc_dir.join(pid.to_string());
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("stat"), stat).unwrap();
        }

        let cfg = Config {
            proc_root: Some(proc_dir),
            ..Config::default()
        };
        let out = tmp.path().join("snap.json");
        command_snapshot(out.clone(), &cfg).unwrap();

        let snapshot = load_snapshot(&out).unwrap();
        let pids: Vec<u32> = snapshot.processes.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![1, 7, 0]);
    }
}
