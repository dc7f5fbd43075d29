//! Default command: render the process tree.

use std::io::{self, Write};

use anyhow::Context;
use proctree::process::{load_snapshot, scan_processes};
use proctree::{ProcessRecord, ProcessTree, TreeRenderer};
use tracing::debug;

use crate::config::Config;

/// Takes the snapshot the config points at: a recorded file or a live scan.
pub fn load_records(config: &Config) -> anyhow::Result<Vec<ProcessRecord>> {
    match &config.snapshot_file {
        Some(path) => {
            let snapshot = load_snapshot(path)
                .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
            Ok(snapshot.processes)
        }
        None => {
            let root = config.proc_root();
            scan_processes(&root).context("Failed to read process list")
        }
    }
}

/// Builds the tree and writes it to `out`.
///
/// The start pid is resolved before anything is written, so a missing pid
/// produces no output at all.
pub fn command_tree<W: Write>(
    config: &Config,
    root_pid: Option<u32>,
    color_supported: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let records = load_records(config)?;
    let tree = ProcessTree::build(records, &config.build_options())?;

    let start = match root_pid {
        Some(pid) => tree.lookup(pid)?,
        None => tree.root(),
    };
    debug!(start = tree.node(start).pid(), "Rendering process tree");

    let options = config.render_options(color_supported);
    match TreeRenderer::new(&tree, &options).write_to(start, out) {
        // Reader went away (e.g. piped into `head`)
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result.context("Failed to write process tree"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proctree::{Snapshot, TreeError};
    use std::path::Path;
    use tempfile::TempDir;

    fn snapshot_config(dir: &Path) -> Config {
        let path = dir.join("snap.json");
        Snapshot::new(vec![
            ProcessRecord::new(1, 0, "init"),
            ProcessRecord::new(2, 0, "kthreadd"),
            ProcessRecord::new(3, 2, "kworker/0:0"),
            ProcessRecord::new(10, 1, "sshd").with_command_name("sshd"),
            ProcessRecord::new(11, 10, "bash"),
        ])
        .write(&path)
        .unwrap();

        Config {
            snapshot_file: Some(path),
            ..Config::default()
        }
    }

    fn run(config: &Config, root_pid: Option<u32>) -> anyhow::Result<String> {
        let mut buf = Vec::new();
        command_tree(config, root_pid, false, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_tree_from_snapshot() {
        let tmp = TempDir::new().unwrap();
        let cfg = snapshot_config(tmp.path());
        let out = run(&cfg, None).unwrap();
        assert_eq!(out, "┌Kernel\n└┬init\n └┬sshd\n  └─bash\n");
    }

    #[test]
    fn test_tree_with_kernel_threads() {
        let tmp = TempDir::new().unwrap();
        let mut cfg = snapshot_config(tmp.path());
        cfg.include_kernel_threads = Some(true);
        cfg.show_pid = Some(true);
        let out = run(&cfg, None).unwrap();
        assert_eq!(
            out,
            "┌[0] Kernel\n├┬[1] init\n│└┬[10] sshd\n│ └─[11] bash\n└┬[2] kthreadd\n └─[3] kworker/0:0\n"
        );
    }

    #[test]
    fn test_tree_root_pid() {
        let tmp = TempDir::new().unwrap();
        let cfg = snapshot_config(tmp.path());
        let out = run(&cfg, Some(10)).unwrap();
        assert_eq!(out, "┌sshd\n└─bash\n");
    }

    #[test]
    fn test_tree_missing_root_pid_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let cfg = snapshot_config(tmp.path());
        let mut buf = Vec::new();
        let err = command_tree(&cfg, Some(99), false, &mut buf).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TreeError>(),
            Some(TreeError::NotFound(99))
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_tree_from_fake_proc() {
        let tmp = TempDir::new().unwrap();
        let proc_dir = tmp.path().join("proc");
        let pid_dir = proc_dir.join("1");
        std::fs::create_dir_all(&pid_dir).unwrap();
        std::fs::write(pid_dir.join("stat"), "1 (init) S 0 1 1 0 -1").unwrap();

        let cfg = Config {
            proc_root: Some(proc_dir),
            ..Config::default()
        };
        let out = run(&cfg, None).unwrap();
        assert_eq!(out, "┌Kernel\n└─init\n");
    }
}
