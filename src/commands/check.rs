//! Check command implementation.
//!
//! Validates that the process list is readable and the configuration is sound.

use nix::unistd::geteuid;
use proctree::process::{collect_proc_entries, load_snapshot, scanner::read_process};

use crate::config::{validate_effective_config, Config};

/// Validates system requirements and configuration.
pub fn command_check(config: &Config) -> anyhow::Result<()> {
    println!("🔍 proctree - System Check");
    println!("==========================");

    let mut all_ok = true;

    println!("\n👤 Checking privileges...");
    if geteuid().is_root() {
        println!("   ✅ Running as root (uid=0)");
    } else {
        println!("   ⚠️  Not running as root - command lines of other users may be hidden");
    }

    match &config.snapshot_file {
        Some(path) => {
            println!("\n📄 Checking snapshot file {}...", path.display());
            match load_snapshot(path) {
                Ok(snapshot) => println!(
                    "   ✅ Snapshot readable: {} processes (recorded {})",
                    snapshot.processes.len(),
                    snapshot.generated_at
                ),
                Err(e) => {
                    println!("   ❌ {}", e);
                    all_ok = false;
                }
            }
        }
        None => {
            let root = config.proc_root();
            println!("\n📁 Checking {}...", root.display());
            match collect_proc_entries(&root) {
                Ok(entries) if entries.is_empty() => {
                    println!("   ❌ No process entries found");
                    all_ok = false;
                }
                Ok(entries) => {
                    println!("   ✅ Found {} process entries", entries.len());
                    let readable = entries.iter().filter_map(read_process).count();
                    println!("   ✅ Read {} processes", readable);
                    match entries.iter().find(|e| e.pid == 1).and_then(read_process) {
                        Some(init) => println!("   ✅ PID 1 readable ({})", init.name),
                        None => println!("   ⚠️  PID 1 not readable"),
                    }
                }
                Err(e) => {
                    println!("   ❌ {}", e);
                    all_ok = false;
                }
            }
        }
    }

    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => {
            println!("   ✅ Configuration is valid");
        }
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review the output above");
        std::process::exit(1);
    }
}
