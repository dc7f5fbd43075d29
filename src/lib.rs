//! proctree library
//!
//! Builds a process tree from a flat snapshot and renders it with
//! box-drawing connectors and per-depth colors.
//!
//! # Usage
//!
//! ```rust
//! use proctree::{BuildOptions, ProcessRecord, ProcessTree, RenderOptions, TreeRenderer};
//!
//! let records = vec![
//!     ProcessRecord::new(1, 0, "init"),
//!     ProcessRecord::new(2, 1, "worker"),
//!     ProcessRecord::new(3, 1, "worker2"),
//! ];
//!
//! let tree = ProcessTree::build(records, &BuildOptions::default()).unwrap();
//! let options = RenderOptions::default();
//! let lines = TreeRenderer::new(&tree, &options).render(tree.root());
//!
//! assert_eq!(lines, vec!["┌Kernel", "└┬init", " ├─worker", " └─worker2"]);
//! ```

pub mod error;
pub mod process;
pub mod render;
pub mod style;
pub mod tree;

// Re-export main types for convenience
pub use error::{parse_pid, SnapshotError, TreeError};
pub use process::{ProcessRecord, Snapshot};
pub use render::{RenderOptions, TreeRenderer};
pub use style::{depth_color, paint, TreeColor, PALETTE};
pub use tree::{BuildOptions, NodeId, ProcessTree, TreeNode};
