//! Process tree construction.
//!
//! The tree is an arena: every node lives in one `Vec` owned by the
//! [`ProcessTree`], and parent/child links are [`NodeId`] indices into it.
//! Children keep the order in which their pids first appeared in the snapshot.
//!
//! Construction policies:
//! - a record whose parent pid is unknown is attached to the root;
//! - a record naming itself (directly or through a cycle) as ancestor is
//!   attached to the root;
//! - a pid seen twice keeps its first position and the last record's data;
//! - the kernel thread supervisor (pid 2, parented by pid 0) is left
//!   detached unless kernel threads are requested, which hides its whole
//!   subtree. A pid 2 with a real parent is an ordinary process.

use ahash::AHashMap as HashMap;
use tracing::{debug, warn};

use crate::error::TreeError;
use crate::process::{ProcessRecord, KERNEL_PID, KTHREADD_PID};

/// Index of a node inside its [`ProcessTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A process and its position in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub record: ProcessRecord,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    fn new(record: ProcessRecord) -> Self {
        Self {
            record,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn pid(&self) -> u32 {
        self.record.pid
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Options affecting which nodes are attached to the tree.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Attach the kernel thread supervisor and therefore all kernel threads.
    pub include_kernel_threads: bool,
}

/// Rooted, ordered process tree keyed by pid.
#[derive(Debug, Clone)]
pub struct ProcessTree {
    nodes: Vec<TreeNode>,
    index: HashMap<u32, NodeId>,
    root: NodeId,
}

impl ProcessTree {
    /// Builds the tree from a flat snapshot.
    ///
    /// If the snapshot has no pid 0 record a bare `Kernel` root is created.
    /// Fails with [`TreeError::InvalidInput`] on an empty snapshot.
    pub fn build<I>(records: I, options: &BuildOptions) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = ProcessRecord>,
    {
        let mut nodes: Vec<TreeNode> = Vec::new();
        let mut index: HashMap<u32, NodeId> = HashMap::new();

        for record in records {
            match index.get(&record.pid) {
                Some(&id) => {
                    debug!(pid = record.pid, "Duplicate pid in snapshot, keeping last record");
                    nodes[id.0].record = record;
                }
                None => {
                    let id = NodeId(nodes.len());
                    index.insert(record.pid, id);
                    nodes.push(TreeNode::new(record));
                }
            }
        }

        if nodes.is_empty() {
            return Err(TreeError::InvalidInput(
                "process snapshot is empty".to_string(),
            ));
        }

        let root = match index.get(&KERNEL_PID) {
            Some(&id) => id,
            None => {
                let id = NodeId(nodes.len());
                index.insert(KERNEL_PID, id);
                nodes.push(TreeNode::new(ProcessRecord::kernel()));
                id
            }
        };

        let mut tree = Self { nodes, index, root };

        for i in 0..tree.nodes.len() {
            let id = NodeId(i);
            if id == root {
                continue;
            }

            let pid = tree.nodes[i].record.pid;
            let parent_pid = tree.nodes[i].record.parent_pid;

            if pid == KTHREADD_PID
                && parent_pid == KERNEL_PID
                && !options.include_kernel_threads
            {
                debug!(pid, "Skipping kernel thread supervisor");
                continue;
            }

            let parent = match tree.index.get(&parent_pid).copied() {
                Some(parent) if !tree.is_ancestor_or_self(id, parent) => parent,
                Some(_) => {
                    warn!(
                        pid,
                        parent_pid, "Parent link would form a cycle, attaching to root"
                    );
                    root
                }
                None => {
                    debug!(pid, parent_pid, "Parent not in snapshot, attaching to root");
                    root
                }
            };

            tree.nodes[parent.0].children.push(id);
            tree.nodes[i].parent = Some(parent);
        }

        debug!(nodes = tree.nodes.len(), "Process tree built");
        Ok(tree)
    }

    /// True when `candidate` is `from` or one of its attached ancestors.
    fn is_ancestor_or_self(&self, candidate: NodeId, from: NodeId) -> bool {
        let mut current = Some(from);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, pid: u32) -> Option<&TreeNode> {
        self.index.get(&pid).map(|id| &self.nodes[id.0])
    }

    /// Resolves a pid to its node, failing with [`TreeError::NotFound`].
    pub fn lookup(&self, pid: u32) -> Result<NodeId, TreeError> {
        self.index
            .get(&pid)
            .copied()
            .ok_or(TreeError::NotFound(pid))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Number of nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the node can be reached by walking down from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_ancestor_or_self(self.root, id)
    }

    /// Pre-order walk below `start`, yielding each node with its depth.
    pub fn depth_first(&self, start: NodeId) -> DepthFirst<'_> {
        DepthFirst {
            tree: self,
            stack: vec![(start, 0)],
        }
    }
}

/// Iterator returned by [`ProcessTree::depth_first`].
pub struct DepthFirst<'a> {
    tree: &'a ProcessTree,
    stack: Vec<(NodeId, usize)>,
}

impl Iterator for DepthFirst<'_> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        for &child in self.tree.children(id).iter().rev() {
            self.stack.push((child, depth + 1));
        }
        Some((id, depth))
    }
}
