//! Tree rendering with box-drawing connectors and per-depth colors.
//!
//! Each output line is made of three parts:
//! - one column per ancestor level below the start node, holding `│` when
//!   that ancestor still has siblings further down and a space otherwise;
//! - the junction: `┌`/`─` for the start node, `├`/`└` followed by `┬`/`─`
//!   for everything below it;
//! - the label: optional `[pid] `, the name, optional ` (comm)` and
//!   ` [cmdline]`.
//!
//! The walk keeps its own stack, so tree depth is not limited by the call
//! stack.

use std::io::{self, Write};

use crate::style::{depth_color, paint};
use crate::tree::{NodeId, ProcessTree, TreeNode};

pub const VERTICAL: &str = "│";
pub const HORIZONTAL_FIRST: &str = "┌";
pub const HORIZONTAL: &str = "─";
pub const HORIZONTAL_CHILDREN: &str = "┬";
pub const CONNECTOR: &str = "├";
pub const CONNECTOR_LAST: &str = "└";

/// What to print for each node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_pid: bool,
    pub show_comm: bool,
    pub show_cmdline: bool,
    pub color: bool,
}

/// Renders a [`ProcessTree`] one line per node.
pub struct TreeRenderer<'a> {
    tree: &'a ProcessTree,
    options: &'a RenderOptions,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(tree: &'a ProcessTree, options: &'a RenderOptions) -> Self {
        Self { tree, options }
    }

    /// Lazily produces the lines of the subtree below `start`, in pre-order.
    pub fn lines(&self, start: NodeId) -> Lines<'a> {
        Lines {
            tree: self.tree,
            options: self.options,
            stack: vec![Frame {
                id: start,
                depth: 0,
                last: false,
                ancestors: Vec::new(),
            }],
        }
    }

    pub fn render(&self, start: NodeId) -> Vec<String> {
        self.lines(start).collect()
    }

    pub fn write_to<W: Write>(&self, start: NodeId, out: &mut W) -> io::Result<()> {
        for line in self.lines(start) {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }
}

struct Frame {
    id: NodeId,
    depth: usize,
    last: bool,
    /// `ancestors[i]` is true when the ancestor at depth `i - 1` was not the
    /// last of its siblings.
    ancestors: Vec<bool>,
}

/// Iterator returned by [`TreeRenderer::lines`].
pub struct Lines<'a> {
    tree: &'a ProcessTree,
    options: &'a RenderOptions,
    stack: Vec<Frame>,
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let frame = self.stack.pop()?;
        let node = self.tree.node(frame.id);
        let mut line = self.pipes(&frame, node.has_children());
        push_label(&mut line, node, self.options);

        let children = node.children();
        let mut ancestors = frame.ancestors;
        ancestors.push(!frame.last);
        for (i, &child) in children.iter().enumerate().rev() {
            self.stack.push(Frame {
                id: child,
                depth: frame.depth + 1,
                last: i + 1 == children.len(),
                ancestors: ancestors.clone(),
            });
        }

        Some(line)
    }
}

impl Lines<'_> {
    fn pipes(&self, frame: &Frame, has_children: bool) -> String {
        let color = self.options.color;
        let depth = frame.depth;
        let mut out = String::new();

        for i in 0..depth.saturating_sub(1) {
            if frame.ancestors[i + 1] {
                out.push_str(&paint(VERTICAL, depth_color(i), color));
            } else {
                out.push(' ');
            }
        }

        if depth == 0 {
            let junction = if has_children {
                HORIZONTAL_FIRST
            } else {
                HORIZONTAL
            };
            out.push_str(&paint(junction, depth_color(0), color));
        } else {
            let connector = if frame.last {
                CONNECTOR_LAST
            } else {
                CONNECTOR
            };
            let branch = if has_children {
                HORIZONTAL_CHILDREN
            } else {
                HORIZONTAL
            };
            out.push_str(&paint(connector, depth_color(depth - 1), color));
            out.push_str(&paint(branch, depth_color(depth), color));
        }

        out
    }
}

fn push_label(line: &mut String, node: &TreeNode, options: &RenderOptions) {
    let record = &node.record;
    if options.show_pid {
        line.push_str(&format!("[{}] ", record.pid));
    }
    line.push_str(&record.name);
    if options.show_comm {
        if let Some(comm) = record.command_name() {
            line.push_str(&format!(" ({comm})"));
        }
    }
    if options.show_cmdline {
        if let Some(cmdline) = record.command_line() {
            line.push_str(&format!(" [{cmdline}]"));
        }
    }
}
