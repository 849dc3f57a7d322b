//! The report tree: directory and file nodes with line counts.
//!
//! Nodes live in an arena owned by [`Tree`] and refer to each other through
//! [`NodeId`] indices. Children are owned by exactly one parent; the parent
//! index is a back-reference used for navigation only.
//!
//! A node is always stored after its parent, so walking the arena backwards
//! visits every child before its parent. Pruning builds a new arena instead of
//! removing nodes in place, which keeps that ordering intact.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::NodeError;
use crate::Result;

use super::counter::count_file;
use super::stats::LineCounts;

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Directory or file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Directory,
    File,
}

/// A single directory or file in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    path: PathBuf,
    name: String,
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    counts: LineCounts,
    error: Option<NodeError>,
}

impl TreeNode {
    fn new(path: PathBuf, kind: NodeKind, parent: Option<NodeId>) -> Self {
        let name = display_name(&path);
        Self {
            path,
            name,
            kind,
            parent,
            children: Vec::new(),
            counts: LineCounts::new(),
            error: None,
        }
    }

    /// Copy of this node detached from its children, for rebuilding an arena.
    fn detached(&self, parent: Option<NodeId>) -> Self {
        Self {
            path: self.path.clone(),
            name: self.name.clone(),
            kind: self.kind,
            parent,
            children: Vec::new(),
            counts: self.counts,
            error: self.error.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn counts(&self) -> LineCounts {
        self.counts
    }

    pub fn error(&self) -> Option<&NodeError> {
        self.error.as_ref()
    }
}

/// Name shown for a path: its final component, or the whole path when there
/// is none (e.g. `/` or `..`).
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Totals describing a finished tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Number of file nodes
    pub file_count: usize,
    /// Number of directory nodes, including the root when it is a directory
    pub dir_count: usize,
    /// Number of nodes carrying an error
    pub error_count: usize,
    /// Counts of the root node
    pub counts: LineCounts,
}

/// A strict tree of directory and file nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

const ROOT: NodeId = NodeId(0);

impl Tree {
    /// Create a tree holding only its root.
    pub fn new(root_path: impl Into<PathBuf>, kind: NodeKind) -> Self {
        Self {
            nodes: vec![TreeNode::new(root_path.into(), kind, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn root_node(&self) -> &TreeNode {
        &self.nodes[ROOT.0]
    }

    /// Look up a node. Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Append a child under `parent` and return its id.
    pub fn add_child(&mut self, parent: NodeId, path: impl Into<PathBuf>, kind: NodeKind) -> NodeId {
        debug_assert!(self.nodes[parent.0].is_dir(), "files cannot have children");
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode::new(path.into(), kind, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Record a failure against a node.
    pub fn set_error(&mut self, id: NodeId, error: NodeError) {
        self.nodes[id.0].error = Some(error);
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// The `index`-th child of `id`.
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.nodes[id.0].children.get(index).copied()
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.nodes[id.0].children.len()
    }

    /// Position of `id` among its siblings; the root is row 0.
    pub fn row(&self, id: NodeId) -> usize {
        self.parent(id)
            .and_then(|parent| self.nodes[parent.0].children.iter().position(|&c| c == id))
            .unwrap_or(0)
    }

    /// Number of ancestors of `id`.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    /// Depth-first pre-order walk from the root, yielding `(id, depth)`.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            tree: self,
            stack: vec![(ROOT, 0)],
        }
    }

    /// All file nodes.
    pub fn files(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter(|n| n.is_file())
    }

    /// All nodes carrying an error.
    pub fn errors(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter(|n| n.error.is_some())
    }

    /// Return a copy without directories left empty by filtering.
    ///
    /// A directory survives if at least one of its children survives, or if it
    /// carries an error. Files and the root always survive.
    pub fn pruned(&self) -> Tree {
        let mut keep = vec![false; self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate().rev() {
            let kept = node.is_file()
                || node.error.is_some()
                || node.children.iter().any(|c| keep[c.0]);
            keep[i] = kept;
        }

        let mut out = Tree {
            nodes: vec![self.nodes[ROOT.0].detached(None)],
        };
        let mut stack = vec![(ROOT, ROOT)];
        while let Some((old, new)) = stack.pop() {
            for &child in &self.nodes[old.0].children {
                if !keep[child.0] {
                    continue;
                }
                let id = NodeId(out.nodes.len());
                out.nodes.push(self.nodes[child.0].detached(Some(new)));
                out.nodes[new.0].children.push(id);
                stack.push((child, id));
            }
        }
        out
    }

    /// Prune in place. See [`Tree::pruned`].
    pub fn prune(&mut self) {
        *self = self.pruned();
    }

    /// Count every file and roll the counts up into the directories.
    pub fn aggregate(&mut self) {
        self.aggregate_with(|path: &Path| count_file(path));
    }

    /// Like [`Tree::aggregate`], with a custom line counter for file nodes.
    ///
    /// A counter failure is recorded on the file node, which keeps zero
    /// counts. Directory counts are overwritten with the sum of their children.
    pub fn aggregate_with<F>(&mut self, mut count: F)
    where
        F: FnMut(&Path) -> Result<LineCounts>,
    {
        for i in (0..self.nodes.len()).rev() {
            match self.nodes[i].kind {
                NodeKind::File => match count(self.nodes[i].path.as_path()) {
                    Ok(counts) => {
                        self.nodes[i].counts = counts;
                        self.nodes[i].error = None;
                    }
                    Err(err) => {
                        tracing::warn!(path = %self.nodes[i].path.display(), "{err}");
                        self.nodes[i].counts = LineCounts::new();
                        self.nodes[i].error = Some(NodeError::from(&err));
                    }
                },
                NodeKind::Directory => {
                    let sum: LineCounts = self.nodes[i]
                        .children
                        .iter()
                        .map(|c| self.nodes[c.0].counts)
                        .sum();
                    self.nodes[i].counts = sum;
                }
            }
        }
    }

    pub fn summary(&self) -> ScanSummary {
        let mut summary = ScanSummary {
            counts: self.root_node().counts,
            ..ScanSummary::default()
        };
        for node in &self.nodes {
            match node.kind {
                NodeKind::File => summary.file_count += 1,
                NodeKind::Directory => summary.dir_count += 1,
            }
            if node.error.is_some() {
                summary.error_count += 1;
            }
        }
        summary
    }
}

/// Iterator returned by [`Tree::walk`].
pub struct Walk<'a> {
    tree: &'a Tree,
    stack: Vec<(NodeId, usize)>,
}

impl Iterator for Walk<'_> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        let children = &self.tree.nodes[id.0].children;
        self.stack
            .extend(children.iter().rev().map(|&child| (child, depth + 1)));
        Some((id, depth))
    }
}
