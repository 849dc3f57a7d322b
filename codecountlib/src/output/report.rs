//! Nested, serializable form of a scan tree.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::data::stats::LineCounts;
use crate::data::tree::{NodeId, NodeKind, Tree};
use crate::error::NodeError;

/// One node of the report, with its children inline.
///
/// Counts are flattened into the node so a JSON consumer sees
/// `{"name": ..., "total": ..., "non_empty": ..., "empty": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportNode {
    pub name: String,
    pub path: PathBuf,
    pub kind: NodeKind,
    #[serde(flatten)]
    pub counts: LineCounts,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<NodeError>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<ReportNode>,
}

impl ReportNode {
    /// Convert the whole tree, starting at its root.
    pub fn from_tree(tree: &Tree) -> Self {
        Self::from_node(tree, tree.root())
    }

    fn from_node(tree: &Tree, id: NodeId) -> Self {
        let node = tree.node(id);
        ReportNode {
            name: node.name().to_string(),
            path: node.path().to_path_buf(),
            kind: node.kind(),
            counts: node.counts(),
            error: node.error().cloned(),
            children: node
                .children()
                .iter()
                .map(|&child| Self::from_node(tree, child))
                .collect(),
        }
    }

    /// Number of file nodes in this subtree.
    pub fn file_count(&self) -> usize {
        match self.kind {
            NodeKind::File => 1,
            NodeKind::Directory => self.children.iter().map(ReportNode::file_count).sum(),
        }
    }
}
