//! Hierarchical view adapter over a [`Tree`].
//!
//! Tree widgets address cells by `(row, column, parent)` and ask for a cell's
//! parent to walk back up. [`TreeModel`] answers those questions from the
//! tree's own navigation (`child`, `parent`, `row`) without adding any display
//! state to the tree itself.
//!
//! The top level holds exactly one row: the scan root.

use std::fmt;

use serde::Serialize;

use crate::data::tree::{NodeId, Tree, TreeNode};

/// Displayed columns, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Total,
    NonEmpty,
    Empty,
}

impl Column {
    pub const ALL: [Column; 4] = [Column::Name, Column::Total, Column::NonEmpty, Column::Empty];

    pub fn from_index(index: usize) -> Option<Column> {
        Self::ALL.get(index).copied()
    }

    pub fn header(self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Total => "Total",
            Column::NonEmpty => "Non-empty",
            Column::Empty => "Empty",
        }
    }
}

/// Position of a cell: row among its siblings, column, and the node it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelIndex {
    row: usize,
    column: usize,
    node: NodeId,
}

impl ModelIndex {
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Same row, different column.
    pub fn sibling_at_column(&self, column: usize) -> ModelIndex {
        ModelIndex { column, ..*self }
    }
}

/// Content of one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Count(u64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Count(count) => write!(f, "{count}"),
        }
    }
}

/// Read-only tree view model.
#[derive(Debug, Clone, Copy)]
pub struct TreeModel<'a> {
    tree: &'a Tree,
}

impl<'a> TreeModel<'a> {
    pub fn new(tree: &'a Tree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &'a Tree {
        self.tree
    }

    /// Index of the cell at `(row, column)` under `parent`; `None` for the top level.
    pub fn index(&self, row: usize, column: usize, parent: Option<ModelIndex>) -> Option<ModelIndex> {
        if column >= self.column_count() {
            return None;
        }
        let node = match parent {
            None if row == 0 => self.tree.root(),
            None => return None,
            Some(parent) => self.tree.child(parent.node, row)?,
        };
        Some(ModelIndex { row, column, node })
    }

    /// Parent cell (column 0), or `None` for the root.
    pub fn parent(&self, index: ModelIndex) -> Option<ModelIndex> {
        let parent = self.tree.parent(index.node)?;
        Some(ModelIndex {
            row: self.tree.row(parent),
            column: 0,
            node: parent,
        })
    }

    pub fn row_count(&self, parent: Option<ModelIndex>) -> usize {
        match parent {
            None => 1,
            Some(parent) => self.tree.child_count(parent.node),
        }
    }

    pub fn column_count(&self) -> usize {
        Column::ALL.len()
    }

    pub fn header(&self, section: usize) -> Option<&'static str> {
        Column::from_index(section).map(Column::header)
    }

    /// Node shown at `index`, or `None` if the index belongs to another tree.
    pub fn node(&self, index: ModelIndex) -> Option<&'a TreeNode> {
        self.tree.get(index.node)
    }

    pub fn data(&self, index: ModelIndex) -> Option<Cell> {
        let node = self.tree.get(index.node)?;
        let counts = node.counts();
        let cell = match Column::from_index(index.column)? {
            Column::Name => Cell::Text(node.name().to_string()),
            Column::Total => Cell::Count(counts.total),
            Column::NonEmpty => Cell::Count(counts.non_empty),
            Column::Empty => Cell::Count(counts.empty),
        };
        Some(cell)
    }
}
