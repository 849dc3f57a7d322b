//! Table-ready rows for the report tree.
//!
//! `ReportTable` flattens a tree into depth-first rows with indented labels,
//! reading everything through the [`TreeModel`] view adapter. It only formats;
//! every count is already in the tree.
//!
//! The data flow is:
//! 1. Tree (built, pruned, aggregated)
//! 2. TreeModel (row/column addressing)
//! 3. ReportTable (strings for display)

use serde::{Deserialize, Serialize};

use crate::data::tree::NodeKind;
use crate::view::{ModelIndex, TreeModel};

/// Indentation per tree level in row labels.
const INDENT: &str = "  ";

/// A single row in the table (data row or footer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Indented name; directories end with `/`
    pub label: String,
    /// Distance from the root
    pub depth: usize,
    pub kind: NodeKind,
    /// Total, non-empty and empty counts, ready for display
    pub values: Vec<String>,
    /// Inline error text for nodes that could not be read
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

/// Table-ready report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    /// Scanned path
    pub title: String,
    /// Column headers: [Name, Total, Non-empty, Empty]
    pub headers: Vec<String>,
    /// One row per visible node, depth-first
    pub rows: Vec<TableRow>,
    /// Summary row
    pub footer: TableRow,
}

impl ReportTable {
    /// Flatten the model into rows. Nodes deeper than `max_depth` are left
    /// out; their counts are still part of their ancestors' totals.
    pub fn from_model(model: &TreeModel<'_>, max_depth: Option<usize>) -> Self {
        let headers = (0..model.column_count())
            .filter_map(|section| model.header(section))
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        if let Some(root) = model.index(0, 0, None) {
            collect_rows(model, root, 0, max_depth, &mut rows);
        }

        let tree = model.tree();
        let root = tree.root_node();
        let summary = tree.summary();
        let footer = TableRow {
            label: footer_label(summary.file_count),
            depth: 0,
            kind: root.kind(),
            values: vec![
                summary.counts.total.to_string(),
                summary.counts.non_empty.to_string(),
                summary.counts.empty.to_string(),
            ],
            error: None,
        };

        ReportTable {
            title: root.path().display().to_string(),
            headers,
            rows,
            footer,
        }
    }

    /// Width of the widest label, for column alignment.
    pub fn label_width(&self) -> usize {
        self.rows
            .iter()
            .chain(std::iter::once(&self.footer))
            .map(|row| row.label.chars().count())
            .max()
            .unwrap_or(0)
    }
}

fn footer_label(file_count: usize) -> String {
    let noun = if file_count == 1 { "file" } else { "files" };
    format!("Total ({file_count} {noun})")
}

fn collect_rows(
    model: &TreeModel<'_>,
    index: ModelIndex,
    depth: usize,
    max_depth: Option<usize>,
    rows: &mut Vec<TableRow>,
) {
    let Some(row) = to_row(model, index, depth) else {
        return;
    };
    rows.push(row);

    if max_depth.is_some_and(|max| depth >= max) {
        return;
    }
    for row in 0..model.row_count(Some(index)) {
        if let Some(child) = model.index(row, 0, Some(index)) {
            collect_rows(model, child, depth + 1, max_depth, rows);
        }
    }
}

fn to_row(model: &TreeModel<'_>, index: ModelIndex, depth: usize) -> Option<TableRow> {
    let node = model.node(index)?;
    let name = model
        .data(index)
        .map(|cell| cell.to_string())
        .unwrap_or_default();
    let suffix = if node.is_dir() { "/" } else { "" };

    let values = (1..model.column_count())
        .filter_map(|column| model.data(index.sibling_at_column(column)))
        .map(|cell| cell.to_string())
        .collect();

    Some(TableRow {
        label: format!("{}{}{}", INDENT.repeat(depth), name, suffix),
        depth,
        kind: node.kind(),
        values,
        error: node.error().map(|e| e.to_string()),
    })
}
