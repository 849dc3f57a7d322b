//! Output formatting: present a counted tree for display or export.
//!
//! This is the last stage of the pipeline. It provides:
//!
//! - **ReportTable**: depth-first rows with indented labels and a footer,
//!   read through the [`TreeModel`](crate::view::TreeModel) adapter
//! - **ReportNode**: the nested form of the tree, for JSON output
//!
//! Both are pure presentation: all counting and pruning has already happened.
//!
//! ## Example
//!
//! ```rust,ignore
//! use codecountlib::{ReportTable, TreeModel};
//!
//! let table = ReportTable::from_model(&TreeModel::new(&tree), None);
//! // table.headers: ["Name", "Total", "Non-empty", "Empty"]
//! // table.rows: [TableRow { label: "proj/", values: ["12", "9", "3"], .. }, ...]
//! // table.footer: TableRow { label: "Total (5 files)", ... }
//! ```

pub mod report;
pub mod table;

pub use report::ReportNode;
pub use table::{ReportTable, TableRow};
