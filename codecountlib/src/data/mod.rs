//! Data collection: build the tree and count lines.
//!
//! This module handles the second stage of the pipeline - turning a root path
//! into a counted tree. It provides:
//!
//! - **Counting**: line classification for one file (`count_file`, `count_text`)
//! - **Statistics**: the `LineCounts` triple
//! - **Tree**: arena-backed directory/file nodes with pruning and aggregation
//! - **Scanning**: the high-level entry points (`scan`, `scan_directory`, `scan_file`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use codecountlib::data::{scan, ScanOptions};
//!
//! let tree = scan(".", &ScanOptions::new())?;
//! println!("Total lines: {}", tree.root_node().counts().total);
//! ```

pub mod builder;
pub mod counter;
pub mod scan;
pub mod stats;
pub mod tree;

pub use builder::build;
pub use counter::{count_file, count_text};
pub use scan::{scan, scan_directory, scan_file, ScanOptions};
pub use stats::LineCounts;
pub use tree::{NodeId, NodeKind, ScanSummary, Tree, TreeNode, Walk};
