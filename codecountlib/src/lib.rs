//! # codecountlib
//!
//! A line counter for source trees that reports total, non-empty and empty
//! lines per file and per directory.
//!
//! ## Overview
//!
//! A scan turns a root path into a tree of directory and file nodes:
//!
//! - **Source selection**: file types are chosen by suffix, directories and
//!   files can be excluded with prefix-anchored regular expressions
//! - **Tree building**: directories are listed one level at a time, with
//!   directories first and then names in order
//! - **Pruning**: directories that contain no counted file are dropped
//! - **Aggregation**: every directory's counts are the sum of its children
//!
//! Failures on individual entries do not abort a scan. An unreadable file or
//! directory stays in the tree with zero counts and an error marker.
//!
//! ## Features
//!
//! - **Configurable types**: a JSON document names each type and its suffix
//! - **Universal newlines**: `\n`, `\r\n` and lone `\r` all end a line
//! - **View adapter**: [`TreeModel`] exposes the tree as rows and columns
//! - **Pure Rust data types**: results are plain data, no printing
//!
//! ## Example
//!
//! ```rust
//! use codecountlib::{scan, ScanOptions, TypeSelection};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::create_dir(dir.path().join("pkg")).unwrap();
//! fs::write(dir.path().join("pkg/mod.py"), "import os\n\nprint(os.name)\n").unwrap();
//! fs::write(dir.path().join("README.txt"), "not counted\n").unwrap();
//!
//! let options = ScanOptions::new().types(TypeSelection::default().with("Python", ".py"));
//! let tree = scan(dir.path(), &options).unwrap();
//!
//! let counts = tree.root_node().counts();
//! assert_eq!(counts.total, 3);
//! assert_eq!(counts.non_empty, 2);
//! assert_eq!(counts.empty, 1);
//! assert_eq!(tree.summary().file_count, 1);
//! ```

pub mod data;
pub mod error;
pub mod output;
pub mod source;
pub mod view;

pub use data::{
    count_file, count_text, scan, scan_directory, scan_file, LineCounts, NodeId, NodeKind,
    ScanOptions, ScanSummary, Tree, TreeNode,
};
pub use error::{CodeCountError, NodeError};
pub use output::{ReportNode, ReportTable, TableRow};
pub use source::{Config, FileType, PatternFilter, ScanFilter, TypeSelection};
pub use view::{Cell, Column, ModelIndex, TreeModel};

/// Result type for codecountlib operations
pub type Result<T> = std::result::Result<T, CodeCountError>;
