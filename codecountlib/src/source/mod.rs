//! Source selection: decide which entries a scan looks at.
//!
//! This module handles the first stage of the pipeline - deciding what goes
//! into the tree. It provides:
//!
//! - **Configuration**: the JSON document listing file types and exclusion patterns
//! - **Filtering**: prefix-anchored exclusion patterns and suffix-based type selection
//!
//! ## Example
//!
//! ```rust
//! use codecountlib::source::{Config, ScanFilter, TypeSelection};
//!
//! let config = Config::default();
//! let types: TypeSelection = config.select(&["Python"]).unwrap();
//! assert!(types.matches("main.py"));
//!
//! let filter = ScanFilter::new().exclude_dir("venv").unwrap();
//! assert!(filter.check_dir("venv-3.12").is_err());
//! ```

pub mod config;
pub mod filter;

pub use config::{Config, FilterPatterns};
pub use filter::{should_include, FileType, PatternFilter, Rejection, ScanFilter, TypeSelection};
