//! Error types for codecountlib

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while configuring or running a scan
#[derive(Error, Debug)]
pub enum CodeCountError {
    /// Failed to read a file or decode it as UTF-8
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to enumerate a directory
    #[error("failed to list directory '{path}': {source}")]
    DirectoryList {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed or missing configuration document
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Invalid exclusion pattern
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A type name that the configuration does not define
    #[error("unknown file type: {0}")]
    UnknownType(String),

    /// Path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is neither a regular file nor a directory
    #[error("not a file or directory: {0}")]
    NotFileOrDirectory(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A failure recorded against a single node of a scan tree.
///
/// Unlike [`CodeCountError`], a node error never aborts a scan: the node stays
/// in the tree with zero counts so the failure can be shown next to its siblings.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum NodeError {
    /// The directory could not be listed
    #[error("cannot list directory: {0}")]
    DirectoryList(String),

    /// The file could not be opened or decoded
    #[error("cannot read file: {0}")]
    FileRead(String),
}

impl From<&CodeCountError> for NodeError {
    fn from(err: &CodeCountError) -> Self {
        match err {
            CodeCountError::DirectoryList { source, .. } => {
                NodeError::DirectoryList(source.to_string())
            }
            CodeCountError::FileRead { source, .. } => NodeError::FileRead(source.to_string()),
            other => NodeError::FileRead(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_node_error_from_file_read() {
        let err = CodeCountError::FileRead {
            path: PathBuf::from("a.py"),
            source: io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"),
        };
        let node_err = NodeError::from(&err);
        assert_eq!(
            node_err,
            NodeError::FileRead("stream did not contain valid UTF-8".to_string())
        );
    }

    #[test]
    fn test_node_error_serializes_with_kind() {
        let err = NodeError::DirectoryList("permission denied".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "directory_list");
        assert_eq!(json["message"], "permission denied");
    }
}
