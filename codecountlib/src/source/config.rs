//! Configuration document: file types and exclusion patterns.
//!
//! The document is JSON with two keys:
//!
//! ```json
//! {
//!   "types": [{ "name": "Python", "suffix": ".py" }],
//!   "filter": { "dir": ["\\.git", "__pycache__"], "file": ["\\."] }
//! }
//! ```
//!
//! A configuration must pass [`Config::validate`] before it is turned into
//! scan options.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CodeCountError;
use crate::Result;

use super::filter::{FileType, PatternFilter, ScanFilter, TypeSelection};

/// Built-in configuration used when no document is supplied.
const DEFAULT_CONFIG: &str = include_str!("default_config.json");

/// Exclusion pattern lists as written in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPatterns {
    /// Patterns tested against directory names
    #[serde(default)]
    pub dir: Vec<String>,
    /// Patterns tested against file names
    #[serde(default)]
    pub file: Vec<String>,
}

/// A parsed configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// All known file types, in display order
    pub types: Vec<FileType>,
    /// Exclusion patterns
    #[serde(default)]
    pub filter: FilterPatterns,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_json_str(DEFAULT_CONFIG).expect("built-in configuration is valid")
    }
}

impl Config {
    /// Parse and validate a configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::parse(text, None)
    }

    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            CodeCountError::Config(format!("cannot read '{}': {e}", path.display()))
        })?;
        let config = Self::parse(&text, Some(path))?;
        tracing::debug!(
            path = %path.display(),
            types = config.types.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Parse and validate; `origin` names the file in parse errors.
    fn parse(text: &str, origin: Option<&Path>) -> Result<Self> {
        let config: Config = serde_json::from_str(text).map_err(|e| match origin {
            Some(path) => {
                CodeCountError::Config(format!("malformed document '{}': {e}", path.display()))
            }
            None => CodeCountError::Config(format!("malformed document: {e}")),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the document for problems that would make a scan meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.types.is_empty() {
            return Err(CodeCountError::Config("no file types defined".to_string()));
        }

        let mut seen = HashSet::new();
        for file_type in &self.types {
            if file_type.name.trim().is_empty() {
                return Err(CodeCountError::Config(format!(
                    "file type with suffix '{}' has an empty name",
                    file_type.suffix
                )));
            }
            if file_type.suffix.is_empty() {
                return Err(CodeCountError::Config(format!(
                    "file type '{}' has an empty suffix",
                    file_type.name
                )));
            }
            if !seen.insert(file_type.name.as_str()) {
                return Err(CodeCountError::Config(format!(
                    "file type '{}' is defined more than once",
                    file_type.name
                )));
            }
        }

        self.scan_filter()?;
        Ok(())
    }

    /// Compile the exclusion patterns.
    pub fn scan_filter(&self) -> Result<ScanFilter> {
        Ok(ScanFilter {
            dirs: PatternFilter::new().exclude_many(self.filter.dir.as_slice())?,
            files: PatternFilter::new().exclude_many(self.filter.file.as_slice())?,
        })
    }

    /// Select types by name.
    ///
    /// An empty `names` list selects every configured type.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<TypeSelection> {
        if names.is_empty() {
            return Ok(self.types.iter().cloned().collect());
        }

        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.types
                    .iter()
                    .find(|t| t.name == name)
                    .cloned()
                    .ok_or_else(|| CodeCountError::UnknownType(name.to_string()))
            })
            .collect()
    }
}
