//! Entry filtering: exclusion patterns and file type selection.
//!
//! Two independent [`PatternFilter`]s decide which directory and file names are
//! excluded, and a [`TypeSelection`] decides which file suffixes are eligible.
//! [`ScanFilter`] combines them into the per-entry decision used while
//! building the tree.
//!
//! Patterns are regular expressions anchored at the start of the name only:
//! `temp` excludes `temp`, `temporary` and `temp.py`, but not `my_temp`.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CodeCountError;
use crate::Result;

/// Compile a prefix-anchored pattern.
fn compile_prefix(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})")).map_err(|e| CodeCountError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Returns false if `name` matches any of `patterns`, true otherwise.
///
/// Matching short-circuits on the first pattern that matches.
pub fn should_include(name: &str, patterns: &[Regex]) -> bool {
    !patterns.iter().any(|pattern| pattern.is_match(name))
}

/// An ordered set of prefix-anchored exclusion patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternFilter {
    sources: Vec<String>,
    patterns: Vec<Regex>,
}

impl PatternFilter {
    /// Create an empty filter (excludes nothing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exclusion pattern.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        self.patterns.push(compile_prefix(pattern)?);
        self.sources.push(pattern.to_string());
        Ok(self)
    }

    /// Add multiple exclusion patterns.
    pub fn exclude_many<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for pattern in patterns {
            self = self.exclude(pattern.as_ref())?;
        }
        Ok(self)
    }

    /// Whether `name` survives the filter.
    pub fn should_include(&self, name: &str) -> bool {
        should_include(name, &self.patterns)
    }

    /// The first pattern (as written) that excludes `name`, if any.
    pub fn first_match(&self, name: &str) -> Option<&str> {
        self.patterns
            .iter()
            .position(|pattern| pattern.is_match(name))
            .map(|i| self.sources[i].as_str())
    }

    /// Patterns as they were written.
    pub fn patterns(&self) -> &[String] {
        &self.sources
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// A named file type, e.g. `{ name: "Python", suffix: ".py" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileType {
    /// Human-readable type name
    pub name: String,
    /// Suffix compared case-sensitively against the end of file names
    pub suffix: String,
}

impl FileType {
    pub fn new(name: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            suffix: suffix.into(),
        }
    }

    /// Whether `file_name` ends with this type's suffix.
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.suffix)
    }
}

/// The file types selected for one scan.
///
/// An empty selection matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeSelection {
    types: Vec<FileType>,
}

impl TypeSelection {
    pub fn new(types: Vec<FileType>) -> Self {
        Self { types }
    }

    /// Builder: add a type.
    pub fn with(mut self, name: &str, suffix: &str) -> Self {
        self.types.push(FileType::new(name, suffix));
        self
    }

    /// Whether `file_name` ends with the suffix of any selected type.
    pub fn matches(&self, file_name: &str) -> bool {
        self.types.iter().any(|t| t.matches(file_name))
    }

    pub fn types(&self) -> &[FileType] {
        &self.types
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<FileType> for TypeSelection {
    fn from_iter<I: IntoIterator<Item = FileType>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().collect(),
        }
    }
}

/// Why an entry was left out of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Directory name matched a directory-exclusion pattern
    ExcludedDir,
    /// File name matched a file-exclusion pattern
    ExcludedFile,
    /// File name matched no selected type
    UnselectedType,
}

/// Exclusion patterns for directory names and file names.
#[derive(Debug, Clone, Default)]
pub struct ScanFilter {
    /// Applied to directory names only
    pub dirs: PatternFilter,
    /// Applied to file names only
    pub files: PatternFilter,
}

impl ScanFilter {
    /// Create a filter that excludes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory-exclusion pattern.
    pub fn exclude_dir(mut self, pattern: &str) -> Result<Self> {
        self.dirs = self.dirs.exclude(pattern)?;
        Ok(self)
    }

    /// Add a file-exclusion pattern.
    pub fn exclude_file(mut self, pattern: &str) -> Result<Self> {
        self.files = self.files.exclude(pattern)?;
        Ok(self)
    }

    /// Decide whether a directory entry becomes a node.
    pub fn check_dir(&self, name: &str) -> std::result::Result<(), Rejection> {
        if self.dirs.should_include(name) {
            Ok(())
        } else {
            Err(Rejection::ExcludedDir)
        }
    }

    /// Decide whether a file entry becomes a node.
    ///
    /// A file is included only if no file pattern excludes it and its name
    /// ends with a selected suffix.
    pub fn check_file(
        &self,
        name: &str,
        types: &TypeSelection,
    ) -> std::result::Result<(), Rejection> {
        if !self.files.should_include(name) {
            return Err(Rejection::ExcludedFile);
        }
        if !types.matches(name) {
            return Err(Rejection::UnselectedType);
        }
        Ok(())
    }
}
