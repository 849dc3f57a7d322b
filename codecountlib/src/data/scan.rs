//! Scan entry points.
//!
//! A scan turns a root path into a finished [`Tree`]:
//!
//! 1. build the tree from the entries the filter accepts
//! 2. prune directories left without children
//! 3. count every file and roll the counts up
//!
//! Every call builds a brand-new tree from the options it is given; nothing
//! is shared between scans.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::CodeCountError;
use crate::source::config::Config;
use crate::source::filter::{ScanFilter, TypeSelection};
use crate::Result;

use super::builder::build;
use super::counter::count_file;
use super::tree::{NodeKind, Tree};

/// Options for a single scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// File types eligible for counting
    pub types: TypeSelection,
    /// Directory and file exclusion patterns
    pub filter: ScanFilter,
    /// Follow symbolic links to files and directories
    pub follow_links: bool,
}

impl Default for ScanOptions {
    /// Every built-in type selected, nothing excluded.
    fn default() -> Self {
        Self {
            types: Config::default().select::<&str>(&[]).unwrap_or_default(),
            filter: ScanFilter::new(),
            follow_links: true,
        }
    }
}

impl ScanOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from a configuration, selecting types by name.
    ///
    /// An empty `type_names` selects every configured type.
    pub fn from_config<S: AsRef<str>>(config: &Config, type_names: &[S]) -> Result<Self> {
        Ok(Self {
            types: config.select(type_names)?,
            filter: config.scan_filter()?,
            follow_links: true,
        })
    }

    /// Set the selected types.
    pub fn types(mut self, types: TypeSelection) -> Self {
        self.types = types;
        self
    }

    /// Set the exclusion patterns.
    pub fn filter(mut self, filter: ScanFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set whether symbolic links are followed.
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }
}

fn metadata(path: &Path) -> Result<fs::Metadata> {
    fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CodeCountError::PathNotFound(path.to_path_buf()),
        _ => CodeCountError::Io(e),
    })
}

/// Scan a directory or a single file, whichever `path` names.
///
/// # Example
///
/// ```rust
/// use codecountlib::{scan, ScanOptions, TypeSelection};
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// fs::write(dir.path().join("a.py"), "x = 1\n\ny = 2\n").unwrap();
/// fs::write(dir.path().join("b.txt"), "ignored\n").unwrap();
///
/// let options = ScanOptions::new().types(TypeSelection::default().with("Python", ".py"));
/// let tree = scan(dir.path(), &options).unwrap();
///
/// assert_eq!(tree.child_count(tree.root()), 1);
/// assert_eq!(tree.root_node().counts().total, 3);
/// ```
pub fn scan(path: impl AsRef<Path>, options: &ScanOptions) -> Result<Tree> {
    let path = path.as_ref();
    let meta = metadata(path)?;

    if meta.is_file() {
        scan_file(path)
    } else if meta.is_dir() {
        scan_directory(path, options)
    } else {
        Err(CodeCountError::NotFileOrDirectory(path.to_path_buf()))
    }
}

/// Scan a directory: build, prune, then aggregate.
pub fn scan_directory(path: impl AsRef<Path>, options: &ScanOptions) -> Result<Tree> {
    let path = path.as_ref();
    if !metadata(path)?.is_dir() {
        return Err(CodeCountError::NotFileOrDirectory(path.to_path_buf()));
    }

    let mut tree = build(path, options)?.pruned();
    tree.aggregate();
    log_summary(path, &tree);
    Ok(tree)
}

/// Scan a single file. The tree holds only the file itself.
///
/// Type selection and exclusion patterns do not apply, and a read failure
/// fails the scan.
pub fn scan_file(path: impl AsRef<Path>) -> Result<Tree> {
    let path = path.as_ref();
    if !metadata(path)?.is_file() {
        return Err(CodeCountError::NotFileOrDirectory(path.to_path_buf()));
    }

    let counts = count_file(path)?;
    let mut tree = Tree::new(path, NodeKind::File);
    tree.aggregate_with(|_| Ok(counts));
    log_summary(path, &tree);
    Ok(tree)
}

fn log_summary(path: &Path, tree: &Tree) {
    let summary = tree.summary();
    tracing::info!(
        path = %path.display(),
        files = summary.file_count,
        dirs = summary.dir_count,
        errors = summary.error_count,
        total = summary.counts.total,
        non_empty = summary.counts.non_empty,
        empty = summary.counts.empty,
        "scan complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::stats::LineCounts;
    use crate::error::NodeError;
    use std::fs;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn python_only() -> ScanOptions {
        ScanOptions::new().types(TypeSelection::default().with("Python", ".py"))
    }

    fn create_project(root: &Path) {
        write(&root.join("app/main.py"), "import os\n\n\ndef main():\n    pass\n");
        write(&root.join("app/util/helpers.py"), "X = 1\n");
        write(&root.join("app/util/notes.txt"), "not counted\n");
        write(&root.join("docs/guide.md"), "# Guide\n");
        write(&root.join("tests/test_main.py"), "def test():\n    assert True\n\n");
        write(&root.join("setup.py"), "from setuptools import setup\nsetup()\n");
    }

    #[test]
    fn test_example_from_readme() {
        let temp = tempdir().unwrap();
        write(&temp.path().join("a.py"), "a = 1\n\nb = 2\n");
        write(&temp.path().join("b.txt"), "ignored\n");

        let tree = scan(temp.path(), &python_only()).unwrap();
        let root = tree.root();

        assert_eq!(tree.child_count(root), 1);
        let a = tree.node(tree.child(root, 0).unwrap());
        assert_eq!(a.name(), "a.py");
        assert!(a.is_file());
        assert_eq!(a.counts(), LineCounts::from_parts(2, 1));
        assert_eq!(tree.root_node().counts(), a.counts());
    }

    #[test]
    fn test_tree_sum_invariant() {
        let temp = tempdir().unwrap();
        create_project(temp.path());

        let tree = scan(temp.path(), &python_only()).unwrap();
        let file_total: u64 = tree.files().map(|f| f.counts().total).sum();

        assert_eq!(tree.root_node().counts().total, file_total);
        assert_eq!(file_total, 5 + 1 + 3 + 2);
        for (id, _) in tree.walk() {
            let c = tree.node(id).counts();
            assert_eq!(c.total, c.non_empty + c.empty);
        }
    }

    #[test]
    fn test_empty_directories_are_pruned() {
        let temp = tempdir().unwrap();
        create_project(temp.path());

        let tree = scan(temp.path(), &python_only()).unwrap();

        // docs/ only holds markdown
        assert!(!tree.walk().any(|(id, _)| tree.node(id).name() == "docs"));
        for (id, _) in tree.walk() {
            let node = tree.node(id);
            if node.is_dir() && id != tree.root() {
                assert!(tree.child_count(id) > 0, "{} is empty", node.name());
            }
        }
    }

    #[test]
    fn test_only_non_matching_files_gives_empty_root() {
        let temp = tempdir().unwrap();
        write(&temp.path().join("a/b/readme.txt"), "text\n");
        write(&temp.path().join("c.txt"), "text\n");

        let tree = scan(temp.path(), &python_only()).unwrap();
        assert_eq!(tree.child_count(tree.root()), 0);
        assert!(tree.root_node().counts().is_zero());
    }

    #[test]
    fn test_file_exclusion_wins_over_type() {
        let temp = tempdir().unwrap();
        create_project(temp.path());

        let options = python_only().filter(ScanFilter::new().exclude_file("test_").unwrap());
        let tree = scan(temp.path(), &options).unwrap();

        assert!(!tree.files().any(|f| f.name() == "test_main.py"));
        // tests/ is now empty and pruned
        assert!(!tree.walk().any(|(id, _)| tree.node(id).name() == "tests"));
    }

    #[test]
    fn test_directory_exclusion_is_prefix_based() {
        let temp = tempdir().unwrap();
        create_project(temp.path());
        write(&temp.path().join("tests_extra/x.py"), "x\n");

        let options = python_only().filter(ScanFilter::new().exclude_dir("tests").unwrap());
        let tree = scan(temp.path(), &options).unwrap();

        let names: Vec<&str> = tree.walk().map(|(id, _)| tree.node(id).name()).collect();
        assert!(!names.contains(&"tests"));
        assert!(!names.contains(&"tests_extra"));
        assert!(names.contains(&"app"));
    }

    #[test]
    fn test_rescan_with_different_types_is_independent() {
        let temp = tempdir().unwrap();
        create_project(temp.path());

        let python = scan(temp.path(), &python_only()).unwrap();
        let markdown = scan(
            temp.path(),
            &ScanOptions::new().types(TypeSelection::default().with("Markdown", ".md")),
        )
        .unwrap();
        let python_again = scan(temp.path(), &python_only()).unwrap();

        assert_eq!(markdown.summary().file_count, 1);
        assert_eq!(markdown.root_node().counts().total, 1);
        assert_eq!(python.summary().file_count, 4);
        assert_eq!(python, python_again);
    }

    #[test]
    fn test_invalid_utf8_is_recorded_per_file() {
        let temp = tempdir().unwrap();
        write(&temp.path().join("good.py"), "ok\n");
        fs::write(temp.path().join("bad.py"), [0xffu8, 0xfe, 0x0a]).unwrap();

        let tree = scan(temp.path(), &python_only()).unwrap();
        let errors: Vec<&str> = tree.errors().map(|n| n.name()).collect();

        assert_eq!(errors, vec!["bad.py"]);
        assert!(matches!(
            tree.errors().next().and_then(|n| n.error()),
            Some(NodeError::FileRead(_))
        ));
        assert_eq!(tree.root_node().counts().total, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_does_not_abort() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        write(&temp.path().join("open/a.py"), "a\n");
        write(&temp.path().join("locked/b.py"), "b\n");
        let locked = temp.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // privileged users can list it anyway
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let tree = scan(temp.path(), &python_only());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        let tree = tree.unwrap();

        let locked_node = tree
            .walk()
            .map(|(id, _)| tree.node(id))
            .find(|n| n.name() == "locked")
            .expect("locked directory stays in the tree");
        assert!(matches!(locked_node.error(), Some(NodeError::DirectoryList(_))));
        assert_eq!(tree.root_node().counts().total, 1);
        assert_eq!(tree.summary().error_count, 1);
    }

    #[test]
    fn test_single_file_mode() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("notes.txt");
        write(&file, "one\n\ntwo\n");

        // type selection does not apply to a single file
        let tree = scan(&file, &python_only()).unwrap();
        assert!(tree.root_node().is_file());
        assert_eq!(tree.child_count(tree.root()), 0);
        assert_eq!(tree.root_node().counts(), LineCounts::from_parts(2, 1));
    }

    #[test]
    fn test_single_empty_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("empty.py");
        write(&file, "");

        let tree = scan_file(&file).unwrap();
        assert!(tree.root_node().counts().is_zero());
        assert!(tree.root_node().error().is_none());
    }

    #[test]
    fn test_single_file_read_failure_is_fatal() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("bin.py");
        fs::write(&file, [0xc3u8, 0x28]).unwrap();

        assert!(matches!(
            scan_file(&file),
            Err(CodeCountError::FileRead { .. })
        ));
    }

    #[test]
    fn test_missing_root() {
        let temp = tempdir().unwrap();
        let result = scan(temp.path().join("nope"), &python_only());
        assert!(matches!(result, Err(CodeCountError::PathNotFound(_))));
    }

    #[test]
    fn test_mode_mismatch() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("a.py");
        write(&file, "x\n");

        assert!(matches!(
            scan_directory(&file, &python_only()),
            Err(CodeCountError::NotFileOrDirectory(_))
        ));
        assert!(matches!(
            scan_file(temp.path()),
            Err(CodeCountError::NotFileOrDirectory(_))
        ));
    }

    #[test]
    fn test_options_from_config() {
        let config = Config::from_json_str(
            r#"{"types": [{"name": "Python", "suffix": ".py"}, {"name": "Text", "suffix": ".txt"}],
                "filter": {"dir": ["docs"], "file": ["notes"]}}"#,
        )
        .unwrap();
        let temp = tempdir().unwrap();
        create_project(temp.path());

        let options = ScanOptions::from_config(&config, &["Text"]).unwrap();
        let tree = scan(temp.path(), &options).unwrap();
        assert_eq!(tree.summary().file_count, 0);

        let options = ScanOptions::from_config::<&str>(&config, &[]).unwrap();
        let tree = scan(temp.path(), &options).unwrap();
        assert_eq!(tree.summary().file_count, 4);
    }

    #[test]
    fn test_default_options_select_builtin_types() {
        let options = ScanOptions::default();
        assert!(options.types.matches("main.py"));
        assert!(options.types.matches("lib.rs"));
        assert!(options.filter.dirs.is_empty());
    }
}
