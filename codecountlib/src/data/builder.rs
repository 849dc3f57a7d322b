//! Tree construction: walk a directory and keep the entries the filter allows.
//!
//! Each directory is listed one level at a time, directories first and then
//! by name. Excluded directories are never descended into, so nothing below
//! them can reappear. A directory that cannot be listed becomes an
//! error-marked node; only a failure on the scan root is fatal.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{CodeCountError, NodeError};
use crate::Result;

use super::scan::ScanOptions;
use super::tree::{NodeId, NodeKind, Tree};

/// Build the unpruned, uncounted tree for the directory at `root`.
pub fn build(root: impl AsRef<Path>, options: &ScanOptions) -> Result<Tree> {
    let root = root.as_ref();
    let mut tree = Tree::new(root, NodeKind::Directory);

    let entries =
        list_dir(root, options.follow_links).map_err(|source| CodeCountError::DirectoryList {
            path: root.to_path_buf(),
            source,
        })?;

    let mut ancestors = vec![fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf())];
    let root_id = tree.root();
    add_entries(&mut tree, root_id, entries, options, &mut ancestors);

    Ok(tree)
}

/// List `dir` and attach the accepted entries to `node`, recursing into
/// directories. Listing failures are recorded on `node`.
fn build_dir(
    tree: &mut Tree,
    node: NodeId,
    dir: &Path,
    options: &ScanOptions,
    ancestors: &mut Vec<PathBuf>,
) {
    match list_dir(dir, options.follow_links) {
        Ok(entries) => add_entries(tree, node, entries, options, ancestors),
        Err(err) => {
            tracing::warn!(path = %dir.display(), "cannot list directory: {err}");
            tree.set_error(node, NodeError::DirectoryList(err.to_string()));
        }
    }
}

fn add_entries(
    tree: &mut Tree,
    node: NodeId,
    entries: Vec<DirEntry>,
    options: &ScanOptions,
    ancestors: &mut Vec<PathBuf>,
) {
    for entry in entries {
        let name = entry.file_name().to_string_lossy();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            if let Err(reason) = options.filter.check_dir(&name) {
                tracing::debug!(path = %entry.path().display(), ?reason, "skipping directory");
                continue;
            }

            let Some(real) = resolve_dir(&entry, ancestors) else {
                continue;
            };

            let child = tree.add_child(node, entry.path(), NodeKind::Directory);
            ancestors.push(real);
            build_dir(tree, child, entry.path(), options, ancestors);
            ancestors.pop();
        } else if file_type.is_file() {
            if let Err(reason) = options.filter.check_file(&name, &options.types) {
                tracing::debug!(path = %entry.path().display(), ?reason, "skipping file");
                continue;
            }
            tree.add_child(node, entry.path(), NodeKind::File);
        } else {
            tracing::debug!(path = %entry.path().display(), "skipping special file");
        }
    }
}

/// Real location of a directory entry, or `None` if it is a link back to one
/// of the directories currently being walked.
fn resolve_dir(entry: &DirEntry, ancestors: &[PathBuf]) -> Option<PathBuf> {
    let parent = ancestors.last()?;
    if !entry.path_is_symlink() {
        return Some(parent.join(entry.file_name()));
    }

    match fs::canonicalize(entry.path()) {
        Ok(real) if ancestors.contains(&real) => {
            tracing::warn!(
                path = %entry.path().display(),
                target = %real.display(),
                "skipping symlink to an enclosing directory"
            );
            None
        }
        Ok(real) => Some(real),
        Err(err) => {
            tracing::warn!(path = %entry.path().display(), "cannot resolve symlink: {err}");
            None
        }
    }
}

/// Directories before files, then by name.
fn dirs_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    b.file_type()
        .is_dir()
        .cmp(&a.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Immediate entries of `dir`, sorted with [`dirs_first`].
///
/// An entry that cannot be inspected (e.g. a dangling link) is skipped; a
/// failure to read `dir` itself is returned.
fn list_dir(dir: &Path, follow_links: bool) -> io::Result<Vec<DirEntry>> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(follow_links)
        .sort_by(dirs_first);

    let mut entries = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(err) if err.path().is_some_and(|p| p != dir) => {
                tracing::warn!(path = ?err.path(), "skipping entry: {err}");
            }
            Err(err) => return Err(io::Error::from(err)),
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ScanFilter, TypeSelection};
    use std::fs;
    use tempfile::tempdir;

    fn python_only() -> ScanOptions {
        ScanOptions::new().types(TypeSelection::default().with("Python", ".py"))
    }

    fn child_names(tree: &Tree, id: NodeId) -> Vec<String> {
        tree.node(id)
            .children()
            .iter()
            .map(|&c| tree.node(c).name().to_string())
            .collect()
    }

    #[test]
    fn test_directories_come_first() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("a.py"), "x\n").unwrap();
        fs::create_dir(root.join("z_pkg")).unwrap();
        fs::write(root.join("z_pkg/mod.py"), "x\n").unwrap();
        fs::create_dir(root.join("b_pkg")).unwrap();
        fs::write(root.join("c.py"), "x\n").unwrap();

        let tree = build(root, &python_only()).unwrap();
        assert_eq!(
            child_names(&tree, tree.root()),
            vec!["b_pkg", "z_pkg", "a.py", "c.py"]
        );
    }

    #[test]
    fn test_unselected_types_are_skipped() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("a.py"), "x\n").unwrap();
        fs::write(root.join("b.txt"), "x\n").unwrap();

        let tree = build(root, &python_only()).unwrap();
        assert_eq!(child_names(&tree, tree.root()), vec!["a.py"]);
        assert!(tree.root_node().children().iter().all(|&c| tree.node(c).is_file()));
    }

    #[test]
    fn test_excluded_directory_hides_subtree() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("build/nested/ok")).unwrap();
        fs::write(root.join("build/nested/ok/keep.py"), "x\n").unwrap();
        fs::write(root.join("main.py"), "x\n").unwrap();

        let options = python_only().filter(ScanFilter::new().exclude_dir("build").unwrap());
        let tree = build(root, &options).unwrap();

        assert_eq!(child_names(&tree, tree.root()), vec!["main.py"]);
        assert!(!tree.files().any(|f| f.name() == "keep.py"));
    }

    #[test]
    fn test_parents_point_at_producing_directory() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("pkg/sub")).unwrap();
        fs::write(root.join("pkg/sub/x.py"), "x\n").unwrap();

        let tree = build(root, &python_only()).unwrap();
        for (id, _) in tree.walk() {
            let node = tree.node(id);
            match tree.parent(id) {
                Some(parent) => assert_eq!(Some(tree.node(parent).path()), node.path().parent()),
                None => assert_eq!(id, tree.root()),
            }
        }
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp = tempdir().unwrap();
        let result = build(temp.path().join("gone"), &python_only());
        assert!(matches!(result, Err(CodeCountError::DirectoryList { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_is_skipped() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("pkg")).unwrap();
        fs::write(root.join("pkg/a.py"), "x\n").unwrap();
        std::os::unix::fs::symlink(root, root.join("pkg/back")).unwrap();

        let tree = build(root, &python_only()).unwrap();
        let pkg = tree.child(tree.root(), 0).unwrap();
        assert_eq!(child_names(&tree, pkg), vec!["a.py"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_ignored_without_follow() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("real.py"), "x\n").unwrap();
        std::os::unix::fs::symlink(root.join("real.py"), root.join("link.py")).unwrap();

        let followed = build(root, &python_only()).unwrap();
        assert_eq!(child_names(&followed, followed.root()), vec!["link.py", "real.py"]);

        let options = python_only().follow_links(false);
        let tree = build(root, &options).unwrap();
        assert_eq!(child_names(&tree, tree.root()), vec!["real.py"]);
    }
}
