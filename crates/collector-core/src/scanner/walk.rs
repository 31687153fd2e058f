use crate::error::Error;
use std::ffi::OsStr;
use std::fs::{self, FileType};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Kind of a visited node, as reported by `lstat`. Symlinks are never
/// resolved, so a link to a directory is reported as `Symlink`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
    Symlink,
    Other,
}

impl From<FileType> for NodeKind {
    fn from(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            NodeKind::Symlink
        } else if file_type.is_dir() {
            NodeKind::Directory
        } else if file_type.is_file() {
            NodeKind::File
        } else {
            NodeKind::Other
        }
    }
}

/// A node discovered during traversal. Only lives for the duration of a
/// single `Visitor::visit` call.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    pub kind: NodeKind,
}

impl DirectoryEntry {
    /// Directory containing this node.
    pub fn parent(&self) -> &Path {
        self.path.parent().unwrap_or(&self.path)
    }

    pub fn name(&self) -> &OsStr {
        self.path.file_name().unwrap_or_else(|| OsStr::new(""))
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }
}

/// Callback invoked for every node below the walk root. Returning `true`
/// counts the node as a match.
pub trait Visitor {
    fn visit(&mut self, entry: &DirectoryEntry) -> bool;
}

impl<F> Visitor for F
where
    F: FnMut(&DirectoryEntry) -> bool,
{
    fn visit(&mut self, entry: &DirectoryEntry) -> bool {
        self(entry)
    }
}

/// Depth-first walk of everything below `root`, calling `visitor` for each
/// node. A directory is visited before its children. Listing order is
/// whatever the filesystem returns.
///
/// Fails only when the root itself cannot be read; unreadable descendants are
/// logged and skipped. Returns the number of nodes the visitor matched.
pub fn walk<V>(root: &Path, visitor: &mut V) -> Result<usize, Error>
where
    V: Visitor + ?Sized,
{
    fs::read_dir(root).map_err(|source| Error::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut matches = 0usize;

    for entry_result in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                debug!("Skipping unreadable entry: {}", err);
                continue;
            }
        };

        let kind = NodeKind::from(entry.file_type());
        let node = DirectoryEntry {
            path: entry.into_path(),
            kind,
        };

        if visitor.visit(&node) {
            trace!("Matched {}", node.path.display());
            matches += 1;
        }
    }

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    /// Layout:
    ///   root/
    ///     a.txt
    ///     sub/
    ///       b.txt
    ///       deeper/
    ///         c.txt
    fn create_tree(root: &Path) {
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("sub/b.txt"), "b").unwrap();
        fs::write(root.join("sub/deeper/c.txt"), "c").unwrap();
    }

    #[test]
    fn test_walk_counts_matches() {
        let tmp = tempdir().unwrap();
        create_tree(tmp.path());

        let mut visited = 0;
        let matches = walk(tmp.path(), &mut |entry: &DirectoryEntry| {
            visited += 1;
            entry.is_file()
        })
        .unwrap();

        assert_eq!(matches, 3);
        // 3 files + 2 directories, root excluded
        assert_eq!(visited, 5);
    }

    #[test]
    fn test_directory_visited_before_children() {
        let tmp = tempdir().unwrap();
        create_tree(tmp.path());

        let mut order: HashMap<PathBuf, usize> = HashMap::new();
        walk(tmp.path(), &mut |entry: &DirectoryEntry| {
            let next = order.len();
            order.insert(entry.path.clone(), next);
            false
        })
        .unwrap();

        let sub = order[&tmp.path().join("sub")];
        let deeper = order[&tmp.path().join("sub/deeper")];
        assert!(sub < order[&tmp.path().join("sub/b.txt")]);
        assert!(sub < deeper);
        assert!(deeper < order[&tmp.path().join("sub/deeper/c.txt")]);
    }

    #[test]
    fn test_entry_parent_and_name() {
        let tmp = tempdir().unwrap();
        create_tree(tmp.path());

        let mut seen = Vec::new();
        walk(tmp.path(), &mut |entry: &DirectoryEntry| {
            if entry.name() == "c.txt" {
                seen.push(entry.parent().to_path_buf());
            }
            false
        })
        .unwrap();

        assert_eq!(seen, vec![tmp.path().join("sub/deeper")]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("nope");
        let result = walk(&missing, &mut |_: &DirectoryEntry| true);
        assert!(matches!(result, Err(Error::RootUnreadable { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed() {
        let tmp = tempdir().unwrap();
        create_tree(tmp.path());
        std::os::unix::fs::symlink(tmp.path().join("sub"), tmp.path().join("link")).unwrap();

        let mut kinds: HashMap<PathBuf, NodeKind> = HashMap::new();
        walk(tmp.path(), &mut |entry: &DirectoryEntry| {
            kinds.insert(entry.path.clone(), entry.kind);
            false
        })
        .unwrap();

        assert_eq!(kinds[&tmp.path().join("link")], NodeKind::Symlink);
        assert!(!kinds.contains_key(&tmp.path().join("link/b.txt")));
        assert_eq!(kinds.len(), 6);
    }
}
