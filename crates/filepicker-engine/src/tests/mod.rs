use crate::fs::FileSystem;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary directory for listing tests
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test file with content
pub fn create_test_file(dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}

#[derive(Debug, Clone)]
struct FakeNode {
    path: PathBuf,
    is_dir: bool,
    readable: bool,
    modified: i64,
}

/// In-memory file system keeping children in insertion order.
///
/// Lets tests model unreadable entries and directories whose enumeration
/// fails, which a real temp directory cannot do reliably when running as root.
#[derive(Debug, Default, Clone)]
pub struct FakeFileSystem {
    nodes: Vec<FakeNode>,
    unlistable: HashSet<PathBuf>,
}

impl FakeFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(mut self, path: &str, is_dir: bool, readable: bool, modified: i64) -> Self {
        self.nodes.push(FakeNode {
            path: PathBuf::from(path),
            is_dir,
            readable,
            modified,
        });
        self
    }

    pub fn dir(self, path: &str) -> Self {
        self.node(path, true, true, 0)
    }

    pub fn dir_modified(self, path: &str, modified: i64) -> Self {
        self.node(path, true, true, modified)
    }

    pub fn file(self, path: &str, modified: i64) -> Self {
        self.node(path, false, true, modified)
    }

    pub fn unreadable_file(self, path: &str) -> Self {
        self.node(path, false, false, 0)
    }

    pub fn unreadable_dir(self, path: &str) -> Self {
        self.node(path, true, false, 0)
    }

    /// Make enumerating `path` fail
    pub fn unlistable(mut self, path: &str) -> Self {
        self.unlistable.insert(PathBuf::from(path));
        self
    }

    fn find(&self, path: &Path) -> Option<&FakeNode> {
        self.nodes.iter().find(|node| node.path == path)
    }
}

impl FileSystem for FakeFileSystem {
    fn list_children(&self, dir: &Path) -> io::Result<Vec<OsString>> {
        if self.unlistable.contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "listing refused",
            ));
        }
        match self.find(dir) {
            Some(node) if node.is_dir => {}
            Some(_) => {
                return Err(io::Error::other("not a directory"));
            }
            None => return Err(io::Error::from(io::ErrorKind::NotFound)),
        }

        Ok(self
            .nodes
            .iter()
            .filter(|node| node.path.parent() == Some(dir))
            .filter_map(|node| node.path.file_name())
            .map(|name| name.to_os_string())
            .collect())
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.find(path).is_some_and(|node| node.is_dir)
    }

    fn can_read(&self, path: &Path) -> bool {
        self.find(path).is_some_and(|node| node.readable)
    }

    fn last_modified(&self, path: &Path) -> i64 {
        self.find(path).map_or(0, |node| node.modified)
    }
}
