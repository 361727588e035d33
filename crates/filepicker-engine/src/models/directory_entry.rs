use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Group order stamped on the synthetic parent-directory row so it sorts
/// above everything produced by a listing with the default order.
pub const PARENT_ORDER: i32 = -1;

/// Display name of the synthetic parent-directory row
pub const PARENT_NAME: &str = "..";

/// A single row of a picker screen: one file or directory.
///
/// Rows sort by `order`, then directories before files, then by
/// case-sensitive `name`. `path` and `last_modified` only break ties that a
/// single listing cannot produce, which keeps `Ord` consistent with `Eq`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_directory: bool,
    pub path: PathBuf,
    /// Milliseconds since the Unix epoch, `0` when unknown
    pub last_modified: i64,
    pub order: i32,
}

impl DirectoryEntry {
    pub fn new(name: String, is_directory: bool, path: PathBuf, last_modified: i64) -> Self {
        Self {
            name,
            is_directory,
            path,
            last_modified,
            order: 0,
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Build the ".." row pointing at the parent of `dir`.
    ///
    /// Returns `None` when `dir` has no parent (the file system root).
    pub fn parent_of(dir: &Path) -> Option<Self> {
        let parent = dir.parent()?;
        Some(
            Self::new(PARENT_NAME.to_string(), true, parent.to_path_buf(), 0)
                .with_order(PARENT_ORDER),
        )
    }

    pub fn is_parent_row(&self) -> bool {
        self.is_directory && self.order == PARENT_ORDER && self.name == PARENT_NAME
    }
}

impl Ord for DirectoryEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order
            .cmp(&other.order)
            // Directories come before files
            .then_with(|| other.is_directory.cmp(&self.is_directory))
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.path.cmp(&other.path))
            .then_with(|| self.last_modified.cmp(&other.last_modified))
    }
}

impl PartialOrd for DirectoryEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
