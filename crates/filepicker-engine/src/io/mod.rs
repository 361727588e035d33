use crate::filter::{AcceptAll, EntryFilter};
use crate::fs::{FileSystem, OsFileSystem};
use crate::models::DirectoryEntry;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("Failed to list directory {path}: {source}")]
    ListFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Turns the children of a directory into sorted picker rows.
#[derive(Debug, Default, Clone)]
pub struct DirectoryLister<F = OsFileSystem> {
    fs: F,
}

impl DirectoryLister<OsFileSystem> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: FileSystem> DirectoryLister<F> {
    pub fn with_file_system(fs: F) -> Self {
        Self { fs }
    }

    /// Append a row for every readable child of `directory` accepted by
    /// `filter`, then sort all of `entries`, including rows that were
    /// already there.
    ///
    /// Returns how many rows were added. When the directory cannot be
    /// enumerated `entries` is left exactly as it was passed in.
    pub fn list_into(
        &self,
        entries: &mut Vec<DirectoryEntry>,
        directory: &Path,
        filter: &dyn EntryFilter,
        group_order: i32,
    ) -> Result<usize, ListError> {
        let directory = absolute(directory);
        let children = self.fs.list_children(&directory).map_err(|source| {
            log::warn!("Failed to list {}: {source}", directory.display());
            ListError::ListFailed {
                path: directory.clone(),
                source,
            }
        })?;

        let before = entries.len();
        for raw_name in children {
            // The path keeps the raw name; only the display name is lossy
            let path = directory.join(&raw_name);
            let name = raw_name.to_string_lossy().into_owned();
            let is_dir = self.fs.is_dir(&path);
            if !filter.accept(&directory, &name, is_dir) || !self.fs.can_read(&path) {
                continue;
            }
            let last_modified = self.fs.last_modified(&path);
            let entry = DirectoryEntry::new(name, is_dir, path, last_modified);
            entries.push(entry.with_order(group_order));
        }
        entries.sort();

        let added = entries.len() - before;
        log::debug!("Listed {added} entries in {}", directory.display());
        Ok(added)
    }

    /// List `directory` on its own with the default group order
    pub fn list(
        &self,
        directory: &Path,
        filter: &dyn EntryFilter,
    ) -> Result<Vec<DirectoryEntry>, ListError> {
        let mut entries = Vec::new();
        self.list_into(&mut entries, directory, filter, 0)?;
        Ok(entries)
    }

    /// Listing that never fails: when the directory cannot be enumerated the
    /// error is logged and an empty vector comes back, dropping the rows the
    /// caller passed in as well.
    pub fn list_or_empty(
        &self,
        mut entries: Vec<DirectoryEntry>,
        directory: &Path,
        filter: &dyn EntryFilter,
        group_order: Option<i32>,
    ) -> Vec<DirectoryEntry> {
        match self.list_into(&mut entries, directory, filter, group_order.unwrap_or(0)) {
            Ok(_) => entries,
            Err(e) => {
                log::error!("{e}");
                Vec::new()
            }
        }
    }

    /// The ".." row for `directory`, carrying the parent's modification time
    pub fn parent_entry(&self, directory: &Path) -> Option<DirectoryEntry> {
        let mut parent = DirectoryEntry::parent_of(&absolute(directory))?;
        parent.last_modified = self.fs.last_modified(&parent.path);
        Some(parent)
    }

    /// Rows for a picker screen: the ".." row (when there is a parent)
    /// followed by the children of `directory` accepted by `filter`
    pub fn list_with_parent(
        &self,
        directory: &Path,
        filter: &dyn EntryFilter,
    ) -> Result<Vec<DirectoryEntry>, ListError> {
        let mut entries: Vec<_> = self.parent_entry(directory).into_iter().collect();
        self.list_into(&mut entries, directory, filter, 0)?;
        Ok(entries)
    }
}

/// List `directory` on the OS file system, accepting every child
pub fn list_directory(directory: &Path) -> Result<Vec<DirectoryEntry>, ListError> {
    DirectoryLister::new().list(directory, &AcceptAll)
}

pub fn validate_directory(path: &Path) -> Result<(), ListError> {
    if !path.is_dir() {
        return Err(ListError::NotADirectory(path.to_path_buf()));
    }

    Ok(())
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
