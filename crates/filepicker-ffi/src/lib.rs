//! UniFFI bindings for filepicker mobile apps
//!
//! Exposes directory listing, storage discovery and the storage permission
//! check to the Kotlin side of an Android app.

use filepicker_engine::{
    AcceptAll, DirectoryEntry, DirectoryLister, EntryFilter, ExtensionFilter,
    StoragePermissionStatus,
};
use std::path::Path;

uniffi::setup_scaffolding!();

// ============ Errors ============

/// Errors that can cross the FFI boundary
/// Note: Field is named `reason` not `message` to avoid conflict with Throwable.message in Kotlin
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiError {
    #[error("Listing error: {reason}")]
    ListError { reason: String },
}

// ============ DTOs ============

/// One row of the picker list.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct DirectoryEntryDto {
    pub name: String,
    pub is_directory: bool,
    /// Absolute path of the file or directory
    pub path: String,
    /// Milliseconds since the Unix epoch, 0 when unknown
    pub last_modified: i64,
    /// Group order; the ".." row uses -1
    pub order: i32,
}

impl DirectoryEntryDto {
    fn from_engine(entry: DirectoryEntry) -> Self {
        Self {
            name: entry.name,
            is_directory: entry.is_directory,
            path: entry.path.to_string_lossy().into_owned(),
            last_modified: entry.last_modified,
            order: entry.order,
        }
    }
}

// ============ Standalone Functions ============

/// List the rows of a picker screen for `path`.
///
/// With `directories_only` every file is hidden, otherwise files are limited
/// to `extensions` when given. `include_parent` prepends the ".." row.
#[uniffi::export]
pub fn list_directory(
    path: String,
    extensions: Option<Vec<String>>,
    directories_only: bool,
    include_parent: bool,
) -> Result<Vec<DirectoryEntryDto>, FfiError> {
    let filter: Box<dyn EntryFilter> = match (directories_only, extensions) {
        (true, _) => Box::new(ExtensionFilter::directories_only()),
        (false, Some(extensions)) => Box::new(ExtensionFilter::new(extensions)),
        (false, None) => Box::new(AcceptAll),
    };

    let lister = DirectoryLister::new();
    let directory = Path::new(&path);
    let listed = if include_parent {
        lister.list_with_parent(directory, filter.as_ref())
    } else {
        lister.list(directory, filter.as_ref())
    };
    let entries = listed.map_err(|e| FfiError::ListError {
        reason: e.to_string(),
    })?;

    Ok(entries
        .into_iter()
        .map(DirectoryEntryDto::from_engine)
        .collect())
}

/// Path of a mounted removable storage volume, if any.
#[uniffi::export]
pub fn find_external_storage_root() -> Option<String> {
    filepicker_engine::find_external_storage_root().map(|path| path.to_string_lossy().into_owned())
}

/// Whether the app may currently read shared storage.
#[uniffi::export]
pub fn has_storage_read_access() -> bool {
    filepicker_engine::check_storage_permission() == StoragePermissionStatus::Granted
}

/// Route engine logs to logcat (Android) or stderr. Safe to call more than once.
#[uniffi::export]
pub fn init_logging() {
    #[cfg(target_os = "android")]
    {
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Debug)
                .with_tag("FilePicker"),
        );
    }

    #[cfg(not(target_os = "android"))]
    {
        let _ = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .try_init();
    }
}
