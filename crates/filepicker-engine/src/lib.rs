pub mod filter;
pub mod fs;
pub mod io;
pub mod models;
pub mod platform;
pub mod storage;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use filter::{AcceptAll, EntryFilter, ExtensionFilter};
pub use fs::{FileSystem, OsFileSystem};
pub use io::*;
pub use models::{DirectoryEntry, PARENT_ORDER};
pub use platform::{
    PermissionContext, StoragePermissionStatus, check_storage_permission, has_storage_read_access,
    request_storage_permission,
};
pub use storage::{find_external_storage_root, find_external_storage_root_in};
