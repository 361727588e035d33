//! Discovery of storage mount points.
//!
//! Removable cards and USB drives are mounted as children of
//! [`STORAGE_MOUNT_ROOT`]. A few of those children are virtual containers
//! rather than volumes and are never offered as storage roots.

use crate::fs::{FileSystem, OsFileSystem};
use std::env;
use std::path::{Path, PathBuf};

pub const STORAGE_MOUNT_ROOT: &str = "/storage";

/// Mount-root children that hold other mounts instead of being one
pub const EXCLUDED_MOUNTS: [&str; 3] = ["emulated", "usb", "self"];

/// Primary shared storage when `EXTERNAL_STORAGE` is not set
pub const DEFAULT_INTERNAL_STORAGE: &str = "/storage/emulated/0";

const EXTERNAL_STORAGE_VAR: &str = "EXTERNAL_STORAGE";

fn is_excluded(name: &str) -> bool {
    EXCLUDED_MOUNTS
        .iter()
        .any(|excluded| excluded.eq_ignore_ascii_case(name))
}

/// First readable directory under `mount_root` that is not one of
/// [`EXCLUDED_MOUNTS`].
///
/// Children are scanned in name order so the answer does not depend on the
/// order the file system happens to enumerate them in.
pub fn find_external_storage_root_in<F: FileSystem>(fs: &F, mount_root: &Path) -> Option<PathBuf> {
    let mut children = match fs.list_children(mount_root) {
        Ok(children) => children,
        Err(e) => {
            log::debug!("Cannot enumerate {}: {e}", mount_root.display());
            return None;
        }
    };
    children.sort();

    let found = children
        .iter()
        .filter(|name| !is_excluded(&name.to_string_lossy()))
        .map(|name| mount_root.join(name))
        .find(|path| fs.is_dir(path) && fs.can_read(path));

    match &found {
        Some(path) => log::info!("Found external storage at {}", path.display()),
        None => log::debug!("No external storage under {}", mount_root.display()),
    }
    found
}

/// Best-effort lookup of a removable storage volume under `/storage`
pub fn find_external_storage_root() -> Option<PathBuf> {
    find_external_storage_root_in(&OsFileSystem, Path::new(STORAGE_MOUNT_ROOT))
}

/// Path of the SD card as advertised by the `EXTERNAL_STORAGE` variable
pub fn sd_card_path() -> Option<PathBuf> {
    env::var_os(EXTERNAL_STORAGE_VAR)
        .filter(|value| !value.to_string_lossy().trim().is_empty())
        .map(PathBuf::from)
}

pub fn internal_storage_path() -> PathBuf {
    sd_card_path().unwrap_or_else(|| PathBuf::from(DEFAULT_INTERNAL_STORAGE))
}
