//! File system access used by the lister and the storage scan.
//!
//! Everything the engine asks of the disk goes through [`FileSystem`] so
//! listings can be exercised against an in-memory tree in tests.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;

pub trait FileSystem {
    /// Base names of the children of `dir`, in enumeration order.
    ///
    /// Names are returned as the OS reports them so paths rebuilt from them
    /// point at the same child even when the name is not valid UTF-8. An
    /// error means the directory could not be enumerated at all.
    fn list_children(&self, dir: &Path) -> io::Result<Vec<OsString>>;

    /// Whether `path` is a directory, following symlinks
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether the current process may read `path`
    fn can_read(&self, path: &Path) -> bool;

    /// Last modification time in milliseconds since the Unix epoch, `0` when unknown
    fn last_modified(&self, path: &Path) -> i64;
}

/// [`FileSystem`] backed by the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn list_children(&self, dir: &Path) -> io::Result<Vec<OsString>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            names.push(entry?.file_name());
        }
        Ok(names)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    #[cfg(unix)]
    fn can_read(&self, path: &Path) -> bool {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
            return false;
        };
        // SAFETY: `c_path` is a valid NUL-terminated string that outlives the call
        unsafe { libc::access(c_path.as_ptr(), libc::R_OK) == 0 }
    }

    #[cfg(not(unix))]
    fn can_read(&self, path: &Path) -> bool {
        if path.is_dir() {
            fs::read_dir(path).is_ok()
        } else {
            fs::File::open(path).is_ok()
        }
    }

    fn last_modified(&self, path: &Path) -> i64 {
        fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .ok()
            .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
            .and_then(|elapsed| i64::try_from(elapsed.as_millis()).ok())
            .unwrap_or(0)
    }
}
