//! File-based locking so that two hostsmate processes never rewrite the
//! hosts file or the config at the same time.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::error::{HostsError, Result};

/// Holds an exclusive advisory lock until dropped.
#[derive(Debug)]
pub struct LockGuard {
    _file: File,
    path: PathBuf,
}

impl LockGuard {
    /// Acquire the lock that belongs to a config file (`config.lock` next to it).
    pub fn acquire_for(config_path: &Path) -> Result<Self> {
        Self::acquire_at(config_path.with_extension("lock"))
    }

    /// Acquire an exclusive lock on `path` without blocking.
    ///
    /// Fails with [`HostsError::Locked`] if another process holds it.
    pub fn acquire_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| HostsError::file_io(parent, e))?;
        }

        // create+read+write without truncation: no window between create and lock
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| HostsError::file_io(path, e))?;

        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| HostsError::file_io(path, e))?;

        file.try_lock_exclusive()
            .map_err(|_| HostsError::Locked(path.to_path_buf()))?;

        Ok(Self {
            _file: file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// Released when the file is closed on drop
