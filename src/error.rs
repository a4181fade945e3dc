//! Error types for hostsmate.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch {url}: {reason}")]
    SourceFetch { url: String, reason: String },

    #[error("File system error on {path:?}: {source}")]
    FileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("Command failed: {0}")]
    Command(String),

    #[error("None of the {0} blacklist sources could be fetched")]
    AllSourcesFailed(usize),

    #[error("Another instance of hostsmate is already running (lock file: {0:?})")]
    Locked(PathBuf),
}

impl HostsError {
    /// Wrap an I/O error together with the path it happened on.
    pub fn file_io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::FileIo {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, HostsError>;
