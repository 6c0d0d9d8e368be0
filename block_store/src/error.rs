//! Block store errors

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in the block store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Block, index, or blob is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Target already exists on disk
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Caller asked for something that cannot be done
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Index exists but does not hold a valid structure
    #[error("Corrupt index {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// Underlying filesystem operation failed
    #[error("I/O failure while {op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn corrupt(path: &Path, reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Returns true for [`StoreError::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
