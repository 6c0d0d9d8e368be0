//! Namespace operations
//!
//! This module defines the operations provided by the namespace service and
//! the errors they report.

use crate::session::Session;
use block_store::{EntryHeader, StoreError};
use namespace_view::{ListOptions, PathError};
use thiserror::Error;

/// Coarse classification of a [`NamespaceError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    InvalidArgument,
    NotADirectory,
    NotAFile,
    Inconsistent,
    Corrupt,
    IoFailure,
    PreconditionFailed,
}

/// Errors that can occur during namespace operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamespaceError {
    /// User, block, path segment, or entry absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// User or entry name collision
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Malformed name or argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Expected a folder, found a file
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// Expected a file, found a folder
    #[error("Not a file: {0}")]
    NotAFile(String),

    /// In-memory blocks and disk disagree
    #[error("Inconsistent namespace: {0}")]
    Inconsistent(String),

    /// An index could not be parsed
    #[error("Corrupt index: {0}")]
    Corrupt(String),

    /// Underlying filesystem operation failed
    #[error("I/O failure: {0}")]
    Io(String),

    /// No user selected
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),
}

impl NamespaceError {
    /// Returns the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            NamespaceError::NotFound(_) => ErrorKind::NotFound,
            NamespaceError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            NamespaceError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            NamespaceError::NotADirectory(_) => ErrorKind::NotADirectory,
            NamespaceError::NotAFile(_) => ErrorKind::NotAFile,
            NamespaceError::Inconsistent(_) => ErrorKind::Inconsistent,
            NamespaceError::Corrupt(_) => ErrorKind::Corrupt,
            NamespaceError::Io(_) => ErrorKind::IoFailure,
            NamespaceError::PreconditionFailed(_) => ErrorKind::PreconditionFailed,
        }
    }

    pub(crate) fn no_user() -> Self {
        NamespaceError::PreconditionFailed("no user selected, run `use <name>` first".to_string())
    }
}

impl From<StoreError> for NamespaceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => NamespaceError::NotFound(msg),
            StoreError::AlreadyExists(msg) => NamespaceError::AlreadyExists(msg),
            StoreError::InvalidArgument(msg) => NamespaceError::InvalidArgument(msg),
            err @ StoreError::Corrupt { .. } => NamespaceError::Corrupt(err.to_string()),
            err @ StoreError::Io { .. } => NamespaceError::Io(err.to_string()),
        }
    }
}

impl From<PathError> for NamespaceError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::NotFound(msg) => NamespaceError::NotFound(msg),
            PathError::NotADirectory(msg) => NamespaceError::NotADirectory(msg),
            PathError::Inconsistent(msg) => NamespaceError::Inconsistent(msg),
        }
    }
}

/// Namespace operations trait
///
/// Every operation takes the caller's [`Session`] explicitly. Operations that
/// move the caller return the new session; on error the caller keeps the old
/// one, so a failed operation never changes where the caller is.
pub trait NamespaceOperations {
    /// Creates a user and selects it at its root
    fn register(&mut self, name: &str) -> Result<Session, NamespaceError>;

    /// Selects an existing user at its root
    fn use_user(&mut self, name: &str) -> Result<Session, NamespaceError>;

    /// Deletes a user and everything it owns
    ///
    /// Returns `Session::NoUser` if the deleted user was the selected one.
    fn delete_user(&mut self, session: &Session, name: &str) -> Result<Session, NamespaceError>;

    /// Moves to the block at `path`, relative to the current block
    fn change_folder(&self, session: &Session, path: &str) -> Result<Session, NamespaceError>;

    /// Lists the display names of the block at `path`
    fn list(
        &self,
        session: &Session,
        path: &str,
        options: ListOptions,
    ) -> Result<Vec<String>, NamespaceError>;

    /// Creates a folder in the current block
    fn create_folder(
        &mut self,
        session: &Session,
        name: &str,
        description: &str,
    ) -> Result<EntryHeader, NamespaceError>;

    /// Deletes a folder and its whole subtree from the current block
    fn delete_folder(&mut self, session: &Session, name: &str)
        -> Result<EntryHeader, NamespaceError>;

    /// Renames a folder in the current block
    fn rename_folder(
        &mut self,
        session: &Session,
        old_name: &str,
        new_name: &str,
    ) -> Result<EntryHeader, NamespaceError>;

    /// Creates an empty file in the current block
    fn create_file(
        &mut self,
        session: &Session,
        name: &str,
        description: &str,
    ) -> Result<EntryHeader, NamespaceError>;

    /// Deletes a file from the current block
    fn delete_file(&mut self, session: &Session, name: &str) -> Result<EntryHeader, NamespaceError>;

    /// Renames a file and replaces its description
    fn rename_file(
        &mut self,
        session: &Session,
        old_name: &str,
        new_name: &str,
        description: &str,
    ) -> Result<EntryHeader, NamespaceError>;

    /// Replaces a file's description
    fn update_file(
        &mut self,
        session: &Session,
        name: &str,
        description: &str,
    ) -> Result<EntryHeader, NamespaceError>;

    /// Reads a file's header from its blob
    fn file_info(&self, session: &Session, name: &str) -> Result<EntryHeader, NamespaceError>;

    /// Absolute path of the current block, e.g. `/docs/notes`
    fn current_path(&self, session: &Session) -> Result<String, NamespaceError>;
}
