//! Entry headers and content addresses

use crate::block::BlockId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// Length of a content address in hex characters
const CONTENT_ID_LEN: usize = 64;

/// Random address of the blob backing a file entry
///
/// Not derived from the content; it only has to be unique inside its block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Generates a fresh random content address
    ///
    /// The address is the hex SHA-256 of 16 random bytes.
    pub fn generate() -> Self {
        let seed = Uuid::new_v4();
        let digest = Sha256::digest(seed.as_bytes());
        Self(hex::encode(digest))
    }

    /// Wraps an existing address
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this looks like an address produced by [`ContentId::generate`]
    ///
    /// Addresses read back from disk are checked with this before they are
    /// joined onto a path.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == CONTENT_ID_LEN
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What an entry is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryKind {
    /// A folder, backed by its own block
    Directory {
        /// Block holding the folder's entries
        child_block_id: BlockId,
    },
    /// A file, backed by a blob in the owning block's directory
    File {
        /// Address of the blob
        content_id: ContentId,
    },
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Directory { .. } => write!(f, "Directory"),
            EntryKind::File { .. } => write!(f, "File"),
        }
    }
}

/// Metadata record for one named item inside a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryHeader {
    /// Entry name (also its key in the block)
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Folder or file
    pub kind: EntryKind,
    /// Creation time
    pub created_time: DateTime<Utc>,
    /// Last modification time
    pub modified_time: DateTime<Utc>,
}

impl EntryHeader {
    /// Creates a folder header
    pub fn directory(
        name: impl Into<String>,
        description: impl Into<String>,
        child_block_id: BlockId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: EntryKind::Directory { child_block_id },
            created_time: now,
            modified_time: now,
        }
    }

    /// Creates a file header
    pub fn file(
        name: impl Into<String>,
        description: impl Into<String>,
        content_id: ContentId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: EntryKind::File { content_id },
            created_time: now,
            modified_time: now,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File { .. })
    }

    /// Block behind a folder entry
    pub fn child_block_id(&self) -> Option<BlockId> {
        match &self.kind {
            EntryKind::Directory { child_block_id } => Some(*child_block_id),
            EntryKind::File { .. } => None,
        }
    }

    /// Blob behind a file entry
    pub fn content_id(&self) -> Option<&ContentId> {
        match &self.kind {
            EntryKind::File { content_id } => Some(content_id),
            EntryKind::Directory { .. } => None,
        }
    }

    /// Updates the modification time
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.modified_time = now;
    }
}
