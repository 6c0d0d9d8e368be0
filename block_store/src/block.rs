//! Block identifiers and the in-memory block index

use crate::entry::{EntryHeader, EntryKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Numeric identifier of a block, unique within one user
///
/// Identifiers are handed out in strictly increasing order and are never
/// reused after the block is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(u64);

impl BlockId {
    /// The namespace root of every user
    pub const ROOT: BlockId = BlockId(0);

    /// Creates a block ID from its raw number
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw number
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns true for the namespace root
    pub fn is_root(&self) -> bool {
        *self == Self::ROOT
    }

    /// Parses a physical directory name
    ///
    /// Only the canonical decimal form is accepted, so `"007"` or `"+7"`
    /// are not mistaken for block 7.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        let id: u64 = name.parse().ok()?;
        if id.to_string() == name {
            Some(Self(id))
        } else {
            None
        }
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One directory level of the namespace
///
/// This is exactly what gets serialized into a block's index file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Identifier of this block
    pub node_id: BlockId,
    /// Identifier of the parent block (the root is its own parent)
    pub parent_node_id: BlockId,
    /// Entries keyed by name
    #[serde(default)]
    pub entries: BTreeMap<String, EntryHeader>,
}

impl Block {
    /// Creates an empty block
    pub fn new(node_id: BlockId, parent_node_id: BlockId) -> Self {
        Self {
            node_id,
            parent_node_id,
            entries: BTreeMap::new(),
        }
    }

    /// Creates an empty namespace root
    pub fn root() -> Self {
        Self::new(BlockId::ROOT, BlockId::ROOT)
    }

    /// Returns true if this is the namespace root
    pub fn is_root(&self) -> bool {
        self.node_id.is_root()
    }

    /// Gets an entry by name
    pub fn get_entry(&self, name: &str) -> Option<&EntryHeader> {
        self.entries.get(name)
    }

    /// Returns true if an entry with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Inserts an entry under its own name
    ///
    /// Returns false (and leaves the block untouched) if the name is taken.
    pub fn insert_entry(&mut self, header: EntryHeader) -> bool {
        if self.entries.contains_key(&header.name) {
            return false;
        }
        self.entries.insert(header.name.clone(), header);
        true
    }

    /// Removes an entry by name
    pub fn remove_entry(&mut self, name: &str) -> Option<EntryHeader> {
        self.entries.remove(name)
    }

    /// Iterates over all entries in name order
    pub fn entries(&self) -> impl Iterator<Item = &EntryHeader> {
        self.entries.values()
    }

    /// Iterates over the blocks referenced by directory entries
    pub fn child_block_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.entries.values().filter_map(|header| header.child_block_id())
    }

    /// Finds the directory entry pointing at `child`
    pub fn entry_for_child(&self, child: BlockId) -> Option<&EntryHeader> {
        self.entries
            .values()
            .find(|header| header.child_block_id() == Some(child))
    }

    /// Counts the number of entries
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Checks the structural rules an index must satisfy
    ///
    /// Returns a description of the first violation found.
    pub fn find_inconsistency(&self) -> Option<String> {
        for (key, header) in &self.entries {
            if key != &header.name {
                return Some(format!(
                    "entry key '{}' does not match header name '{}'",
                    key, header.name
                ));
            }
            if key.is_empty() || key.contains('/') {
                return Some(format!("invalid entry name '{}'", key));
            }
            match &header.kind {
                EntryKind::File { content_id } if !content_id.is_well_formed() => {
                    return Some(format!(
                        "entry '{}' has malformed content address '{}'",
                        key, content_id
                    ));
                }
                EntryKind::Directory { child_block_id } if *child_block_id == self.node_id => {
                    return Some(format!("entry '{}' points at its own block", key));
                }
                _ => {}
            }
        }
        None
    }
}
