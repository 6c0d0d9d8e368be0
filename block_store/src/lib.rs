//! # Block Store
//!
//! This crate defines the flat, numerically addressed storage underneath a
//! user's virtual namespace.
//!
//! ## Design
//!
//! - **BlockId**: A block is addressed by a number, never by a path
//! - **Block**: One directory level; a physical directory plus one JSON index
//! - **EntryHeader**: Metadata for a named folder or file inside a block
//! - **ContentId**: Random address of the blob backing a file entry
//!
//! ## On-disk layout
//!
//! ```text
//! <user_dir>/<block_id>/.blockIndex     block index (JSON)
//! <user_dir>/<block_id>/<content_id>    one blob per file entry
//! ```
//!
//! Blocks are stored flat under the user directory. The hierarchy only
//! exists in the indices, through `parent_node_id` and directory entries.

pub mod block;
pub mod entry;
pub mod error;
pub mod store;

pub use block::{Block, BlockId};
pub use entry::{ContentId, EntryHeader, EntryKind};
pub use error::StoreError;
pub use store::{write_atomic, BlockStore, BLOCK_INDEX_FILE};
