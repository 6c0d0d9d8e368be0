//! # Namespace Service
//!
//! This service keeps a per-user hierarchical namespace on top of the block
//! store.
//!
//! ## Components
//!
//! - `UserRegistry`: user directories, the root block, the block ID counter
//! - `User`: the loaded arena of a user's blocks, addressed only by ID
//! - `EntryManager`: create/rename/delete folders and files inside a block
//! - `NamespaceService`: dispatches operations against an explicit `Session`
//!
//! ## Write ordering
//!
//! There are no multi-file transactions. Every mutation is ordered so a crash
//! between two steps leaves an orphan (a block or blob nothing points at)
//! rather than an index entry pointing at something that is gone:
//!
//! - creation writes the physical block or blob before the index that links it
//! - deletion rewrites the index without the entry before removing anything
//!
//! Each mutation is staged on a copy of the block and committed to the
//! in-memory arena only once the index has been written.

pub mod config;
pub mod entries;
pub mod operations;
pub mod registry;
pub mod service;
pub mod session;

pub use config::NamespaceConfig;
pub use entries::EntryManager;
pub use operations::{ErrorKind, NamespaceError, NamespaceOperations};
pub use registry::{User, UserIndex, UserRegistry, USER_INDEX_FILE};
pub use service::NamespaceService;
pub use session::Session;
