//! # Namespace View
//!
//! This crate provides the hierarchical view over a user's blocks.
//!
//! ## Design
//!
//! - Paths are relative to a starting block and separated by `/`
//! - `.` stays in place, `..` follows `parent_node_id`
//! - Resolution is purely functional: it reads blocks through a lookup
//!   closure and never touches disk or mutates anything
//! - Listing renders folders with a trailing separator

pub mod listing;
pub mod path;

pub use listing::{display_name, display_names, ListOptions, SortField, SortOrder};
pub use path::{PathError, PathResolver, CURRENT_DIR, PARENT_DIR, SEPARATOR};
