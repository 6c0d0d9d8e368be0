//! Path resolution logic
//!
//! This module handles splitting paths and walking them through the block graph.

use block_store::{Block, BlockId};
use thiserror::Error;

/// Path separator
pub const SEPARATOR: char = '/';

/// Segment that stays on the current block
pub const CURRENT_DIR: &str = ".";

/// Segment that moves to the parent block
pub const PARENT_DIR: &str = "..";

/// Errors that can occur during path resolution
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// Path component not found during traversal
    #[error("Not found: {0}")]
    NotFound(String),

    /// Attempted to traverse through a file
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// A referenced block is missing from the loaded blocks
    #[error("Inconsistent namespace: {0}")]
    Inconsistent(String),
}

/// Path resolver
pub struct PathResolver;

impl PathResolver {
    /// Splits a path into segments
    ///
    /// Empty segments are dropped, so an empty path (or one made only of
    /// separators) has no segments at all.
    ///
    /// # Examples
    ///
    /// ```
    /// use namespace_view::PathResolver;
    ///
    /// assert_eq!(PathResolver::split_path("docs/../notes"), vec!["docs", "..", "notes"]);
    /// assert_eq!(PathResolver::split_path("docs//notes/"), vec!["docs", "notes"]);
    /// assert!(PathResolver::split_path("").is_empty());
    /// ```
    pub fn split_path(path: &str) -> Vec<&str> {
        path.trim()
            .split(SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    /// Validates a single entry name
    ///
    /// Returns true if the name can be used for a folder, a file, or a user.
    /// Surrounding whitespace is rejected since paths are trimmed before they
    /// are split.
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name.trim() == name
            && name != CURRENT_DIR
            && name != PARENT_DIR
            && !name.contains(SEPARATOR)
            && !name.contains('\0')
    }

    /// Walks `segments` starting at `start`
    ///
    /// `lookup` fetches blocks by ID. Resolution stops at the first failing
    /// segment; nothing is written either way.
    pub fn resolve<'a, F>(
        start: &'a Block,
        segments: &[&str],
        lookup: F,
    ) -> Result<&'a Block, PathError>
    where
        F: Fn(BlockId) -> Option<&'a Block>,
    {
        let mut current = start;

        for (index, segment) in segments.iter().enumerate() {
            let target = match *segment {
                CURRENT_DIR => continue,
                PARENT_DIR => current.parent_node_id,
                name => {
                    let header = current
                        .get_entry(name)
                        .ok_or_else(|| PathError::NotFound(Self::walked(segments, index)))?;
                    header
                        .child_block_id()
                        .ok_or_else(|| PathError::NotADirectory(Self::walked(segments, index)))?
                }
            };

            // ".." on the root
            if target == current.node_id {
                continue;
            }

            current = lookup(target).ok_or_else(|| {
                PathError::Inconsistent(format!(
                    "block {} reached through '{}' is not loaded",
                    target,
                    Self::walked(segments, index)
                ))
            })?;
        }

        Ok(current)
    }

    /// Splits and resolves a path in one step
    pub fn resolve_path<'a, F>(
        start: &'a Block,
        path: &str,
        lookup: F,
    ) -> Result<&'a Block, PathError>
    where
        F: Fn(BlockId) -> Option<&'a Block>,
    {
        Self::resolve(start, &Self::split_path(path), lookup)
    }

    fn walked(segments: &[&str], index: usize) -> String {
        segments[..=index].join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use block_store::{ContentId, EntryHeader};
    use chrono::Utc;
    use std::collections::BTreeMap;

    /// root(0) -> docs(1) -> notes(2), plus root/readme.txt
    fn sample_tree() -> BTreeMap<BlockId, Block> {
        let now = Utc::now();
        let mut root = Block::root();
        root.insert_entry(EntryHeader::directory("docs", "", BlockId::new(1), now));
        root.insert_entry(EntryHeader::file(
            "readme.txt",
            "",
            ContentId::generate(),
            now,
        ));

        let mut docs = Block::new(BlockId::new(1), BlockId::ROOT);
        docs.insert_entry(EntryHeader::directory("notes", "", BlockId::new(2), now));

        let notes = Block::new(BlockId::new(2), BlockId::new(1));

        let mut blocks = BTreeMap::new();
        blocks.insert(root.node_id, root);
        blocks.insert(docs.node_id, docs);
        blocks.insert(notes.node_id, notes);
        blocks
    }

    fn resolve_from<'a>(
        blocks: &'a BTreeMap<BlockId, Block>,
        start: u64,
        path: &str,
    ) -> Result<&'a Block, PathError> {
        let start = &blocks[&BlockId::new(start)];
        PathResolver::resolve_path(start, path, |id| blocks.get(&id))
    }

    #[test]
    fn test_split_simple_path() {
        assert_eq!(PathResolver::split_path("docs"), vec!["docs"]);
        assert_eq!(PathResolver::split_path("docs/notes"), vec!["docs", "notes"]);
    }

    #[test]
    fn test_split_path_ignores_empty_segments() {
        assert_eq!(PathResolver::split_path("/docs/"), vec!["docs"]);
        assert_eq!(PathResolver::split_path("  docs//notes "), vec!["docs", "notes"]);
        assert!(PathResolver::split_path("///").is_empty());
    }

    #[test]
    fn test_is_valid_name() {
        assert!(PathResolver::is_valid_name("notes.txt"));
        assert!(PathResolver::is_valid_name("my-folder"));
        assert!(PathResolver::is_valid_name(".hidden"));

        assert!(!PathResolver::is_valid_name(""));
        assert!(!PathResolver::is_valid_name("."));
        assert!(!PathResolver::is_valid_name(".."));
        assert!(!PathResolver::is_valid_name("a/b"));
        assert!(!PathResolver::is_valid_name("a\0b"));
    }

    #[test]
    fn test_is_valid_name_rejects_surrounding_whitespace() {
        assert!(PathResolver::is_valid_name("my notes"));

        assert!(!PathResolver::is_valid_name(" "));
        assert!(!PathResolver::is_valid_name("\t"));
        assert!(!PathResolver::is_valid_name(" docs"));
        assert!(!PathResolver::is_valid_name("docs "));
    }

    #[test]
    fn test_empty_path_is_identity() {
        let blocks = sample_tree();
        assert_eq!(resolve_from(&blocks, 1, "").unwrap().node_id, BlockId::new(1));
        assert_eq!(resolve_from(&blocks, 1, "/").unwrap().node_id, BlockId::new(1));
    }

    #[test]
    fn test_dot_is_identity() {
        let blocks = sample_tree();
        for id in blocks.keys() {
            let resolved = resolve_from(&blocks, id.as_u64(), ".").unwrap();
            assert_eq!(resolved.node_id, *id);
        }
    }

    #[test]
    fn test_resolve_nested_path() {
        let blocks = sample_tree();
        let resolved = resolve_from(&blocks, 0, "docs/notes").unwrap();
        assert_eq!(resolved.node_id, BlockId::new(2));
    }

    #[test]
    fn test_resolve_parent_steps() {
        let blocks = sample_tree();
        assert_eq!(resolve_from(&blocks, 2, "..").unwrap().node_id, BlockId::new(1));
        assert_eq!(resolve_from(&blocks, 2, "../..").unwrap().node_id, BlockId::ROOT);
        assert_eq!(
            resolve_from(&blocks, 0, "docs/../docs/./notes").unwrap().node_id,
            BlockId::new(2)
        );
    }

    #[test]
    fn test_parent_of_root_stays_at_root() {
        let blocks = sample_tree();
        assert_eq!(resolve_from(&blocks, 0, "..").unwrap().node_id, BlockId::ROOT);
        assert_eq!(resolve_from(&blocks, 0, "../../..").unwrap().node_id, BlockId::ROOT);
    }

    #[test]
    fn test_resolve_missing_segment() {
        let blocks = sample_tree();
        let result = resolve_from(&blocks, 0, "docs/missing/deeper");
        assert_eq!(result, Err(PathError::NotFound("docs/missing".to_string())));
    }

    #[test]
    fn test_resolve_through_file() {
        let blocks = sample_tree();
        let result = resolve_from(&blocks, 0, "readme.txt");
        assert_eq!(result, Err(PathError::NotADirectory("readme.txt".to_string())));
    }

    #[test]
    fn test_resolve_unloaded_block() {
        let mut blocks = sample_tree();
        blocks.remove(&BlockId::new(2));

        let result = resolve_from(&blocks, 0, "docs/notes");
        assert!(matches!(result, Err(PathError::Inconsistent(_))));
    }
}
