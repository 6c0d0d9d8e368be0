//! Entry management inside a block
//!
//! Every mutation works on a copy of the block. The copy is written to disk
//! first and only then committed to the user's arena, so a failed write leaves
//! the in-memory namespace exactly as it was.

use crate::operations::NamespaceError;
use crate::registry::User;
use block_store::{Block, BlockId, EntryHeader, StoreError};
use chrono::Utc;
use log::{debug, info, warn};
use namespace_view::{display_names, ListOptions, PathResolver};

/// Rejects names that cannot be stored as an entry or user
pub(crate) fn validate_name(what: &str, name: &str) -> Result<(), NamespaceError> {
    if PathResolver::is_valid_name(name) {
        Ok(())
    } else {
        Err(NamespaceError::InvalidArgument(format!(
            "invalid {} '{}'",
            what, name
        )))
    }
}

fn lookup<'a>(block: &'a Block, name: &str) -> Result<&'a EntryHeader, NamespaceError> {
    block.get_entry(name).ok_or_else(|| {
        NamespaceError::NotFound(format!("'{}' in block {}", name, block.node_id))
    })
}

fn lookup_folder<'a>(block: &'a Block, name: &str) -> Result<&'a EntryHeader, NamespaceError> {
    let header = lookup(block, name)?;
    if !header.is_directory() {
        return Err(NamespaceError::NotADirectory(format!("'{}' is a file", name)));
    }
    Ok(header)
}

fn lookup_file<'a>(block: &'a Block, name: &str) -> Result<&'a EntryHeader, NamespaceError> {
    let header = lookup(block, name)?;
    if !header.is_file() {
        return Err(NamespaceError::NotAFile(format!("'{}' is a folder", name)));
    }
    Ok(header)
}

fn ensure_free(block: &Block, name: &str) -> Result<(), NamespaceError> {
    if block.contains(name) {
        return Err(NamespaceError::AlreadyExists(format!(
            "'{}' in block {}",
            name, block.node_id
        )));
    }
    Ok(())
}

/// Folder and file operations on a single block of a user
pub struct EntryManager;

impl EntryManager {
    /// Lists the block at `path`, relative to `block`
    pub fn list(
        user: &User,
        block: BlockId,
        path: &str,
        options: ListOptions,
    ) -> Result<Vec<String>, NamespaceError> {
        let target = user.resolve(block, path)?;
        Ok(display_names(target, options))
    }

    /// Creates an empty folder
    ///
    /// The child block is created before the parent links it. If linking
    /// fails the child block is removed again.
    ///
    /// The user index is written last. If that write fails an error is
    /// returned even though the folder is already created and linked; the
    /// block counter is recovered from disk on the next open.
    pub fn create_folder(
        user: &mut User,
        block: BlockId,
        name: &str,
        description: &str,
    ) -> Result<EntryHeader, NamespaceError> {
        validate_name("folder name", name)?;
        let mut staged = user.require_block(block)?.clone();
        ensure_free(&staged, name)?;

        let child_id = user.allocate_block_id();
        let child = user.store().create_block(block, child_id)?;

        let header = EntryHeader::directory(name, description, child_id, Utc::now());
        staged.insert_entry(header.clone());
        if let Err(err) = user.store().save_block(&staged) {
            if let Err(cleanup) = user.store().delete_block(child_id) {
                warn!("failed to remove unlinked block {}: {}", child_id, cleanup);
            }
            return Err(err.into());
        }

        user.commit_block(staged);
        user.commit_block(child);
        user.save_index()?;

        info!(
            "user '{}': created folder '{}' (block {}) in block {}",
            user.name(),
            name,
            child_id,
            block
        );
        Ok(header)
    }

    /// Deletes a folder and every block below it
    ///
    /// The parent stops referencing the folder before any block directory is
    /// removed. Removal keeps going past failures and reports the first one.
    ///
    /// An error does not mean nothing changed: once the parent index is
    /// written the folder is gone, even if removing a block directory or
    /// writing the user index fails afterwards.
    pub fn delete_folder(
        user: &mut User,
        block: BlockId,
        name: &str,
    ) -> Result<EntryHeader, NamespaceError> {
        let parent = user.require_block(block)?;
        let header = lookup_folder(parent, name)?.clone();
        let child_id = header.child_block_id().ok_or_else(|| {
            NamespaceError::Inconsistent(format!("folder '{}' has no block", name))
        })?;
        let subtree = user.subtree_ids(child_id)?;

        let mut staged = parent.clone();
        staged.remove_entry(name);
        user.store().save_block(&staged)?;
        user.commit_block(staged);

        let mut first_error: Option<StoreError> = None;
        for id in &subtree {
            match user.store().delete_block(*id) {
                Ok(()) => {}
                Err(err) if err.is_not_found() => {
                    warn!("block {} was already gone: {}", id, err);
                }
                Err(err) => {
                    warn!("failed to remove block {}: {}", id, err);
                    first_error.get_or_insert(err);
                }
            }
        }
        user.evict(&subtree);
        user.save_index()?;

        if let Some(err) = first_error {
            return Err(err.into());
        }

        info!(
            "user '{}': deleted folder '{}' ({} blocks) from block {}",
            user.name(),
            name,
            subtree.len(),
            block
        );
        Ok(header)
    }

    /// Renames a folder
    ///
    /// Renaming to the current name succeeds without writing anything.
    pub fn rename_folder(
        user: &mut User,
        block: BlockId,
        old_name: &str,
        new_name: &str,
    ) -> Result<EntryHeader, NamespaceError> {
        validate_name("folder name", new_name)?;
        let parent = user.require_block(block)?;
        let header = lookup_folder(parent, old_name)?;
        if old_name == new_name {
            return Ok(header.clone());
        }
        ensure_free(parent, new_name)?;

        let mut renamed = header.clone();
        renamed.name = new_name.to_string();
        renamed.touch(Utc::now());

        let mut staged = parent.clone();
        staged.remove_entry(old_name);
        staged.insert_entry(renamed.clone());
        user.store().save_block(&staged)?;
        user.commit_block(staged);

        info!(
            "user '{}': renamed folder '{}' to '{}' in block {}",
            user.name(),
            old_name,
            new_name,
            block
        );
        Ok(renamed)
    }

    /// Creates an empty file
    ///
    /// The blob is written before the index links it. If linking fails the
    /// blob is removed again.
    pub fn create_file(
        user: &mut User,
        block: BlockId,
        name: &str,
        description: &str,
    ) -> Result<EntryHeader, NamespaceError> {
        validate_name("file name", name)?;
        let mut staged = user.require_block(block)?.clone();
        ensure_free(&staged, name)?;

        let store = user.store();
        let content_id = store.allocate_content_id(block)?;
        let header = EntryHeader::file(name, description, content_id.clone(), Utc::now());
        store.create_blob(block, &header)?;

        staged.insert_entry(header.clone());
        if let Err(err) = store.save_block(&staged) {
            if let Err(cleanup) = store.remove_blob(block, &content_id) {
                warn!("failed to remove unlinked blob {}: {}", content_id, cleanup);
            }
            return Err(err.into());
        }
        user.commit_block(staged);

        info!(
            "user '{}': created file '{}' ({}) in block {}",
            user.name(),
            name,
            content_id,
            block
        );
        Ok(header)
    }

    /// Deletes a file
    pub fn delete_file(
        user: &mut User,
        block: BlockId,
        name: &str,
    ) -> Result<EntryHeader, NamespaceError> {
        let parent = user.require_block(block)?;
        let header = lookup_file(parent, name)?.clone();
        let content_id = header.content_id().cloned().ok_or_else(|| {
            NamespaceError::Inconsistent(format!("file '{}' has no content", name))
        })?;

        let mut staged = parent.clone();
        staged.remove_entry(name);
        user.store().save_block(&staged)?;
        user.commit_block(staged);

        match user.store().remove_blob(block, &content_id) {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                warn!("blob of '{}' was already gone: {}", name, err);
            }
            Err(err) => return Err(err.into()),
        }

        info!(
            "user '{}': deleted file '{}' from block {}",
            user.name(),
            name,
            block
        );
        Ok(header)
    }

    /// Renames a file and replaces its description
    pub fn rename_file(
        user: &mut User,
        block: BlockId,
        old_name: &str,
        new_name: &str,
        description: &str,
    ) -> Result<EntryHeader, NamespaceError> {
        validate_name("file name", new_name)?;
        let parent = user.require_block(block)?;
        let header = lookup_file(parent, old_name)?;
        if old_name != new_name {
            ensure_free(parent, new_name)?;
        }

        let mut updated = header.clone();
        updated.name = new_name.to_string();
        updated.description = description.to_string();
        updated.touch(Utc::now());

        let updated = Self::rewrite_file(user, block, old_name, updated)?;
        info!(
            "user '{}': renamed file '{}' to '{}' in block {}",
            user.name(),
            old_name,
            new_name,
            block
        );
        Ok(updated)
    }

    /// Replaces a file's description
    pub fn update_file(
        user: &mut User,
        block: BlockId,
        name: &str,
        description: &str,
    ) -> Result<EntryHeader, NamespaceError> {
        let parent = user.require_block(block)?;
        let mut updated = lookup_file(parent, name)?.clone();
        updated.description = description.to_string();
        updated.touch(Utc::now());

        let updated = Self::rewrite_file(user, block, name, updated)?;
        info!(
            "user '{}': updated file '{}' in block {}",
            user.name(),
            name,
            block
        );
        Ok(updated)
    }

    /// Reads the header stored in a file's blob
    pub fn file_info(
        user: &User,
        block: BlockId,
        name: &str,
    ) -> Result<EntryHeader, NamespaceError> {
        let parent = user.require_block(block)?;
        let header = lookup_file(parent, name)?;
        let content_id = header.content_id().ok_or_else(|| {
            NamespaceError::Inconsistent(format!("file '{}' has no content", name))
        })?;
        Ok(user.store().read_blob_header(block, content_id)?)
    }

    /// Writes an updated file header to the blob, then to the index
    ///
    /// If the index write fails the blob gets its previous header back.
    fn rewrite_file(
        user: &mut User,
        block: BlockId,
        old_name: &str,
        updated: EntryHeader,
    ) -> Result<EntryHeader, NamespaceError> {
        let parent = user.require_block(block)?;
        let previous = lookup_file(parent, old_name)?.clone();
        let mut staged = parent.clone();

        let store = user.store();
        store.write_blob_header(block, &updated)?;
        debug!("rewrote blob header of '{}' in block {}", old_name, block);

        staged.remove_entry(old_name);
        staged.insert_entry(updated.clone());
        if let Err(err) = store.save_block(&staged) {
            if let Err(restore) = store.write_blob_header(block, &previous) {
                warn!(
                    "failed to restore blob header of '{}' in block {}: {}",
                    old_name, block, restore
                );
            }
            return Err(err.into());
        }
        user.commit_block(staged);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::ErrorKind;
    use crate::registry::UserRegistry;
    use block_store::BlockStore;
    use namespace_view::{SortField, SortOrder};
    use tempfile::{tempdir, TempDir};

    fn setup() -> (TempDir, User) {
        let dir = tempdir().unwrap();
        let user = UserRegistry::new(dir.path()).register("alice").unwrap();
        (dir, user)
    }

    fn root_names(user: &User) -> Vec<String> {
        EntryManager::list(user, BlockId::ROOT, ".", ListOptions::default()).unwrap()
    }

    #[test]
    fn test_create_folder() {
        let (_dir, mut user) = setup();

        let header =
            EntryManager::create_folder(&mut user, BlockId::ROOT, "docs", "papers").unwrap();
        let child = header.child_block_id().unwrap();
        assert_eq!(child, BlockId::new(1));
        assert_eq!(header.description, "papers");

        assert_eq!(root_names(&user), vec!["docs/"]);
        assert_eq!(user.block(child).unwrap().parent_node_id, BlockId::ROOT);
        assert_eq!(user.next_node_id(), 2);

        let on_disk = user.store().load_block(BlockId::ROOT).unwrap();
        assert_eq!(&on_disk, user.block(BlockId::ROOT).unwrap());
        assert!(user.store().block_exists(child));
    }

    #[test]
    fn test_create_folder_duplicate_and_invalid() {
        let (_dir, mut user) = setup();
        EntryManager::create_folder(&mut user, BlockId::ROOT, "docs", "").unwrap();

        let err = EntryManager::create_folder(&mut user, BlockId::ROOT, "docs", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        let err = EntryManager::create_folder(&mut user, BlockId::ROOT, "a/b", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        assert_eq!(root_names(&user), vec!["docs/"]);
    }

    #[test]
    fn test_failed_create_folder_leaves_memory_untouched() {
        let (_dir, mut user) = setup();
        EntryManager::create_folder(&mut user, BlockId::ROOT, "docs", "").unwrap();
        let before = user.blocks().clone();

        // Root index can no longer be written
        std::fs::remove_dir_all(user.store().block_dir(BlockId::ROOT)).unwrap();

        assert!(EntryManager::create_folder(&mut user, BlockId::ROOT, "more", "").is_err());
        assert_eq!(user.blocks(), &before);
        assert_eq!(root_names(&user), vec!["docs/"]);
    }

    /// Replaces the root index with a non-empty directory so writes to it fail
    fn block_root_index(user: &User) {
        let index = user.store().index_path(BlockId::ROOT);
        std::fs::remove_file(&index).unwrap();
        std::fs::create_dir(&index).unwrap();
        std::fs::write(index.join("keep"), b"x").unwrap();
    }

    fn root_dir_entries(user: &User) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(user.store().block_dir(BlockId::ROOT))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_create_folder_unlinked_child_is_removed() {
        let (_dir, mut user) = setup();
        let before = user.blocks().clone();
        block_root_index(&user);

        let err = EntryManager::create_folder(&mut user, BlockId::ROOT, "docs", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoFailure);

        assert!(!user.store().block_exists(BlockId::new(1)));
        assert_eq!(user.blocks(), &before);
        assert!(user.next_node_id() > 1);
    }

    #[test]
    fn test_create_folder_after_failed_link_skips_burned_id() {
        let (_dir, mut user) = setup();
        block_root_index(&user);
        assert!(EntryManager::create_folder(&mut user, BlockId::ROOT, "docs", "").is_err());

        let index = user.store().index_path(BlockId::ROOT);
        std::fs::remove_dir_all(&index).unwrap();
        user.store()
            .save_block(user.block(BlockId::ROOT).unwrap())
            .unwrap();

        let header = EntryManager::create_folder(&mut user, BlockId::ROOT, "docs", "").unwrap();
        assert_eq!(header.child_block_id(), Some(BlockId::new(2)));
        assert_eq!(root_names(&user), vec!["docs/"]);
    }

    #[test]
    fn test_create_file_unlinked_blob_is_removed() {
        let (_dir, mut user) = setup();
        let before = user.blocks().clone();
        block_root_index(&user);

        let err = EntryManager::create_file(&mut user, BlockId::ROOT, "a.txt", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoFailure);

        assert_eq!(root_dir_entries(&user), vec![block_store::BLOCK_INDEX_FILE]);
        assert_eq!(user.blocks(), &before);
    }

    #[test]
    fn test_create_rejects_whitespace_padded_names() {
        let (_dir, mut user) = setup();

        for name in [" docs", "docs ", " "] {
            let err = EntryManager::create_folder(&mut user, BlockId::ROOT, name, "").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
            let err = EntryManager::create_file(&mut user, BlockId::ROOT, name, "").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
        assert!(root_names(&user).is_empty());
    }

    #[test]
    fn test_delete_folder_removes_subtree() {
        let (_dir, mut user) = setup();
        let docs = EntryManager::create_folder(&mut user, BlockId::ROOT, "docs", "")
            .unwrap()
            .child_block_id()
            .unwrap();
        let notes = EntryManager::create_folder(&mut user, docs, "notes", "")
            .unwrap()
            .child_block_id()
            .unwrap();
        EntryManager::create_file(&mut user, notes, "todo.txt", "").unwrap();

        EntryManager::delete_folder(&mut user, BlockId::ROOT, "docs").unwrap();

        assert!(root_names(&user).is_empty());
        assert!(user.block(docs).is_none());
        assert!(user.block(notes).is_none());
        assert!(!user.store().block_exists(docs));
        assert!(!user.store().block_exists(notes));
        assert_eq!(user.next_node_id(), 3);
    }

    #[test]
    fn test_delete_folder_errors() {
        let (_dir, mut user) = setup();
        EntryManager::create_file(&mut user, BlockId::ROOT, "a.txt", "").unwrap();

        let err = EntryManager::delete_folder(&mut user, BlockId::ROOT, "a.txt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotADirectory);

        let err = EntryManager::delete_folder(&mut user, BlockId::ROOT, "missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_folder_tolerates_missing_block_dir() {
        let (_dir, mut user) = setup();
        let docs = EntryManager::create_folder(&mut user, BlockId::ROOT, "docs", "")
            .unwrap()
            .child_block_id()
            .unwrap();
        std::fs::remove_dir_all(user.store().block_dir(docs)).unwrap();

        EntryManager::delete_folder(&mut user, BlockId::ROOT, "docs").unwrap();
        assert!(root_names(&user).is_empty());
    }

    #[test]
    fn test_rename_folder() {
        let (_dir, mut user) = setup();
        let created = EntryManager::create_folder(&mut user, BlockId::ROOT, "docs", "").unwrap();
        EntryManager::create_folder(&mut user, BlockId::ROOT, "other", "").unwrap();

        let renamed =
            EntryManager::rename_folder(&mut user, BlockId::ROOT, "docs", "papers").unwrap();
        assert_eq!(renamed.child_block_id(), created.child_block_id());
        assert!(renamed.modified_time >= created.modified_time);
        assert_eq!(root_names(&user), vec!["other/", "papers/"]);

        let err =
            EntryManager::rename_folder(&mut user, BlockId::ROOT, "papers", "other").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        let err =
            EntryManager::rename_folder(&mut user, BlockId::ROOT, "papers", "..").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_rename_folder_to_same_name() {
        let (_dir, mut user) = setup();
        let created = EntryManager::create_folder(&mut user, BlockId::ROOT, "docs", "").unwrap();

        let same = EntryManager::rename_folder(&mut user, BlockId::ROOT, "docs", "docs").unwrap();
        assert_eq!(same, created);
    }

    #[test]
    fn test_rename_folder_rejects_file() {
        let (_dir, mut user) = setup();
        EntryManager::create_file(&mut user, BlockId::ROOT, "a.txt", "").unwrap();

        let err = EntryManager::rename_folder(&mut user, BlockId::ROOT, "a.txt", "b").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotADirectory);
    }

    #[test]
    fn test_create_file_writes_blob() {
        let (_dir, mut user) = setup();

        let header = EntryManager::create_file(&mut user, BlockId::ROOT, "a.txt", "notes").unwrap();
        let content_id = header.content_id().unwrap();
        assert!(content_id.is_well_formed());
        assert!(user.store().blob_exists(BlockId::ROOT, content_id));

        let stored = EntryManager::file_info(&user, BlockId::ROOT, "a.txt").unwrap();
        assert_eq!(stored, header);
        assert_eq!(root_names(&user), vec!["a.txt"]);
    }

    #[test]
    fn test_create_file_name_clash_with_folder() {
        let (_dir, mut user) = setup();
        EntryManager::create_folder(&mut user, BlockId::ROOT, "x", "").unwrap();

        let err = EntryManager::create_file(&mut user, BlockId::ROOT, "x", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_delete_file() {
        let (_dir, mut user) = setup();
        let header = EntryManager::create_file(&mut user, BlockId::ROOT, "a.txt", "").unwrap();

        EntryManager::delete_file(&mut user, BlockId::ROOT, "a.txt").unwrap();
        assert!(root_names(&user).is_empty());
        assert!(!user
            .store()
            .blob_exists(BlockId::ROOT, header.content_id().unwrap()));

        let err = EntryManager::delete_file(&mut user, BlockId::ROOT, "a.txt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_file_rejects_folder() {
        let (_dir, mut user) = setup();
        EntryManager::create_folder(&mut user, BlockId::ROOT, "docs", "").unwrap();

        let err = EntryManager::delete_file(&mut user, BlockId::ROOT, "docs").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAFile);
    }

    #[test]
    fn test_rename_file_rewrites_blob_header() {
        let (_dir, mut user) = setup();
        let created = EntryManager::create_file(&mut user, BlockId::ROOT, "a.txt", "old").unwrap();

        let renamed =
            EntryManager::rename_file(&mut user, BlockId::ROOT, "a.txt", "b.txt", "new").unwrap();
        assert_eq!(renamed.name, "b.txt");
        assert_eq!(renamed.description, "new");
        assert_eq!(renamed.content_id(), created.content_id());
        assert_eq!(renamed.created_time, created.created_time);

        assert_eq!(root_names(&user), vec!["b.txt"]);
        let stored = EntryManager::file_info(&user, BlockId::ROOT, "b.txt").unwrap();
        assert_eq!(stored, renamed);
    }

    #[test]
    fn test_rename_file_same_name_updates_description() {
        let (_dir, mut user) = setup();
        EntryManager::create_file(&mut user, BlockId::ROOT, "a.txt", "old").unwrap();

        let renamed =
            EntryManager::rename_file(&mut user, BlockId::ROOT, "a.txt", "a.txt", "new").unwrap();
        assert_eq!(renamed.description, "new");
        assert_eq!(
            EntryManager::file_info(&user, BlockId::ROOT, "a.txt")
                .unwrap()
                .description,
            "new"
        );
    }

    #[test]
    fn test_rename_file_onto_existing_name() {
        let (_dir, mut user) = setup();
        EntryManager::create_file(&mut user, BlockId::ROOT, "a.txt", "").unwrap();
        EntryManager::create_file(&mut user, BlockId::ROOT, "b.txt", "").unwrap();

        let err = EntryManager::rename_file(&mut user, BlockId::ROOT, "a.txt", "b.txt", "")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(root_names(&user), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_update_file() {
        let (_dir, mut user) = setup();
        EntryManager::create_file(&mut user, BlockId::ROOT, "a.txt", "old").unwrap();

        let updated = EntryManager::update_file(&mut user, BlockId::ROOT, "a.txt", "new").unwrap();
        assert_eq!(updated.description, "new");

        let reloaded = BlockStore::new(user.user_dir())
            .load_block(BlockId::ROOT)
            .unwrap();
        assert_eq!(reloaded.get_entry("a.txt").unwrap().description, "new");
    }

    #[test]
    fn test_file_info_errors() {
        let (_dir, mut user) = setup();
        EntryManager::create_folder(&mut user, BlockId::ROOT, "docs", "").unwrap();

        let err = EntryManager::file_info(&user, BlockId::ROOT, "docs").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAFile);

        let err = EntryManager::file_info(&user, BlockId::ROOT, "nope").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_list_sorted_by_name_desc() {
        let (_dir, mut user) = setup();
        EntryManager::create_file(&mut user, BlockId::ROOT, "a", "").unwrap();
        EntryManager::create_folder(&mut user, BlockId::ROOT, "b", "").unwrap();

        let names = EntryManager::list(
            &user,
            BlockId::ROOT,
            "",
            ListOptions::sorted(SortField::Name, SortOrder::Desc),
        )
        .unwrap();
        assert_eq!(names, vec!["b/", "a"]);
    }

    #[test]
    fn test_list_through_path() {
        let (_dir, mut user) = setup();
        let docs = EntryManager::create_folder(&mut user, BlockId::ROOT, "docs", "")
            .unwrap()
            .child_block_id()
            .unwrap();
        EntryManager::create_file(&mut user, docs, "x.txt", "").unwrap();

        let names =
            EntryManager::list(&user, BlockId::ROOT, "docs", ListOptions::default()).unwrap();
        assert_eq!(names, vec!["x.txt"]);

        let names = EntryManager::list(&user, docs, "..", ListOptions::default()).unwrap();
        assert_eq!(names, vec!["docs/"]);

        let err = EntryManager::list(&user, BlockId::ROOT, "docs/x.txt", ListOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotADirectory);
    }
}
