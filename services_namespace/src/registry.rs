//! User registry
//!
//! A user is a directory under the store root holding a `.userIndex` file and
//! one directory per block. Opening a user loads every block reachable from
//! its root into an in-memory arena that is owned by the `User` and only ever
//! addressed by block ID.

use crate::entries::validate_name;
use crate::operations::NamespaceError;
use block_store::{write_atomic, Block, BlockId, BlockStore, StoreError};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use namespace_view::PathResolver;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the user index inside a user directory
pub const USER_INDEX_FILE: &str = ".userIndex";

/// Persisted top-level state of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIndex {
    /// Unique user name (also the directory name)
    pub name: String,
    /// Store root the user lives under
    pub root_path: PathBuf,
    /// Namespace root block
    pub root_block_id: BlockId,
    /// Next block ID to hand out
    pub next_node_id: u64,
    /// Registration time
    pub created_time: DateTime<Utc>,
}

/// A loaded user and the arena of its blocks
#[derive(Debug)]
pub struct User {
    index: UserIndex,
    store: BlockStore,
    blocks: BTreeMap<BlockId, Block>,
}

impl User {
    pub fn name(&self) -> &str {
        &self.index.name
    }

    pub fn index(&self) -> &UserIndex {
        &self.index
    }

    /// Block store over this user's directory
    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    pub fn user_dir(&self) -> &Path {
        self.store.user_dir()
    }

    /// Next block ID that will be allocated
    pub fn next_node_id(&self) -> u64 {
        self.index.next_node_id
    }

    /// Gets a loaded block
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    /// All loaded blocks
    pub fn blocks(&self) -> &BTreeMap<BlockId, Block> {
        &self.blocks
    }

    /// Gets a block that must be loaded
    ///
    /// The arena is complete once the user is open, so a miss means memory
    /// and disk have diverged.
    pub fn require_block(&self, id: BlockId) -> Result<&Block, NamespaceError> {
        self.blocks.get(&id).ok_or_else(|| {
            NamespaceError::Inconsistent(format!(
                "block {} of user '{}' is not loaded",
                id,
                self.name()
            ))
        })
    }

    /// Resolves `path` relative to block `from`
    pub fn resolve(&self, from: BlockId, path: &str) -> Result<&Block, NamespaceError> {
        let start = self.require_block(from)?;
        let block = PathResolver::resolve_path(start, path, |id| self.blocks.get(&id))?;
        Ok(block)
    }

    /// Absolute path of a block, e.g. `/docs/notes`
    pub fn path_of(&self, id: BlockId) -> Result<String, NamespaceError> {
        let mut names = Vec::new();
        let mut current = self.require_block(id)?;

        while !current.is_root() {
            if names.len() > self.blocks.len() {
                return Err(NamespaceError::Inconsistent(format!(
                    "parent chain of block {} does not reach the root",
                    id
                )));
            }
            let parent = self.require_block(current.parent_node_id)?;
            let header = parent.entry_for_child(current.node_id).ok_or_else(|| {
                NamespaceError::Inconsistent(format!(
                    "block {} has no entry for its child {}",
                    parent.node_id, current.node_id
                ))
            })?;
            names.push(header.name.as_str());
            current = parent;
        }

        names.reverse();
        Ok(format!("/{}", names.join("/")))
    }

    /// Block IDs of `id` and everything below it
    pub fn subtree_ids(&self, id: BlockId) -> Result<Vec<BlockId>, NamespaceError> {
        let mut ids = Vec::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            let block = self.require_block(next)?;
            ids.push(next);
            pending.extend(block.child_block_ids());
        }
        Ok(ids)
    }

    /// Hands out the next block ID
    ///
    /// The counter only moves forward, even if the ID ends up unused.
    pub(crate) fn allocate_block_id(&mut self) -> BlockId {
        let id = BlockId::new(self.index.next_node_id);
        self.index.next_node_id += 1;
        id
    }

    /// Replaces the arena copy of a block with one that was just persisted
    pub(crate) fn commit_block(&mut self, block: Block) {
        self.blocks.insert(block.node_id, block);
    }

    pub(crate) fn evict(&mut self, ids: &[BlockId]) {
        for id in ids {
            self.blocks.remove(id);
        }
    }

    /// Writes the user index
    pub fn save_index(&self) -> Result<(), NamespaceError> {
        let dir = self.user_dir();
        let path = dir.join(USER_INDEX_FILE);
        let data = serde_json::to_vec_pretty(&self.index).map_err(|e| {
            NamespaceError::Corrupt(format!("serialize user index {}: {}", path.display(), e))
        })?;
        write_atomic(dir, &path, &data)?;
        debug!(
            "wrote user index of '{}' (next id {})",
            self.name(),
            self.index.next_node_id
        );
        Ok(())
    }
}

/// Creates, opens, and deletes users under a store root
#[derive(Debug, Clone)]
pub struct UserRegistry {
    store_root: PathBuf,
}

impl UserRegistry {
    pub fn new(store_root: impl Into<PathBuf>) -> Self {
        Self {
            store_root: store_root.into(),
        }
    }

    /// Directory of a user
    pub fn user_dir(&self, name: &str) -> PathBuf {
        self.store_root.join(name)
    }

    /// Returns true if a user directory exists for `name`
    pub fn exists(&self, name: &str) -> bool {
        PathResolver::is_valid_name(name) && self.user_dir(name).is_dir()
    }

    /// Registers a new user with an empty root block
    ///
    /// Either the whole footprint (directory, root block, user index) is
    /// created or none of it is left behind.
    pub fn register(&self, name: &str) -> Result<User, NamespaceError> {
        validate_name("user name", name)?;
        if !self.store_root.is_dir() {
            return Err(NamespaceError::NotFound(format!(
                "store root {}",
                self.store_root.display()
            )));
        }

        let dir = self.user_dir(name);
        if dir.exists() {
            return Err(NamespaceError::AlreadyExists(format!("user '{}'", name)));
        }
        fs::create_dir(&dir).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => {
                NamespaceError::AlreadyExists(format!("user '{}'", name))
            }
            _ => NamespaceError::Io(format!("creating user directory {}: {}", dir.display(), e)),
        })?;

        match self.initialise(name, &dir) {
            Ok(user) => {
                info!("registered user '{}'", name);
                Ok(user)
            }
            Err(err) => {
                if let Err(cleanup) = fs::remove_dir_all(&dir) {
                    warn!(
                        "failed to clean up partial user directory {}: {}",
                        dir.display(),
                        cleanup
                    );
                }
                Err(err)
            }
        }
    }

    fn initialise(&self, name: &str, dir: &Path) -> Result<User, NamespaceError> {
        let store = BlockStore::new(dir);
        let root = store.create_block(BlockId::ROOT, BlockId::ROOT)?;

        let index = UserIndex {
            name: name.to_string(),
            root_path: self.store_root.clone(),
            root_block_id: BlockId::ROOT,
            next_node_id: BlockId::ROOT.as_u64() + 1,
            created_time: Utc::now(),
        };

        let mut blocks = BTreeMap::new();
        blocks.insert(root.node_id, root);
        let user = User {
            index,
            store,
            blocks,
        };
        user.save_index()?;
        Ok(user)
    }

    /// Opens an existing user
    ///
    /// The block counter resumes after the highest block directory on disk,
    /// orphans included, so IDs are never handed out twice.
    pub fn open(&self, name: &str) -> Result<User, NamespaceError> {
        validate_name("user name", name)?;
        let dir = self.user_dir(name);
        if !dir.is_dir() {
            return Err(NamespaceError::NotFound(format!("user '{}'", name)));
        }

        let index_path = dir.join(USER_INDEX_FILE);
        let data = fs::read(&index_path).map_err(|e| {
            NamespaceError::NotFound(format!(
                "index of user '{}' ({}): {}",
                name,
                index_path.display(),
                e
            ))
        })?;
        let mut index: UserIndex = serde_json::from_slice(&data).map_err(|e| {
            NamespaceError::Corrupt(format!("user index {}: {}", index_path.display(), e))
        })?;
        if index.name != name {
            return Err(NamespaceError::Corrupt(format!(
                "user index {} belongs to '{}'",
                index_path.display(),
                index.name
            )));
        }
        index.root_path = self.store_root.clone();

        let store = BlockStore::new(&dir);
        let on_disk = store.scan_block_ids()?;
        if let Some(highest) = on_disk.last() {
            if highest.as_u64() >= index.next_node_id {
                debug!(
                    "user '{}': block {} found on disk beyond counter {}",
                    name, highest, index.next_node_id
                );
                index.next_node_id = highest.as_u64() + 1;
            }
        }

        let blocks = Self::hydrate(&store, index.root_block_id)?;
        for orphan in on_disk.iter().filter(|id| !blocks.contains_key(id)) {
            warn!(
                "user '{}': block {} is not reachable from the root and is ignored",
                name, orphan
            );
        }

        info!("opened user '{}' ({} blocks)", name, blocks.len());
        Ok(User {
            index,
            store,
            blocks,
        })
    }

    /// Loads every block reachable from the root, checking parent linkage
    fn hydrate(
        store: &BlockStore,
        root_id: BlockId,
    ) -> Result<BTreeMap<BlockId, Block>, NamespaceError> {
        let root = store.load_block(root_id)?;
        if root.parent_node_id != root.node_id {
            return Err(NamespaceError::Inconsistent(format!(
                "root block {} names {} as its parent",
                root.node_id, root.parent_node_id
            )));
        }

        let mut blocks = BTreeMap::new();
        let mut seen = BTreeSet::from([root_id]);
        let mut pending = vec![root];

        while let Some(block) = pending.pop() {
            let children: Vec<BlockId> = block.child_block_ids().collect();
            for child_id in children {
                if !seen.insert(child_id) {
                    return Err(NamespaceError::Inconsistent(format!(
                        "block {} is referenced more than once",
                        child_id
                    )));
                }
                let child = store.load_block(child_id).map_err(|err| match err {
                    StoreError::NotFound(msg) => NamespaceError::Inconsistent(format!(
                        "block {} references missing block {}: {}",
                        block.node_id, child_id, msg
                    )),
                    other => other.into(),
                })?;
                if child.parent_node_id != block.node_id {
                    return Err(NamespaceError::Inconsistent(format!(
                        "block {} is linked from {} but names {} as its parent",
                        child_id, block.node_id, child.parent_node_id
                    )));
                }
                pending.push(child);
            }
            blocks.insert(block.node_id, block);
        }

        Ok(blocks)
    }

    /// Deletes a user directory and everything below it
    pub fn delete(&self, name: &str) -> Result<(), NamespaceError> {
        validate_name("user name", name)?;
        let dir = self.user_dir(name);
        if !dir.is_dir() {
            return Err(NamespaceError::NotFound(format!("user '{}'", name)));
        }

        fs::remove_dir_all(&dir).map_err(|e| {
            NamespaceError::Io(format!("removing user directory {}: {}", dir.display(), e))
        })?;
        info!("deleted user '{}'", name);
        Ok(())
    }
}
