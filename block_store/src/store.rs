//! Physical block storage
//!
//! Every block is a directory named by its ID directly under the user
//! directory. The directory holds the block index and the blobs of the
//! block's file entries.

use crate::{Block, BlockId, ContentId, EntryHeader, StoreError};
use log::{debug, warn};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name of a block index inside its block directory
pub const BLOCK_INDEX_FILE: &str = ".blockIndex";

/// Writes `data` to `target` through a temp file in `dir` and a rename
///
/// Readers observe either the old or the new content, never a torn write.
pub fn write_atomic(dir: &Path, target: &Path, data: &[u8]) -> Result<(), StoreError> {
    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| StoreError::io("creating temp file in", dir, e))?;
    tmp.write_all(data)
        .map_err(|e| StoreError::io("writing temp file for", target, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StoreError::io("syncing temp file for", target, e))?;
    tmp.persist(target)
        .map_err(|e| StoreError::io("replacing", target, e.error))?;
    Ok(())
}

/// Block storage rooted at one user directory
#[derive(Debug, Clone)]
pub struct BlockStore {
    user_dir: PathBuf,
}

impl BlockStore {
    /// Creates a store over an existing user directory
    pub fn new(user_dir: impl Into<PathBuf>) -> Self {
        Self {
            user_dir: user_dir.into(),
        }
    }

    /// Returns the user directory
    pub fn user_dir(&self) -> &Path {
        &self.user_dir
    }

    /// Physical directory of a block
    pub fn block_dir(&self, id: BlockId) -> PathBuf {
        self.user_dir.join(id.to_string())
    }

    /// Path of a block's index file
    pub fn index_path(&self, id: BlockId) -> PathBuf {
        self.block_dir(id).join(BLOCK_INDEX_FILE)
    }

    /// Path of a blob inside a block
    pub fn blob_path(&self, block: BlockId, content_id: &ContentId) -> PathBuf {
        self.block_dir(block).join(content_id.as_str())
    }

    /// Returns true if the block's directory exists
    pub fn block_exists(&self, id: BlockId) -> bool {
        self.block_dir(id).is_dir()
    }

    /// Creates a block directory with an empty index
    ///
    /// Every block except the root needs its parent to exist on disk. If the
    /// index cannot be written the new directory is removed again.
    pub fn create_block(
        &self,
        parent_node_id: BlockId,
        new_id: BlockId,
    ) -> Result<Block, StoreError> {
        if !new_id.is_root() && !self.block_exists(parent_node_id) {
            return Err(StoreError::InvalidArgument(format!(
                "parent block {} does not exist at {}",
                parent_node_id,
                self.block_dir(parent_node_id).display()
            )));
        }

        let dir = self.block_dir(new_id);
        fs::create_dir(&dir).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => {
                StoreError::AlreadyExists(format!("block {} at {}", new_id, dir.display()))
            }
            io::ErrorKind::NotFound => {
                StoreError::NotFound(format!("user directory {}", self.user_dir.display()))
            }
            _ => StoreError::io("creating block directory", &dir, e),
        })?;

        let block = Block::new(new_id, parent_node_id);
        if let Err(err) = self.save_block(&block) {
            if let Err(cleanup) = fs::remove_dir_all(&dir) {
                warn!(
                    "failed to remove half-created block {}: {}",
                    dir.display(),
                    cleanup
                );
            }
            return Err(err);
        }

        debug!("created block {} (parent {})", new_id, parent_node_id);
        Ok(block)
    }

    /// Loads a block from its index file
    pub fn load_block(&self, id: BlockId) -> Result<Block, StoreError> {
        let path = self.index_path(id);
        let data = fs::read(&path).map_err(|e| {
            StoreError::NotFound(format!("index of block {} ({}): {}", id, path.display(), e))
        })?;

        let block: Block =
            serde_json::from_slice(&data).map_err(|e| StoreError::corrupt(&path, e.to_string()))?;

        if block.node_id != id {
            return Err(StoreError::corrupt(
                &path,
                format!("index claims node id {}, expected {}", block.node_id, id),
            ));
        }
        if let Some(problem) = block.find_inconsistency() {
            return Err(StoreError::corrupt(&path, problem));
        }

        Ok(block)
    }

    /// Rewrites a block's index file
    ///
    /// Fails with `NotFound` if the block directory is gone, so an index is
    /// never resurrected for a block that was deleted.
    pub fn save_block(&self, block: &Block) -> Result<(), StoreError> {
        let dir = self.block_dir(block.node_id);
        if !dir.is_dir() {
            return Err(StoreError::NotFound(format!(
                "block {} directory {}",
                block.node_id,
                dir.display()
            )));
        }

        let path = self.index_path(block.node_id);
        let data = serde_json::to_vec_pretty(block)
            .map_err(|e| StoreError::corrupt(&path, format!("serialize failed: {}", e)))?;
        write_atomic(&dir, &path, &data)?;

        debug!(
            "wrote index of block {} ({} entries)",
            block.node_id,
            block.count()
        );
        Ok(())
    }

    /// Removes a block directory and everything in it
    pub fn delete_block(&self, id: BlockId) -> Result<(), StoreError> {
        let dir = self.block_dir(id);
        if !dir.is_dir() {
            return Err(StoreError::NotFound(format!(
                "block {} directory {}",
                id,
                dir.display()
            )));
        }

        fs::remove_dir_all(&dir).map_err(|e| StoreError::io("removing block", &dir, e))?;
        debug!("deleted block {}", id);
        Ok(())
    }

    /// Lists the IDs of all block directories under the user directory
    pub fn scan_block_ids(&self) -> Result<Vec<BlockId>, StoreError> {
        let entries = fs::read_dir(&self.user_dir)
            .map_err(|e| StoreError::io("scanning", &self.user_dir, e))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io("scanning", &self.user_dir, e))?;
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }
            if let Some(id) = entry.file_name().to_str().and_then(BlockId::from_dir_name) {
                ids.push(id);
            }
        }

        ids.sort();
        Ok(ids)
    }

    /// Picks a content address that is not yet taken inside `block`
    pub fn allocate_content_id(&self, block: BlockId) -> Result<ContentId, StoreError> {
        let dir = self.block_dir(block);
        if !dir.is_dir() {
            return Err(StoreError::NotFound(format!(
                "block {} directory {}",
                block,
                dir.display()
            )));
        }

        loop {
            let candidate = ContentId::generate();
            if !dir.join(candidate.as_str()).exists() {
                return Ok(candidate);
            }
            warn!(
                "content address {} already taken in block {}, regenerating",
                candidate, block
            );
        }
    }

    /// Returns true if the blob exists
    pub fn blob_exists(&self, block: BlockId, content_id: &ContentId) -> bool {
        self.blob_path(block, content_id).is_file()
    }

    /// Creates the blob of a file entry
    ///
    /// The blob holds the JSON form of the entry's own header.
    pub fn create_blob(&self, block: BlockId, header: &EntryHeader) -> Result<(), StoreError> {
        let content_id = Self::file_content_id(header)?;
        let path = self.blob_path(block, content_id);
        let data = Self::encode_header(&path, header)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => {
                    StoreError::AlreadyExists(format!("blob {} in block {}", content_id, block))
                }
                io::ErrorKind::NotFound => {
                    StoreError::NotFound(format!("block {} directory", block))
                }
                _ => StoreError::io("creating blob", &path, e),
            })?;

        if let Err(e) = file.write_all(&data).and_then(|_| file.sync_all()) {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&path) {
                warn!("failed to remove partial blob {}: {}", path.display(), cleanup);
            }
            return Err(StoreError::io("writing blob", &path, e));
        }

        debug!("created blob {} in block {}", content_id, block);
        Ok(())
    }

    /// Rewrites the header copy stored in an existing blob
    pub fn write_blob_header(
        &self,
        block: BlockId,
        header: &EntryHeader,
    ) -> Result<(), StoreError> {
        let content_id = Self::file_content_id(header)?;
        let path = self.blob_path(block, content_id);
        if !path.is_file() {
            return Err(StoreError::NotFound(format!(
                "blob {} in block {}",
                content_id, block
            )));
        }

        let data = Self::encode_header(&path, header)?;
        write_atomic(&self.block_dir(block), &path, &data)
    }

    /// Reads the header copy stored in a blob
    pub fn read_blob_header(
        &self,
        block: BlockId,
        content_id: &ContentId,
    ) -> Result<EntryHeader, StoreError> {
        let path = self.blob_path(block, content_id);
        let data = fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                StoreError::NotFound(format!("blob {} in block {}", content_id, block))
            }
            _ => StoreError::io("reading blob", &path, e),
        })?;

        serde_json::from_slice(&data).map_err(|e| StoreError::corrupt(&path, e.to_string()))
    }

    /// Removes a blob
    pub fn remove_blob(&self, block: BlockId, content_id: &ContentId) -> Result<(), StoreError> {
        let path = self.blob_path(block, content_id);
        fs::remove_file(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                StoreError::NotFound(format!("blob {} in block {}", content_id, block))
            }
            _ => StoreError::io("removing blob", &path, e),
        })?;

        debug!("removed blob {} from block {}", content_id, block);
        Ok(())
    }

    fn file_content_id(header: &EntryHeader) -> Result<&ContentId, StoreError> {
        header.content_id().ok_or_else(|| {
            StoreError::InvalidArgument(format!("'{}' is not a file entry", header.name))
        })
    }

    fn encode_header(path: &Path, header: &EntryHeader) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(header)
            .map_err(|e| StoreError::corrupt(path, format!("serialize failed: {}", e)))
    }
}
