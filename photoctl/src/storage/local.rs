//! Local filesystem object storage backend.

use crate::storage::{ObjectStorage, Result, StorageError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Object storage rooted in a local directory.
///
/// Keys map directly onto relative paths under the root, so a key of
/// `folder/uuid.jpg` becomes `<root>/folder/uuid.jpg`. Used by the test
/// suite and for offline development.
pub struct LocalObjectStorage {
    root: PathBuf,
}

impl LocalObjectStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn upload(&self, local_path: &Path, key: &str) -> Result<String> {
        let dest = self.root.join(key);

        // Ensure the folder part of the key exists
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::copy(local_path, &dest).await?;

        tracing::debug!(key = %key, "stored object locally");
        Ok(key.to_string())
    }

    async fn download(&self, key: &str, dest_path: &Path) -> Result<PathBuf> {
        let source = self.root.join(key);

        if !source.is_file() {
            return Err(StorageError::NotFound {
                key: key.to_string(),
            });
        }

        fs::copy(&source, dest_path).await?;

        tracing::debug!(key = %key, dest = %dest_path.display(), "fetched object locally");
        Ok(dest_path.to_path_buf())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.root.join(key).is_file())
    }

    async fn count_all(&self) -> Result<u64> {
        if !self.root.is_dir() {
            return Ok(0);
        }

        let mut total: u64 = 0;
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else {
                    total += 1;
                }
            }
        }

        Ok(total)
    }
}
