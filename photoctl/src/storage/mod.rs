//! Object storage backends for asset binaries.
//!
//! Metadata lives in MySQL; the image bytes themselves live behind the
//! [`ObjectStorage`] trait. Two backends are provided:
//!
//! - `s3`: the production backend over an S3 bucket
//! - `local`: a directory tree on the local filesystem, used by the test
//!   suite and handy for offline development
//!
//! Keys are opaque strings of the form `<folder>/<uuid>.jpg`. Backends store
//! and return them verbatim and never interpret the folder part beyond
//! whatever path mapping they need internally.

pub mod local;
pub mod s3;

pub use local::LocalObjectStorage;
pub use s3::S3ObjectStorage;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors from object storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No object exists under the requested key
    #[error("Object not found: {key}")]
    NotFound { key: String },

    /// Local filesystem I/O failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Any other backend failure
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Abstract interface for storing asset binaries.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store the file at `local_path` under `key` and return the stored key
    async fn upload(&self, local_path: &Path, key: &str) -> Result<String>;

    /// Fetch the object under `key`, write it to `dest_path` and return the
    /// written path. Absence surfaces as [`StorageError::NotFound`].
    async fn download(&self, key: &str, dest_path: &Path) -> Result<PathBuf>;

    /// Report whether an object exists under `key`
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Count every object in the store by full enumeration
    async fn count_all(&self) -> Result<u64>;
}

/// Build the object storage backend named by the configuration.
pub async fn create_object_storage(
    config: &crate::config::Config,
) -> Result<Arc<dyn ObjectStorage>> {
    match config.storage.backend {
        crate::config::StorageBackend::S3 => {
            tracing::info!(bucket = %config.s3.bucket_name, "Using S3 object storage");
            let storage = S3ObjectStorage::connect(&config.s3).await?;
            Ok(Arc::new(storage))
        }
        crate::config::StorageBackend::Local => {
            tracing::info!(root = %config.storage.local_root.display(), "Using local object storage");
            tokio::fs::create_dir_all(&config.storage.local_root).await?;
            Ok(Arc::new(LocalObjectStorage::new(
                config.storage.local_root.clone(),
            )))
        }
    }
}
