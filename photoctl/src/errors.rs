//! Application-level error types.
//!
//! Expected outcomes (a missing asset, an unknown user, an absent local
//! file) are not errors; the catalog operations report those through their
//! outcome enums. Everything here is a genuine failure that the shell
//! reports on a single diagnostic line and then keeps running.

use thiserror::Error;

/// Catalog application errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Database access failed
    #[error("database error: {0}")]
    Database(#[from] crate::db::errors::DbError),

    /// Object storage access failed
    #[error("object storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),

    /// The asset row insert failed after the object was already written.
    /// The bucket now holds an object no metadata row references.
    #[error("asset record insert failed, object '{storage_key}' is orphaned in the bucket")]
    OrphanedObject {
        storage_key: String,
        #[source]
        source: crate::db::errors::DbError,
    },

    /// Rendering an image to the terminal failed
    #[error("image render error: {0}")]
    Render(#[from] viuer::ViuError),

    /// The configuration failed validation
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Local filesystem I/O failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Anything else
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
