//! Catalog operations over the two backing stores.
//!
//! [`Catalog`] is the explicit session context: it owns the metadata store,
//! shares the object storage handle, and carries the labels the stats
//! report needs. Every shell command maps to exactly one method on it, and
//! every method receives everything it uses through `self` rather than
//! through globals.

pub mod models;
mod operations;

pub use models::{DownloadOutcome, StatsReport, UploadOutcome};

use crate::db::handlers::MetadataStore;
use crate::storage::ObjectStorage;
use bon::Builder;
use std::path::PathBuf;
use std::sync::Arc;

/// Session context threaded through every catalog operation.
#[derive(Builder)]
pub struct Catalog {
    /// Typed access to the users and assets tables
    pub(crate) metadata: Box<dyn MetadataStore>,
    /// Storage backend holding the asset binaries
    pub(crate) storage: Arc<dyn ObjectStorage>,
    /// Bucket name reported by stats
    pub(crate) bucket_name: String,
    /// Database host label reported by stats
    pub(crate) database_label: String,
    /// Directory downloaded assets are written into
    #[builder(default = PathBuf::from("."))]
    pub(crate) download_dir: PathBuf,
}
