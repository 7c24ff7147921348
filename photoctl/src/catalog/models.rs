//! Outcome types returned by the catalog operations.
//!
//! Expected absences are data, not errors: an unknown asset id, an unknown
//! user id, or a missing local file each get their own variant so the shell
//! can phrase them without inspecting error chains.

use crate::types::AssetId;
use std::path::PathBuf;

/// Combined summary of both stores, gathered in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsReport {
    /// Name of the bucket holding the binaries
    pub bucket_name: String,
    /// Objects in the bucket, by full enumeration
    pub object_count: u64,
    /// Host label of the metadata database
    pub database_label: String,
    /// Rows in the users table
    pub user_count: i64,
    /// Rows in the assets table
    pub asset_count: i64,
}

/// Result of a download request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The object was fetched and now sits at `path` under the asset's
    /// original name. Any existing file of that name was replaced.
    Saved {
        original_name: String,
        path: PathBuf,
    },
    /// No asset row matched the requested id; no local file was touched
    NoSuchAsset,
}

/// Result of an upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The binary is in the bucket and the metadata row is recorded
    Stored {
        asset_id: AssetId,
        storage_key: String,
    },
    /// No user row matched the requested id; nothing was stored
    NoSuchUser,
    /// The local path named no file; neither store was contacted
    MissingLocalFile,
}
