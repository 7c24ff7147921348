//! Database models for catalog assets.

use crate::types::{AssetId, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// Payload for inserting a new asset row.
#[derive(Debug, Clone)]
pub struct AssetCreateDBRequest {
    /// Owning user id, still in the raw form it was typed in. The value is
    /// bound as-is and the server coerces it to the integer column; by the
    /// time an insert happens it has already matched an existing user row.
    pub user_id: String,
    /// Local filename the asset was uploaded from
    pub original_name: String,
    /// Bucket key the binary was stored under
    pub storage_key: String,
}

/// An asset row as read back from the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct AssetDBResponse {
    pub asset_id: AssetId,
    pub user_id: UserId,
    pub original_name: String,
    pub storage_key: String,
}
