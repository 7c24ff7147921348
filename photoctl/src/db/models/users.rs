//! Database models for catalog users.

use crate::types::UserId;
use serde::Serialize;
use sqlx::FromRow;

/// Payload for inserting a new user row.
///
/// The row id is assigned by the database; callers receive it from the
/// repository after the insert completes.
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub email: String,
    pub last_name: String,
    pub first_name: String,
    /// Per-user folder prefix for stored objects, fixed at creation
    pub storage_folder: String,
}

/// A user row as read back from the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct UserDBResponse {
    pub user_id: UserId,
    pub email: String,
    pub last_name: String,
    pub first_name: String,
    pub storage_folder: String,
}
