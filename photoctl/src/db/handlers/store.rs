//! Metadata store seam between the catalog operations and the database.
//!
//! The operations layer talks to this trait instead of holding a connection
//! directly, which keeps the repositories out of the operation signatures and
//! lets the test suite substitute an in-memory double for the whole metadata
//! side of the catalog.

use crate::db::errors::Result;
use crate::db::handlers::assets::Assets;
use crate::db::handlers::repository::Repository;
use crate::db::handlers::users::Users;
use crate::db::models::assets::{AssetCreateDBRequest, AssetDBResponse};
use crate::db::models::users::{UserCreateDBRequest, UserDBResponse};
use crate::types::{AssetId, UserId};
use async_trait::async_trait;
use sqlx::MySqlConnection;

/// Typed access to the `users` and `assets` tables.
///
/// Methods take `&mut self` because the production implementation drives a
/// single sequential connection; there is never more than one call in
/// flight. Lookup methods report absence as `Ok(None)`, never as an error.
#[async_trait]
pub trait MetadataStore: Send {
    async fn count_users(&mut self) -> Result<i64>;

    async fn count_assets(&mut self) -> Result<i64>;

    /// Every user row, most recently created first
    async fn list_users(&mut self) -> Result<Vec<UserDBResponse>>;

    /// Every asset row, most recently created first
    async fn list_assets(&mut self) -> Result<Vec<AssetDBResponse>>;

    /// Look up an asset by the raw id string typed at the prompt
    async fn find_asset(&mut self, asset_id: &str) -> Result<Option<AssetDBResponse>>;

    /// Look up a user's storage folder by the raw id string typed at the prompt
    async fn find_user_folder(&mut self, user_id: &str) -> Result<Option<String>>;

    /// Insert a user row and return the assigned id
    async fn insert_user(&mut self, request: UserCreateDBRequest) -> Result<UserId>;

    /// Insert an asset row and return the assigned id
    async fn insert_asset(&mut self, request: AssetCreateDBRequest) -> Result<AssetId>;
}

/// Production [`MetadataStore`] over the session's single MySQL connection.
///
/// Owns the connection outright. Each call borrows it to a short-lived
/// repository, so connection use stays strictly sequential.
pub struct MySqlMetadataStore {
    conn: MySqlConnection,
}

impl MySqlMetadataStore {
    pub fn new(conn: MySqlConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl MetadataStore for MySqlMetadataStore {
    async fn count_users(&mut self) -> Result<i64> {
        Users::new(&mut self.conn).count().await
    }

    async fn count_assets(&mut self) -> Result<i64> {
        Assets::new(&mut self.conn).count().await
    }

    async fn list_users(&mut self) -> Result<Vec<UserDBResponse>> {
        Users::new(&mut self.conn).list().await
    }

    async fn list_assets(&mut self) -> Result<Vec<AssetDBResponse>> {
        Assets::new(&mut self.conn).list().await
    }

    async fn find_asset(&mut self, asset_id: &str) -> Result<Option<AssetDBResponse>> {
        Assets::new(&mut self.conn).get_by_id(asset_id).await
    }

    async fn find_user_folder(&mut self, user_id: &str) -> Result<Option<String>> {
        let user = Users::new(&mut self.conn).get_by_id(user_id).await?;
        Ok(user.map(|u| u.storage_folder))
    }

    async fn insert_user(&mut self, request: UserCreateDBRequest) -> Result<UserId> {
        Users::new(&mut self.conn).create(&request).await
    }

    async fn insert_asset(&mut self, request: AssetCreateDBRequest) -> Result<AssetId> {
        Assets::new(&mut self.conn).create(&request).await
    }
}
