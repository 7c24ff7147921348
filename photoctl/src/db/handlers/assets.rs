//! Database repository for catalog assets.

use crate::db::errors::Result;
use crate::db::handlers::repository::Repository;
use crate::db::models::assets::{AssetCreateDBRequest, AssetDBResponse};
use sqlx::MySqlConnection;
use tracing::instrument;

/// Repository over the `assets` table.
pub struct Assets<'c> {
    db: &'c mut MySqlConnection,
}

impl<'c> Assets<'c> {
    pub fn new(db: &'c mut MySqlConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Assets<'c> {
    type CreateRequest = AssetCreateDBRequest;
    type Response = AssetDBResponse;

    #[instrument(skip(self, request), fields(storage_key = %request.storage_key), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<i64> {
        sqlx::query(
            "INSERT INTO assets (userid, assetname, bucketkey) VALUES (?, ?, ?)",
        )
        .bind(&request.user_id)
        .bind(&request.original_name)
        .bind(&request.storage_key)
        .execute(&mut *self.db)
        .await?;

        let asset_id =
            sqlx::query_scalar::<_, i64>("SELECT CAST(LAST_INSERT_ID() AS SIGNED)")
                .fetch_one(&mut *self.db)
                .await?;

        Ok(asset_id)
    }

    #[instrument(skip(self), fields(asset_id = %id), err)]
    async fn get_by_id(&mut self, id: &str) -> Result<Option<AssetDBResponse>> {
        let asset = sqlx::query_as::<_, AssetDBResponse>(
            "SELECT assetid AS asset_id, userid AS user_id, \
             assetname AS original_name, bucketkey AS storage_key \
             FROM assets WHERE assetid = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(asset)
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self) -> Result<Vec<AssetDBResponse>> {
        let assets = sqlx::query_as::<_, AssetDBResponse>(
            "SELECT assetid AS asset_id, userid AS user_id, \
             assetname AS original_name, bucketkey AS storage_key \
             FROM assets ORDER BY assetid DESC",
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(assets)
    }

    #[instrument(skip(self), err)]
    async fn count(&mut self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM assets")
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }
}
