//! Database repository for catalog users.

use crate::db::errors::Result;
use crate::db::handlers::repository::Repository;
use crate::db::models::users::{UserCreateDBRequest, UserDBResponse};
use sqlx::MySqlConnection;
use tracing::instrument;

/// Repository over the `users` table.
///
/// Borrows the session's single connection for the duration of one call, so
/// the repositories never outlive or multiply the connection they wrap.
pub struct Users<'c> {
    db: &'c mut MySqlConnection,
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut MySqlConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Users<'c> {
    type CreateRequest = UserCreateDBRequest;
    type Response = UserDBResponse;

    #[instrument(skip(self, request), fields(email = %request.email), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<i64> {
        sqlx::query(
            "INSERT INTO users (email, lastname, firstname, bucketfolder) VALUES (?, ?, ?, ?)",
        )
        .bind(&request.email)
        .bind(&request.last_name)
        .bind(&request.first_name)
        .bind(&request.storage_folder)
        .execute(&mut *self.db)
        .await?;

        // The assigned id comes from a follow-up query on the same
        // connection. LAST_INSERT_ID() is connection-scoped, so the single
        // sequential connection guarantees it belongs to the insert above.
        let user_id =
            sqlx::query_scalar::<_, i64>("SELECT CAST(LAST_INSERT_ID() AS SIGNED)")
                .fetch_one(&mut *self.db)
                .await?;

        Ok(user_id)
    }

    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn get_by_id(&mut self, id: &str) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, UserDBResponse>(
            "SELECT userid AS user_id, email, lastname AS last_name, \
             firstname AS first_name, bucketfolder AS storage_folder \
             FROM users WHERE userid = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self) -> Result<Vec<UserDBResponse>> {
        let users = sqlx::query_as::<_, UserDBResponse>(
            "SELECT userid AS user_id, email, lastname AS last_name, \
             firstname AS first_name, bucketfolder AS storage_folder \
             FROM users ORDER BY userid DESC",
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(users)
    }

    #[instrument(skip(self), err)]
    async fn count(&mut self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }
}
