//! Base repository trait for database operations.

use crate::db::errors::Result;

/// Common surface every table repository implements.
///
/// Lookups are keyed by the raw string typed at the shell prompt rather than
/// a parsed integer. The string is bound directly into the query and the
/// database performs the coercion, so a non-numeric id simply matches no row
/// instead of failing up front. Inserts return the id the database assigned.
#[async_trait::async_trait]
pub trait Repository {
    /// The payload type for creating entities
    type CreateRequest: Send + Sync;

    /// The row type returned by reads
    type Response: Send + Sync;

    /// Insert a new entity and return its database-assigned id
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<i64>;

    /// Fetch a single entity by raw id string, `None` when no row matches
    async fn get_by_id(&mut self, id: &str) -> Result<Option<Self::Response>>;

    /// List every entity, most recently created first
    async fn list(&mut self) -> Result<Vec<Self::Response>>;

    /// Count every entity
    async fn count(&mut self) -> Result<i64>;
}
