//! Shared test fixtures.

use crate::db::errors::{DbError, Result};
use crate::db::handlers::MetadataStore;
use crate::db::models::assets::{AssetCreateDBRequest, AssetDBResponse};
use crate::db::models::users::{UserCreateDBRequest, UserDBResponse};
use crate::types::{AssetId, UserId};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MemoryState {
    users: Vec<UserDBResponse>,
    assets: Vec<AssetDBResponse>,
    fail_next_asset_insert: bool,
}

/// In-memory [`MetadataStore`] double.
///
/// Mirrors the database behaviors the operations rely on: ascending id
/// assignment, newest-first listings, raw-string id lookups where a
/// non-numeric id matches nothing, and referential checking on asset
/// inserts. Clones share state, so a test can keep one handle for
/// inspection and fault injection after boxing another into a catalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryMetadataStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `insert_asset` call fail, to exercise the path where
    /// the object is already stored but the metadata row is not.
    pub fn fail_next_asset_insert(&self) {
        self.state.lock().unwrap().fail_next_asset_insert = true;
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn count_users(&mut self) -> Result<i64> {
        Ok(self.state.lock().unwrap().users.len() as i64)
    }

    async fn count_assets(&mut self) -> Result<i64> {
        Ok(self.state.lock().unwrap().assets.len() as i64)
    }

    async fn list_users(&mut self) -> Result<Vec<UserDBResponse>> {
        let mut users = self.state.lock().unwrap().users.clone();
        users.sort_by(|a, b| b.user_id.cmp(&a.user_id));
        Ok(users)
    }

    async fn list_assets(&mut self) -> Result<Vec<AssetDBResponse>> {
        let mut assets = self.state.lock().unwrap().assets.clone();
        assets.sort_by(|a, b| b.asset_id.cmp(&a.asset_id));
        Ok(assets)
    }

    async fn find_asset(&mut self, asset_id: &str) -> Result<Option<AssetDBResponse>> {
        let Ok(id) = asset_id.trim().parse::<AssetId>() else {
            return Ok(None);
        };
        let state = self.state.lock().unwrap();
        Ok(state.assets.iter().find(|a| a.asset_id == id).cloned())
    }

    async fn find_user_folder(&mut self, user_id: &str) -> Result<Option<String>> {
        let Ok(id) = user_id.trim().parse::<UserId>() else {
            return Ok(None);
        };
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .find(|u| u.user_id == id)
            .map(|u| u.storage_folder.clone()))
    }

    async fn insert_user(&mut self, request: UserCreateDBRequest) -> Result<UserId> {
        let mut state = self.state.lock().unwrap();
        let user_id = state.users.iter().map(|u| u.user_id).max().unwrap_or(0) + 1;
        state.users.push(UserDBResponse {
            user_id,
            email: request.email,
            last_name: request.last_name,
            first_name: request.first_name,
            storage_folder: request.storage_folder,
        });
        Ok(user_id)
    }

    async fn insert_asset(&mut self, request: AssetCreateDBRequest) -> Result<AssetId> {
        let mut state = self.state.lock().unwrap();

        if state.fail_next_asset_insert {
            state.fail_next_asset_insert = false;
            return Err(DbError::Other(anyhow::anyhow!("injected insert failure")));
        }

        let owner = request
            .user_id
            .trim()
            .parse::<UserId>()
            .ok()
            .filter(|id| state.users.iter().any(|u| u.user_id == *id));
        let Some(user_id) = owner else {
            return Err(DbError::ForeignKeyViolation {
                constraint: Some("assets_ibfk_1".to_string()),
                table: Some("assets".to_string()),
                message: "Cannot add or update a child row".to_string(),
            });
        };

        let asset_id = state.assets.iter().map(|a| a.asset_id).max().unwrap_or(0) + 1;
        state.assets.push(AssetDBResponse {
            asset_id,
            user_id,
            original_name: request.original_name,
            storage_key: request.storage_key,
        });
        Ok(asset_id)
    }
}
