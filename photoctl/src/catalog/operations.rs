//! The catalog operations behind each shell command.

use crate::catalog::{Catalog, DownloadOutcome, StatsReport, UploadOutcome};
use crate::db::models::assets::{AssetCreateDBRequest, AssetDBResponse};
use crate::db::models::users::{UserCreateDBRequest, UserDBResponse};
use crate::errors::{Error, Result};
use crate::types::UserId;
use std::path::Path;
use tracing::instrument;
use uuid::Uuid;

impl Catalog {
    /// Gather the combined summary of both stores.
    ///
    /// The bucket is enumerated first, then the two table counts, all on
    /// this session's handles, so one report never mixes values from two
    /// different store sessions.
    #[instrument(skip(self), err)]
    pub async fn stats(&mut self) -> Result<StatsReport> {
        let object_count = self.storage.count_all().await?;
        let user_count = self.metadata.count_users().await?;
        let asset_count = self.metadata.count_assets().await?;

        Ok(StatsReport {
            bucket_name: self.bucket_name.clone(),
            object_count,
            database_label: self.database_label.clone(),
            user_count,
            asset_count,
        })
    }

    /// Every user, most recently created first.
    #[instrument(skip(self), err)]
    pub async fn list_users(&mut self) -> Result<Vec<UserDBResponse>> {
        Ok(self.metadata.list_users().await?)
    }

    /// Every asset, most recently created first.
    #[instrument(skip(self), err)]
    pub async fn list_assets(&mut self) -> Result<Vec<AssetDBResponse>> {
        Ok(self.metadata.list_assets().await?)
    }

    /// Fetch an asset's binary and save it under the asset's original name
    /// inside the download directory.
    ///
    /// The id arrives as the raw string typed at the prompt; an id that
    /// matches no row, numeric or not, is the `NoSuchAsset` outcome. The
    /// fetch lands in a temporary file first and is renamed into place only
    /// after it completes, so a failed transfer never leaves a partial file
    /// under the asset's name. A complete transfer replaces any existing
    /// file of that name.
    #[instrument(skip(self), fields(asset_id = %asset_id), err)]
    pub async fn download(&mut self, asset_id: &str) -> Result<DownloadOutcome> {
        let Some(asset) = self.metadata.find_asset(asset_id).await? else {
            return Ok(DownloadOutcome::NoSuchAsset);
        };

        let temp_path = self.download_dir.join(format!("{}.tmp", Uuid::new_v4()));
        if let Err(err) = self.storage.download(&asset.storage_key, &temp_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(err.into());
        }

        let final_path = self.download_dir.join(&asset.original_name);
        if let Err(err) = tokio::fs::rename(&temp_path, &final_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(err.into());
        }

        Ok(DownloadOutcome::Saved {
            original_name: asset.original_name,
            path: final_path,
        })
    }

    /// Store a local file in the bucket under the owning user's folder and
    /// record it in the assets table.
    ///
    /// The local path is checked before either store is contacted. The
    /// generated key is `<folder>/<uuid>.jpg` whatever the source file
    /// holds, matching the key shape the rest of the catalog assumes. The
    /// object is written before the row; if the insert then fails, the
    /// error names the now-orphaned key.
    #[instrument(skip(self), fields(user_id = %user_id), err)]
    pub async fn upload(&mut self, local_path: &str, user_id: &str) -> Result<UploadOutcome> {
        if !Path::new(local_path).is_file() {
            return Ok(UploadOutcome::MissingLocalFile);
        }

        let Some(folder) = self.metadata.find_user_folder(user_id).await? else {
            return Ok(UploadOutcome::NoSuchUser);
        };

        let key = format!("{}/{}.jpg", folder, Uuid::new_v4());
        let storage_key = self.storage.upload(Path::new(local_path), &key).await?;

        let request = AssetCreateDBRequest {
            user_id: user_id.to_string(),
            original_name: local_path.to_string(),
            storage_key: storage_key.clone(),
        };

        let asset_id = match self.metadata.insert_asset(request).await {
            Ok(asset_id) => asset_id,
            Err(source) => {
                return Err(Error::OrphanedObject {
                    storage_key,
                    source,
                });
            }
        };

        Ok(UploadOutcome::Stored {
            asset_id,
            storage_key,
        })
    }

    /// Create a user with a freshly generated storage folder and return the
    /// assigned id.
    #[instrument(skip(self, email, last_name, first_name), err)]
    pub async fn add_user(
        &mut self,
        email: &str,
        last_name: &str,
        first_name: &str,
    ) -> Result<UserId> {
        let request = UserCreateDBRequest {
            email: email.to_string(),
            last_name: last_name.to_string(),
            first_name: first_name.to_string(),
            storage_folder: Uuid::new_v4().to_string(),
        };

        let user_id = self.metadata.insert_user(request).await?;
        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LocalObjectStorage, ObjectStorage, StorageError};
    use crate::test_utils::MemoryMetadataStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_catalog(
        objects: &TempDir,
        downloads: &TempDir,
    ) -> (Catalog, MemoryMetadataStore, Arc<LocalObjectStorage>) {
        let metadata = MemoryMetadataStore::new();
        let storage = Arc::new(LocalObjectStorage::new(objects.path().to_path_buf()));

        let catalog = Catalog::builder()
            .metadata(Box::new(metadata.clone()))
            .storage(storage.clone())
            .bucket_name("photoapp-unit".to_string())
            .database_label("db.unit.local".to_string())
            .download_dir(downloads.path().to_path_buf())
            .build();

        (catalog, metadata, storage)
    }

    async fn write_source(dir: &TempDir, name: &str, bytes: &[u8]) -> String {
        let path = dir.path().join(name);
        tokio::fs::write(&path, bytes).await.unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test_log::test(tokio::test)]
    async fn test_add_user_assigns_ascending_ids_and_lists_newest_first() {
        let objects = tempfile::tempdir().unwrap();
        let downloads = tempfile::tempdir().unwrap();
        let (mut catalog, _metadata, _storage) = test_catalog(&objects, &downloads);

        let first = catalog
            .add_user("ada@example.com", "lovelace", "ada")
            .await
            .unwrap();
        let second = catalog
            .add_user("grace@example.com", "hopper", "grace")
            .await
            .unwrap();
        assert!(second > first);

        let users = catalog.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].user_id, second);
        assert_eq!(users[0].email, "grace@example.com");
        assert_eq!(users[0].last_name, "hopper");
        assert_eq!(users[0].first_name, "grace");
        assert_eq!(users[1].user_id, first);

        // Folders are freshly generated UUIDs, distinct per user
        assert!(users[0].storage_folder.parse::<Uuid>().is_ok());
        assert_ne!(users[0].storage_folder, users[1].storage_folder);
    }

    #[test_log::test(tokio::test)]
    async fn test_upload_stores_under_user_folder_with_jpg_suffix() {
        let objects = tempfile::tempdir().unwrap();
        let downloads = tempfile::tempdir().unwrap();
        let sources = tempfile::tempdir().unwrap();
        let (mut catalog, _metadata, storage) = test_catalog(&objects, &downloads);

        let user_id = catalog
            .add_user("ada@example.com", "lovelace", "ada")
            .await
            .unwrap();
        let folder = catalog.list_users().await.unwrap()[0].storage_folder.clone();

        let source = write_source(&sources, "holiday.png", b"not really a png").await;
        let outcome = catalog.upload(&source, &user_id.to_string()).await.unwrap();

        let UploadOutcome::Stored {
            asset_id,
            storage_key,
        } = outcome
        else {
            panic!("expected Stored, got {outcome:?}");
        };

        // Key shape: <folder>/<uuid>.jpg regardless of the source extension
        let middle = storage_key
            .strip_prefix(&format!("{folder}/"))
            .expect("key must start with the user's folder")
            .strip_suffix(".jpg")
            .expect("key must end with .jpg");
        assert!(middle.parse::<Uuid>().is_ok());

        assert_eq!(storage.count_all().await.unwrap(), 1);

        let assets = catalog.list_assets().await.unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].asset_id, asset_id);
        assert_eq!(assets[0].user_id, user_id);
        assert_eq!(assets[0].original_name, source);
        assert_eq!(assets[0].storage_key, storage_key);

        // A second upload of the same file gets its own key
        let again = catalog.upload(&source, &user_id.to_string()).await.unwrap();
        let UploadOutcome::Stored {
            storage_key: second_key,
            ..
        } = again
        else {
            panic!("expected Stored, got {again:?}");
        };
        assert_ne!(second_key, storage_key);
    }

    #[test_log::test(tokio::test)]
    async fn test_download_round_trip_preserves_name_and_bytes() {
        let objects = tempfile::tempdir().unwrap();
        let downloads = tempfile::tempdir().unwrap();
        let sources = tempfile::tempdir().unwrap();
        let (mut catalog, _metadata, _storage) = test_catalog(&objects, &downloads);

        let user_id = catalog
            .add_user("ada@example.com", "lovelace", "ada")
            .await
            .unwrap();

        let bytes = b"picture body bytes";
        let source = write_source(&sources, "photo.png", bytes).await;
        catalog.upload(&source, &user_id.to_string()).await.unwrap();

        // Remove the source so only the stored object can bring it back
        tokio::fs::remove_file(&source).await.unwrap();

        let asset_id = catalog.list_assets().await.unwrap()[0].asset_id;
        let outcome = catalog.download(&asset_id.to_string()).await.unwrap();

        let DownloadOutcome::Saved {
            original_name,
            path,
        } = outcome
        else {
            panic!("expected Saved, got {outcome:?}");
        };
        assert_eq!(original_name, source);

        let fetched = tokio::fs::read(&path).await.unwrap();
        assert_eq!(fetched, bytes);
    }

    #[test_log::test(tokio::test)]
    async fn test_download_replaces_existing_file_of_same_name() {
        let objects = tempfile::tempdir().unwrap();
        let downloads = tempfile::tempdir().unwrap();
        let sources = tempfile::tempdir().unwrap();
        let (mut catalog, _metadata, _storage) = test_catalog(&objects, &downloads);

        let user_id = catalog
            .add_user("ada@example.com", "lovelace", "ada")
            .await
            .unwrap();

        let source = write_source(&sources, "photo.png", b"stored bytes").await;
        catalog.upload(&source, &user_id.to_string()).await.unwrap();

        // Clobber the local file, then download over it
        tokio::fs::write(&source, b"newer local edits").await.unwrap();

        let asset_id = catalog.list_assets().await.unwrap()[0].asset_id;
        catalog.download(&asset_id.to_string()).await.unwrap();

        let fetched = tokio::fs::read(&source).await.unwrap();
        assert_eq!(fetched, b"stored bytes");
    }

    #[test_log::test(tokio::test)]
    async fn test_download_failed_fetch_leaves_no_files() {
        let objects = tempfile::tempdir().unwrap();
        let downloads = tempfile::tempdir().unwrap();
        let sources = tempfile::tempdir().unwrap();
        let (mut catalog, _metadata, _storage) = test_catalog(&objects, &downloads);

        let user_id = catalog
            .add_user("ada@example.com", "lovelace", "ada")
            .await
            .unwrap();

        let source = write_source(&sources, "pic.png", b"pic").await;
        catalog.upload(&source, &user_id.to_string()).await.unwrap();
        tokio::fs::remove_file(&source).await.unwrap();

        // The row survives but the object is gone, so the fetch fails
        let asset = catalog.list_assets().await.unwrap().remove(0);
        tokio::fs::remove_file(objects.path().join(&asset.storage_key))
            .await
            .unwrap();

        let err = catalog
            .download(&asset.asset_id.to_string())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::NotFound { .. })
        ));

        // No partial temp file, no file under the original name
        let leftovers = std::fs::read_dir(downloads.path()).unwrap().count();
        assert_eq!(leftovers, 0);
        assert!(!Path::new(&source).exists());
    }

    #[test_log::test(tokio::test)]
    async fn test_download_unknown_asset_touches_nothing() {
        let objects = tempfile::tempdir().unwrap();
        let downloads = tempfile::tempdir().unwrap();
        let (mut catalog, _metadata, _storage) = test_catalog(&objects, &downloads);

        let outcome = catalog.download("999").await.unwrap();
        assert_eq!(outcome, DownloadOutcome::NoSuchAsset);

        // Non-numeric ids simply match no row
        let outcome = catalog.download("not-a-number").await.unwrap();
        assert_eq!(outcome, DownloadOutcome::NoSuchAsset);

        let leftovers = std::fs::read_dir(downloads.path()).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[test_log::test(tokio::test)]
    async fn test_upload_missing_local_file_contacts_neither_store() {
        let objects = tempfile::tempdir().unwrap();
        let downloads = tempfile::tempdir().unwrap();
        let (mut catalog, _metadata, storage) = test_catalog(&objects, &downloads);

        let outcome = catalog
            .upload("/definitely/not/here.png", "1")
            .await
            .unwrap();
        assert_eq!(outcome, UploadOutcome::MissingLocalFile);

        assert_eq!(storage.count_all().await.unwrap(), 0);
        assert!(catalog.list_assets().await.unwrap().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_upload_unknown_user_stores_nothing() {
        let objects = tempfile::tempdir().unwrap();
        let downloads = tempfile::tempdir().unwrap();
        let sources = tempfile::tempdir().unwrap();
        let (mut catalog, _metadata, storage) = test_catalog(&objects, &downloads);

        let source = write_source(&sources, "cat.png", b"cat").await;
        let outcome = catalog.upload(&source, "42").await.unwrap();
        assert_eq!(outcome, UploadOutcome::NoSuchUser);

        assert_eq!(storage.count_all().await.unwrap(), 0);
        assert!(catalog.list_assets().await.unwrap().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_stats_counts_match_listings() {
        let objects = tempfile::tempdir().unwrap();
        let downloads = tempfile::tempdir().unwrap();
        let sources = tempfile::tempdir().unwrap();
        let (mut catalog, _metadata, _storage) = test_catalog(&objects, &downloads);

        let first = catalog
            .add_user("ada@example.com", "lovelace", "ada")
            .await
            .unwrap();
        catalog
            .add_user("grace@example.com", "hopper", "grace")
            .await
            .unwrap();

        let source = write_source(&sources, "pic.png", b"pic").await;
        catalog.upload(&source, &first.to_string()).await.unwrap();

        let report = catalog.stats().await.unwrap();
        assert_eq!(report.bucket_name, "photoapp-unit");
        assert_eq!(report.database_label, "db.unit.local");
        assert_eq!(report.user_count, 2);
        assert_eq!(report.asset_count, 1);
        assert_eq!(report.object_count, 1);

        assert_eq!(
            report.user_count as usize,
            catalog.list_users().await.unwrap().len()
        );
        assert_eq!(
            report.asset_count as usize,
            catalog.list_assets().await.unwrap().len()
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_failed_insert_after_upload_reports_orphaned_key() {
        let objects = tempfile::tempdir().unwrap();
        let downloads = tempfile::tempdir().unwrap();
        let sources = tempfile::tempdir().unwrap();
        let (mut catalog, metadata, storage) = test_catalog(&objects, &downloads);

        let user_id = catalog
            .add_user("ada@example.com", "lovelace", "ada")
            .await
            .unwrap();
        let folder = catalog.list_users().await.unwrap()[0].storage_folder.clone();

        let source = write_source(&sources, "pic.png", b"pic").await;
        metadata.fail_next_asset_insert();

        let err = catalog
            .upload(&source, &user_id.to_string())
            .await
            .unwrap_err();

        let Error::OrphanedObject { storage_key, .. } = err else {
            panic!("expected OrphanedObject, got {err:?}");
        };
        assert!(storage_key.starts_with(&format!("{folder}/")));

        // The binary landed but no row references it
        assert_eq!(storage.count_all().await.unwrap(), 1);
        assert!(catalog.list_assets().await.unwrap().is_empty());
    }
}
