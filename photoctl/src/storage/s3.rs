//! S3 object storage backend.

use crate::config::S3Config;
use crate::storage::{ObjectStorage, Result, StorageError};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_runtime::env_config::file::{EnvConfigFileKind, EnvConfigFiles};
use aws_sdk_s3::primitives::ByteStream;
use std::path::{Path, PathBuf};

/// Object storage over an S3 bucket.
///
/// Credentials come from the named profile. A custom credentials file and a
/// custom endpoint are supported so the backend also works against
/// S3-compatible stores; with a custom endpoint the client switches to
/// path-style addressing.
pub struct S3ObjectStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStorage {
    /// Build a client for the configured bucket and profile.
    pub async fn connect(config: &S3Config) -> Result<Self> {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).profile_name(&config.profile);

        if let Some(credentials_file) = &config.credentials_file {
            let profile_files = EnvConfigFiles::builder()
                .with_file(EnvConfigFileKind::Credentials, credentials_file)
                .build();
            loader = loader.profile_files(profile_files);
        }

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }

        let shared_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(endpoint_url) = &config.endpoint_url {
            builder = builder
                .endpoint_url(endpoint_url.as_str())
                .force_path_style(true);
        }

        let client = aws_sdk_s3::Client::from_conf(builder.build());

        Ok(Self {
            client,
            bucket: config.bucket_name.clone(),
        })
    }
}

fn sdk_err<E>(err: E, context: String) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StorageError::Other(anyhow::Error::new(err).context(context))
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn upload(&self, local_path: &Path, key: &str) -> Result<String> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| sdk_err(e, format!("reading '{}'", local_path.display())))?;

        let content_type = mime_guess::from_path(local_path).first_or_octet_stream();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type.as_ref())
            .body(body)
            .send()
            .await
            .map_err(|e| sdk_err(e, format!("S3 put_object for key '{key}'")))?;

        tracing::debug!(key = %key, "stored object in S3");
        Ok(key.to_string())
    }

    async fn download(&self, key: &str, dest_path: &Path) -> Result<PathBuf> {
        let response = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                if err
                    .as_service_error()
                    .map(|e| e.is_no_such_key())
                    .unwrap_or(false)
                {
                    return Err(StorageError::NotFound {
                        key: key.to_string(),
                    });
                }
                return Err(sdk_err(err, format!("S3 get_object for key '{key}'")));
            }
        };

        let data: bytes::Bytes = response
            .body
            .collect()
            .await
            .map_err(|e| sdk_err(e, format!("streaming S3 object '{key}'")))?
            .into_bytes();

        tokio::fs::write(dest_path, &data).await?;

        tracing::debug!(key = %key, dest = %dest_path.display(), "fetched object from S3");
        Ok(dest_path.to_path_buf())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                if err
                    .as_service_error()
                    .map(|e| e.is_not_found())
                    .unwrap_or(false)
                {
                    Ok(false)
                } else {
                    Err(sdk_err(err, format!("S3 head_object for key '{key}'")))
                }
            }
        }
    }

    async fn count_all(&self) -> Result<u64> {
        let mut total: u64 = 0;
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page =
                page.map_err(|e| sdk_err(e, format!("S3 list_objects_v2 on '{}'", self.bucket)))?;
            total += page.contents().len() as u64;
        }

        Ok(total)
    }
}
