//! Configuration loading and validation.
//!
//! Configuration comes from a YAML file merged with `PHOTOCTL_`-prefixed
//! environment variables, so any key can be overridden without editing the
//! file (`PHOTOCTL_RDS__PORT_NUMBER=3307`, with `__` separating nested
//! keys). The file path comes from the CLI or, when no flag is given, from
//! the interactive prompt at startup.

use crate::errors::Error;
use clap::Parser;
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Config file offered when the interactive prompt is answered with ENTER
pub const DEFAULT_CONFIG_FILE: &str = "photoapp-config.yaml";

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file. When omitted, the session asks for one
    /// interactively before connecting to anything.
    #[arg(short = 'f', long, env = "PHOTOCTL_CONFIG")]
    pub config: Option<String>,

    /// Validate configuration and exit without touching either store.
    /// Useful for CI/CD pipelines to catch config errors before deployment.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// This is the root structure loaded from YAML and environment variables.
/// All fields have defaults defined in the `Default` implementation; the
/// required connection fields are checked by [`Config::validate`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Object store settings
    pub s3: S3Config,
    /// Relational store settings
    pub rds: RdsConfig,
    /// Which object storage backend to use
    pub storage: StorageConfig,
    /// Directory downloaded assets are written into
    pub download_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            s3: S3Config::default(),
            rds: RdsConfig::default(),
            storage: StorageConfig::default(),
            download_dir: PathBuf::from("."),
        }
    }
}

/// Settings for the S3 bucket holding the asset binaries.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct S3Config {
    /// Bucket name
    pub bucket_name: String,
    /// Credential profile used for the session
    pub profile: String,
    /// Optional region override; otherwise the profile or environment
    /// supplies it
    pub region: Option<String>,
    /// Optional custom endpoint, for S3-compatible stores
    pub endpoint_url: Option<Url>,
    /// Optional shared-credentials file holding the profile
    pub credentials_file: Option<PathBuf>,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket_name: String::new(),
            profile: "s3readwrite".to_string(),
            region: None,
            endpoint_url: None,
            credentials_file: None,
        }
    }
}

/// Settings for the MySQL database holding the catalog metadata.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RdsConfig {
    /// Database server hostname
    pub endpoint: String,
    /// Database server port
    pub port_number: u16,
    /// Login user
    pub user_name: String,
    /// Login password
    pub user_pwd: String,
    /// Schema holding the users and assets tables
    pub db_name: String,
}

impl Default for RdsConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            port_number: 3306,
            user_name: String::new(),
            user_pwd: String::new(),
            db_name: String::new(),
        }
    }
}

/// Object storage backend selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Backend kind
    pub backend: StorageBackend,
    /// Root directory for the `local` backend
    pub local_root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::S3,
            local_root: PathBuf::from("./objects"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Objects live in an S3 bucket
    S3,
    /// Objects live in a local directory tree
    Local,
}

impl Config {
    pub fn load(path: &str) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(path).extract()?;
        config
            .validate()
            .map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(path: &str) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(path))
            // Environment variables can still override specific values.
            // PHOTOCTL_CONFIG belongs to the CLI, not to the config tree.
            .merge(Env::prefixed("PHOTOCTL_").ignore(&["config"]).split("__"))
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if self.rds.endpoint.is_empty() {
            return Err(Error::Config {
                message: "rds.endpoint must be set".to_string(),
            });
        }
        if self.rds.port_number == 0 {
            return Err(Error::Config {
                message: "rds.port_number must be non-zero".to_string(),
            });
        }
        if self.rds.user_name.is_empty() {
            return Err(Error::Config {
                message: "rds.user_name must be set".to_string(),
            });
        }
        if self.rds.db_name.is_empty() {
            return Err(Error::Config {
                message: "rds.db_name must be set".to_string(),
            });
        }
        if matches!(self.storage.backend, StorageBackend::S3) && self.s3.bucket_name.is_empty() {
            return Err(Error::Config {
                message: "s3.bucket_name must be set when the s3 backend is selected".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_full_config_from_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
s3:
  bucket_name: photoapp-bucket
  profile: s3readwrite
  region: us-east-2
rds:
  endpoint: db.example.internal
  port_number: 3306
  user_name: photoapp
  user_pwd: secret
  db_name: photoapp
download_dir: ./downloads
"#,
            )?;

            let config = Config::load("test.yaml")?;

            assert_eq!(config.s3.bucket_name, "photoapp-bucket");
            assert_eq!(config.s3.profile, "s3readwrite");
            assert_eq!(config.s3.region.as_deref(), Some("us-east-2"));
            assert!(config.s3.endpoint_url.is_none());
            assert!(config.s3.credentials_file.is_none());

            assert_eq!(config.rds.endpoint, "db.example.internal");
            assert_eq!(config.rds.port_number, 3306);
            assert_eq!(config.rds.user_name, "photoapp");
            assert_eq!(config.rds.user_pwd, "secret");
            assert_eq!(config.rds.db_name, "photoapp");

            assert_eq!(config.storage.backend, StorageBackend::S3);
            assert_eq!(config.download_dir, PathBuf::from("./downloads"));

            Ok(())
        });
    }

    #[test]
    fn test_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
s3:
  bucket_name: photoapp-bucket
rds:
  endpoint: db.example.internal
  user_name: photoapp
  user_pwd: secret
  db_name: photoapp
"#,
            )?;

            jail.set_env("PHOTOCTL_RDS__PORT_NUMBER", "3307");
            jail.set_env("PHOTOCTL_S3__BUCKET_NAME", "other-bucket");

            let config = Config::load("test.yaml")?;

            // Env vars should override
            assert_eq!(config.rds.port_number, 3307);
            assert_eq!(config.s3.bucket_name, "other-bucket");

            // YAML values should be preserved
            assert_eq!(config.rds.endpoint, "db.example.internal");
            assert_eq!(config.rds.db_name, "photoapp");

            Ok(())
        });
    }

    #[test]
    fn test_cli_env_var_is_not_a_config_key() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
s3:
  bucket_name: photoapp-bucket
rds:
  endpoint: db.example.internal
  user_name: photoapp
  user_pwd: secret
  db_name: photoapp
"#,
            )?;

            // Consumed by clap, must not leak into the config tree
            jail.set_env("PHOTOCTL_CONFIG", "somewhere-else.yaml");

            let config = Config::load("test.yaml")?;
            assert_eq!(config.s3.bucket_name, "photoapp-bucket");

            Ok(())
        });
    }

    #[test]
    fn test_missing_endpoint_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
s3:
  bucket_name: photoapp-bucket
rds:
  user_name: photoapp
  db_name: photoapp
"#,
            )?;

            let result = Config::load("test.yaml");
            assert!(result.is_err());

            Ok(())
        });
    }

    #[test]
    fn test_unknown_key_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
s3:
  bucket_name: photoapp-bucket
  bucketname_typo: oops
rds:
  endpoint: db.example.internal
  user_name: photoapp
  user_pwd: secret
  db_name: photoapp
"#,
            )?;

            let result = Config::load("test.yaml");
            assert!(result.is_err());

            Ok(())
        });
    }

    #[test]
    fn test_local_backend_needs_no_bucket() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
storage:
  backend: local
  local_root: ./objects
rds:
  endpoint: db.example.internal
  user_name: photoapp
  user_pwd: secret
  db_name: photoapp
"#,
            )?;

            let config = Config::load("test.yaml")?;
            assert_eq!(config.storage.backend, StorageBackend::Local);
            assert!(config.s3.bucket_name.is_empty());

            Ok(())
        });
    }
}
