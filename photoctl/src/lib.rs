//! # photoctl
//!
//! Command-line photo catalog over an S3 bucket and a MySQL database.
//!
//! ## Overview
//!
//! photoctl mediates between the two halves of a photo store. Image
//! binaries live in an object storage bucket under per-user folders;
//! users and asset metadata live in two MySQL tables. An interactive
//! menu drives the catalog: combined statistics across both stores,
//! listings of both tables, downloads (optionally rendered inline in
//! the terminal), uploads, and user creation.
//!
//! ## Architecture
//!
//! ```text
//! shell            menu loop and all console presentation
//!   │
//! catalog          one operation per command, typed outcomes
//!   ├── MetadataStore ──> MySQL (users, assets)
//!   └── ObjectStorage ──> S3 bucket or local directory
//! ```
//!
//! The shell owns every prompt and report line. The catalog owns the
//! semantics and returns typed outcomes; expected absences (unknown ids,
//! missing local files) are outcome variants, not errors. The two store
//! traits are the only seams that touch the outside world, which is also
//! what the test suite swaps in doubles for.
//!
//! ## Quick Start
//!
//! ```bash
//! photoctl -f photoapp-config.yaml
//! # or let the session ask which config file to use:
//! photoctl
//! ```

pub mod catalog;
pub mod config;
pub mod db;
pub mod errors;
pub mod shell;
pub mod storage;
pub mod telemetry;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{Args, Config};
pub use errors::{Error, Result};

use crate::catalog::Catalog;
use crate::db::handlers::MySqlMetadataStore;
use std::path::Path;

/// Run one interactive catalog session.
///
/// Resolves the config file (from the CLI flag or the interactive prompt),
/// prepares the download directory, brings up both stores, and hands
/// control to the shell. Bootstrap failures (missing file, bad config,
/// download directory, storage init, unreachable database) print their
/// plain one-line message and end the process with status 0; the shell
/// loop then owns everything else.
pub async fn run(config_flag: Option<String>) -> anyhow::Result<()> {
    println!("** Welcome to PhotoApp **");
    println!();

    let mut lines = shell::input_lines();
    let mut out = std::io::stdout();

    let config_file = match config_flag {
        Some(path) => path,
        None => shell::prompt_for_config_file(&mut lines, &mut out).await?,
    };

    if !Path::new(&config_file).is_file() {
        println!("**ERROR: config file ' {config_file} ' does not exist, exiting");
        return Ok(());
    }

    let config = match Config::load(&config_file) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, file = %config_file, "configuration rejected");
            println!("**ERROR: unable to load config file, exiting");
            return Ok(());
        }
    };

    if let Err(err) = tokio::fs::create_dir_all(&config.download_dir).await {
        tracing::error!(error = %err, dir = %config.download_dir.display(), "download directory creation failed");
        println!("**ERROR: unable to create download directory, exiting");
        return Ok(());
    }

    let storage = match storage::create_object_storage(&config).await {
        Ok(storage) => storage,
        Err(err) => {
            tracing::error!(error = %err, "object storage initialization failed");
            println!("**ERROR: unable to initialize object storage, exiting");
            return Ok(());
        }
    };

    let conn = match db::connect(&config.rds).await {
        Ok(conn) => conn,
        Err(err) => {
            tracing::error!(error = %err, "database connection failed");
            println!("**ERROR: unable to connect to database, exiting");
            return Ok(());
        }
    };

    let mut catalog = Catalog::builder()
        .metadata(Box::new(MySqlMetadataStore::new(conn)))
        .storage(storage)
        .bucket_name(config.s3.bucket_name.clone())
        .database_label(config.rds.endpoint.clone())
        .download_dir(config.download_dir.clone())
        .build();

    shell::run_shell(&mut catalog, &mut lines, &mut out).await?;

    println!();
    println!("** done **");

    Ok(())
}
