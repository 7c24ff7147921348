//! Database layer for catalog metadata.
//!
//! Layered like so:
//!
//! ```text
//! ┌────────────────────┐
//! │ catalog operations │  Business logic
//! └─────────┬──────────┘
//!           │ uses
//! ┌─────────▼──────────┐
//! │   MetadataStore    │  Facade consumed by the operations
//! ├────────────────────┤
//! │    repositories    │  One per table (Users, Assets)
//! ├────────────────────┤
//! │      models        │  Row structs and insert payloads
//! └─────────┬──────────┘
//!           │ single connection
//! ┌─────────▼──────────┐
//! │       MySQL        │
//! └────────────────────┘
//! ```
//!
//! # Schema
//!
//! The database is provisioned outside this tool. The repositories assume
//! the two tables below already exist:
//!
//! ```sql
//! CREATE TABLE users (
//!     userid        BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
//!     email         VARCHAR(128) NOT NULL,
//!     lastname      VARCHAR(64)  NOT NULL,
//!     firstname     VARCHAR(64)  NOT NULL,
//!     bucketfolder  VARCHAR(48)  NOT NULL UNIQUE
//! );
//!
//! CREATE TABLE assets (
//!     assetid    BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
//!     userid     BIGINT NOT NULL,
//!     assetname  VARCHAR(128) NOT NULL,
//!     bucketkey  VARCHAR(128) NOT NULL UNIQUE,
//!     FOREIGN KEY (userid) REFERENCES users (userid)
//! );
//! ```
//!
//! Column names stay in their legacy form; SELECT lists alias them onto the
//! domain field names the models use.

pub mod errors;
pub mod handlers;
pub mod models;

use crate::config::RdsConfig;
use errors::Result;
use sqlx::mysql::MySqlConnectOptions;
use sqlx::ConnectOptions;
use sqlx::MySqlConnection;

/// Open the one connection used for the whole session.
///
/// There is no pool. The shell runs strictly sequentially, so a single
/// connection is always free when an operation needs it, and LAST_INSERT_ID
/// lookups stay scoped to the insert they follow.
pub async fn connect(config: &RdsConfig) -> Result<MySqlConnection> {
    let options = MySqlConnectOptions::new()
        .host(&config.endpoint)
        .port(config.port_number)
        .username(&config.user_name)
        .password(&config.user_pwd)
        .database(&config.db_name);

    tracing::debug!(
        endpoint = %config.endpoint,
        database = %config.db_name,
        "connecting to MySQL"
    );

    let conn = options.connect().await?;
    Ok(conn)
}
