//! Repository implementations for database access.
//!
//! One repository per table, each implementing the base [`Repository`]
//! trait, plus the [`MetadataStore`] facade the operations layer consumes:
//!
//! - [`users`]: user rows and storage folder lookups
//! - [`assets`]: asset rows and storage key lookups
//! - [`store`]: the [`MetadataStore`] trait and its MySQL implementation

pub mod assets;
pub mod repository;
pub mod store;
pub mod users;

pub use assets::Assets;
pub use repository::Repository;
pub use store::{MetadataStore, MySqlMetadataStore};
pub use users::Users;
