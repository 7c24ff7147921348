//! Common type definitions.
//!
//! The catalog's entity identifiers are auto-increment integers assigned by
//! MySQL. They are aliased here so signatures read in domain terms:
//!
//! - [`UserId`]: row id in the `users` table
//! - [`AssetId`]: row id in the `assets` table

// Type aliases for IDs
pub type UserId = i64;
pub type AssetId = i64;
