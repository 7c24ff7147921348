//! Database record models matching the catalog table schemas.
//!
//! Each struct here corresponds to a row of one of the two tables, or to the
//! payload of an insert. Row models derive `sqlx::FromRow`; the repositories
//! alias the legacy column names (`userid`, `bucketfolder`, ...) onto the
//! domain field names in their SELECT lists, so the structs read in domain
//! vocabulary while the schema keeps its original shape.
//!
//! - [`users`]: catalog users and their storage folders
//! - [`assets`]: uploaded assets and their storage keys

pub mod assets;
pub mod users;
