//! SQLite persistence for the facility directory.
//!
//! [`SqliteFacilityStore`] owns one connection. It implements
//! [`FacilityDirectory`](crate::FacilityDirectory) and adds generic CRUD over
//! every [`Record`] type, default-ordered listings, and the derived label
//! lookups.

mod crud;
mod error;
mod queries;
mod record;
mod schema;
mod sqlite;

pub use error::StoreError;
pub use record::Record;
pub use schema::{SCHEMA_VERSION, SchemaError, initialise_schema};
pub use sqlite::SqliteFacilityStore;
