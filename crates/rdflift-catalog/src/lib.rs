//! Database catalogs for schema snapshots and row reads
//!
//! Catalogs read table metadata from the database's information_schema and
//! table rows, and [`capture`] turns them into a [`rdflift_core::DatabaseSnapshot`]
//! the synchronous mapping engines can consume.
//!
//! ## Features
//!
//! Enable database support via Cargo features:
//! - `postgres` - PostgreSQL support
//!
//! ## Example
//!
//! ```rust,ignore
//! use rdflift_catalog::{capture, PostgresCatalog};
//!
//! let catalog = PostgresCatalog::from_connection_string(&url, "public").await?;
//! let snapshot = capture(&catalog, 1000).await?;
//! ```

pub mod adapter;
pub mod mock;
pub mod postgres;
pub mod snapshot;

pub use adapter::{quote_ident, DatabaseCatalog, SchemaAccessError, TableIdentifier};
pub use mock::{MockCatalog, MockCatalogBuilder};
pub use postgres::PostgresCatalog;
pub use snapshot::capture;
