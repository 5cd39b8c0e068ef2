//! rf-db - Database boundary for Rowforge
//!
//! This crate provides the `DialectAdapter` and `Dialect` capability traits,
//! the `MetadataFinder` facade that turns raw catalog rows into typed
//! metadata, an explicit caller-owned `MetadataCache`, and a DuckDB
//! implementation.

pub mod cache;
pub mod duckdb;
pub mod error;
pub mod finder;
pub mod information_schema;
pub mod traits;

pub use cache::MetadataCache;
pub use duckdb::{DuckDbAdapter, DuckDbDialect};
pub use error::{DbError, DbResult};
pub use finder::MetadataFinder;
pub use information_schema::InformationSchemaDialect;
pub use traits::{Dialect, DialectAdapter, MetadataSource};
