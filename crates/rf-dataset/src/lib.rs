//! rf-dataset - Dataset assembly for Rowforge
//!
//! This crate turns independently authored fixture definitions into a single
//! consistent dataset per table: metadata is loaded through `rf-db`, tables
//! are ordered through the `rf-core` dependency graph, rows are merged by
//! primary-key identity, and the result is rendered as INSERT/DELETE/UPDATE
//! statement text for an external execution layer.

pub mod dataset;
pub mod error;
pub mod generator;
pub mod sql;

pub use dataset::DatasetDef;
pub use error::{GenError, GenResult};
pub use generator::{Dataset, DatasetGenerator, RowPatch, TableDataset};
pub use sql::{delete_statements, insert_statements};
