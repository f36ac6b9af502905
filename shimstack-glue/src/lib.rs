//! AWS Glue Data Catalog emulation for ShimStack
//!
//! Provides an in-memory two-level catalog (database -> table) with support for:
//! - CreateDatabase, GetDatabase, GetDatabases, DeleteDatabase (cascading)
//! - CreateTable, GetTable, GetTables, UpdateTable, DeleteTable
//! - Overwrite-or-reject handling of duplicate creates

pub mod model;
mod storage;


pub use model::{Column, Database, DatabaseInput, StorageDescriptor, Table, TableInput};
pub use storage::{DuplicatePolicy, GlueError, GlueStorage};
