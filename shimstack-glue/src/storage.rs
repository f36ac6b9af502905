//! Glue catalog in-memory storage

use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::{Ref, RefMut};
use dashmap::DashMap;
use serde::Deserialize;
use shimstack_core::{clock, EntityKind, ErrorCode};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{Column, Database, DatabaseInput, Table, TableInput};

/// Glue catalog errors
#[derive(Debug, Error)]
pub enum GlueError {
    #[error("{kind} not found: {name}")]
    EntityNotFound { kind: EntityKind, name: String },

    #[error("{kind} already exists: {name}")]
    AlreadyExists { kind: EntityKind, name: String },
}

impl GlueError {
    fn database_not_found(name: &str) -> Self {
        Self::EntityNotFound {
            kind: EntityKind::Database,
            name: name.to_string(),
        }
    }

    fn table_not_found(database_name: &str, name: &str) -> Self {
        Self::EntityNotFound {
            kind: EntityKind::Table,
            name: format!("{}.{}", database_name, name),
        }
    }

    /// Exception name the real catalog reports for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::EntityNotFound { .. } => ErrorCode::EntityNotFoundException,
            Self::AlreadyExists { .. } => ErrorCode::AlreadyExistsException,
        }
    }
}

/// What a create does when the database or table already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Replace the existing entity silently
    #[default]
    Overwrite,
    /// Fail with AlreadyExists, as the real catalog does
    Reject,
}

/// A database together with the tables it owns
#[derive(Debug)]
struct DatabaseEntry {
    database: Database,
    tables: HashMap<String, Table>,
}

impl DatabaseEntry {
    fn new(database: Database) -> Self {
        Self {
            database,
            tables: HashMap::new(),
        }
    }
}

/// In-memory catalog storage
///
/// Tables live inside their database's entry, so a table can never outlive
/// its database and deleting a database removes its tables in one step.
#[derive(Debug, Default)]
pub struct GlueStorage {
    /// Databases indexed by name
    databases: DashMap<String, DatabaseEntry>,
    duplicate_policy: DuplicatePolicy,
}

impl GlueStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duplicate_policy(duplicate_policy: DuplicatePolicy) -> Self {
        Self {
            databases: DashMap::new(),
            duplicate_policy,
        }
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }

    // === Databases ===

    /// Get a database by name
    pub fn get_database(&self, name: &str) -> Result<Database, GlueError> {
        debug!(database = %name, "GetDatabase");
        self.database_entry(name).map(|entry| entry.database.clone())
    }

    /// List all databases
    pub fn list_databases(&self) -> Vec<Database> {
        self.databases
            .iter()
            .map(|entry| entry.value().database.clone())
            .collect()
    }

    /// Create a database with an empty table namespace
    pub fn create_database(&self, input: DatabaseInput) -> Result<Database, GlueError> {
        let database = Database::from_input(input, clock::now());

        match self.databases.entry(database.name.clone()) {
            Entry::Occupied(mut occupied) => {
                if self.duplicate_policy == DuplicatePolicy::Reject {
                    return Err(GlueError::AlreadyExists {
                        kind: EntityKind::Database,
                        name: database.name,
                    });
                }
                info!(database = %database.name, "Replacing existing database");
                occupied.insert(DatabaseEntry::new(database.clone()));
            }
            Entry::Vacant(vacant) => {
                info!(database = %database.name, "Creating database");
                vacant.insert(DatabaseEntry::new(database.clone()));
            }
        }

        Ok(database)
    }

    /// Delete a database and every table it owns
    pub fn delete_database(&self, name: &str) -> Result<(), GlueError> {
        let (_, entry) = self
            .databases
            .remove(name)
            .ok_or_else(|| GlueError::database_not_found(name))?;

        info!(database = %name, tables = entry.tables.len(), "Deleted database");
        Ok(())
    }

    /// Check whether a database exists
    pub fn database_exists(&self, name: &str) -> bool {
        self.databases.contains_key(name)
    }

    // === Tables ===

    /// Get a table by database and name
    pub fn get_table(&self, database_name: &str, name: &str) -> Result<Table, GlueError> {
        debug!(database = %database_name, table = %name, "GetTable");
        let entry = self.database_entry(database_name)?;
        entry
            .tables
            .get(name)
            .cloned()
            .ok_or_else(|| GlueError::table_not_found(database_name, name))
    }

    /// List all tables in a database
    pub fn list_tables(&self, database_name: &str) -> Result<Vec<Table>, GlueError> {
        let entry = self.database_entry(database_name)?;
        Ok(entry.tables.values().cloned().collect())
    }

    /// Create a table, stamping both create and update time
    pub fn create_table(&self, database_name: &str, input: TableInput) -> Result<Table, GlueError> {
        let mut entry = self.database_entry_mut(database_name)?;

        if entry.tables.contains_key(&input.name) {
            if self.duplicate_policy == DuplicatePolicy::Reject {
                return Err(GlueError::AlreadyExists {
                    kind: EntityKind::Table,
                    name: format!("{}.{}", database_name, input.name),
                });
            }
            info!(database = %database_name, table = %input.name, "Replacing existing table");
        }

        let now = clock::now();
        let table = Table::from_input(database_name, input, now, now);
        info!(
            database = %database_name,
            table = %table.name,
            columns = table.storage_descriptor.columns.len(),
            "Creating table"
        );
        entry.tables.insert(table.name.clone(), table.clone());
        Ok(table)
    }

    /// Replace an existing table, keeping its original create time
    pub fn update_table(&self, database_name: &str, input: TableInput) -> Result<Table, GlueError> {
        let mut entry = self.database_entry_mut(database_name)?;

        let (create_time, last_update) = match entry.tables.get(&input.name) {
            Some(existing) => (existing.create_time, existing.update_time),
            None => return Err(GlueError::table_not_found(database_name, &input.name)),
        };

        let table = Table::from_input(
            database_name,
            input,
            create_time,
            clock::now_after(last_update),
        );
        info!(database = %database_name, table = %table.name, "Updating table");
        entry.tables.insert(table.name.clone(), table.clone());
        Ok(table)
    }

    /// Delete a table
    pub fn delete_table(&self, database_name: &str, name: &str) -> Result<(), GlueError> {
        let mut entry = self.database_entry_mut(database_name)?;
        entry
            .tables
            .remove(name)
            .ok_or_else(|| GlueError::table_not_found(database_name, name))?;

        info!(database = %database_name, table = %name, "Deleted table");
        Ok(())
    }

    /// Create a table from just its columns and parameters
    pub fn create_simple_table(
        &self,
        database_name: &str,
        name: &str,
        columns: Vec<Column>,
        parameters: HashMap<String, String>,
    ) -> Result<Table, GlueError> {
        let input = TableInput {
            parameters,
            ..TableInput::new(name).with_columns(columns)
        };
        self.create_table(database_name, input)
    }

    /// Drop every database and table
    pub fn clear(&self) {
        info!(databases = self.databases.len(), "Clearing catalog");
        self.databases.clear();
    }

    fn database_entry(&self, name: &str) -> Result<Ref<'_, String, DatabaseEntry>, GlueError> {
        self.databases
            .get(name)
            .ok_or_else(|| GlueError::database_not_found(name))
    }

    fn database_entry_mut(
        &self,
        name: &str,
    ) -> Result<RefMut<'_, String, DatabaseEntry>, GlueError> {
        self.databases
            .get_mut(name)
            .ok_or_else(|| GlueError::database_not_found(name))
    }
}
