//! Catalog records and the inputs that create them
//!
//! Field names serialize in the real service's PascalCase shape so records
//! can be compared against responses captured from a live catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Table type stamped on tables created without one
pub const DEFAULT_TABLE_TYPE: &str = "EXTERNAL_TABLE";

/// A column descriptor, used for both storage columns and partition keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Column {
    pub name: String,
    #[serde(rename = "Type")]
    pub column_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Physical layout of a table. Column order is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StorageDescriptor {
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Input to CreateDatabase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatabaseInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location_uri: String,
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

impl DatabaseInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_location_uri(mut self, location_uri: impl Into<String>) -> Self {
        self.location_uri = location_uri.into();
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// A catalog database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Database {
    pub name: String,
    pub description: String,
    pub location_uri: String,
    pub parameters: HashMap<String, String>,
    pub create_time: DateTime<Utc>,
}

impl Database {
    pub(crate) fn from_input(input: DatabaseInput, now: DateTime<Utc>) -> Self {
        Self {
            name: input.name,
            description: input.description,
            location_uri: input.location_uri,
            parameters: input.parameters,
            create_time: now,
        }
    }
}

/// Input to CreateTable and UpdateTable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_type: Option<String>,
    #[serde(default)]
    pub storage_descriptor: StorageDescriptor,
    #[serde(default)]
    pub partition_keys: Vec<Column>,
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

impl TableInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_table_type(mut self, table_type: impl Into<String>) -> Self {
        self.table_type = Some(table_type.into());
        self
    }

    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.storage_descriptor.columns = columns;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.storage_descriptor.location = Some(location.into());
        self
    }

    pub fn with_partition_keys(mut self, partition_keys: Vec<Column>) -> Self {
        self.partition_keys = partition_keys;
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// A catalog table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Table {
    pub name: String,
    pub database_name: String,
    pub description: String,
    pub owner: String,
    pub table_type: String,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
    pub storage_descriptor: StorageDescriptor,
    pub partition_keys: Vec<Column>,
    pub parameters: HashMap<String, String>,
}

impl Table {
    pub(crate) fn from_input(
        database_name: &str,
        input: TableInput,
        create_time: DateTime<Utc>,
        update_time: DateTime<Utc>,
    ) -> Self {
        Self {
            name: input.name,
            database_name: database_name.to_string(),
            description: input.description,
            owner: input.owner,
            table_type: input
                .table_type
                .unwrap_or_else(|| DEFAULT_TABLE_TYPE.to_string()),
            create_time,
            update_time,
            storage_descriptor: input.storage_descriptor,
            partition_keys: input.partition_keys,
            parameters: input.parameters,
        }
    }

    /// Storage column names in declaration order
    pub fn column_names(&self) -> Vec<&str> {
        self.storage_descriptor
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }
}
