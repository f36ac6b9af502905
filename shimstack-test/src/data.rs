//! Standard test data

use serde::Deserialize;
use shimstack::SelectorError;
use shimstack_glue::Column;
use std::collections::HashMap;

/// Names of the standard test database and table and the records they link to.
///
/// Each field can be overridden from the environment
/// (`TEST_DATABASE`, `TEST_TABLE`, `LARK_BASE_APP_TOKEN`, `LARK_BASE_TABLE_ID`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestData {
    pub test_database: String,
    pub test_table: String,
    pub lark_base_app_token: String,
    pub lark_base_table_id: String,
}

impl Default for TestData {
    fn default() -> Self {
        Self {
            test_database: "test_database".to_string(),
            test_table: "test_table".to_string(),
            lark_base_app_token: "test_base_token".to_string(),
            lark_base_table_id: "test_table_id".to_string(),
        }
    }
}

impl TestData {
    /// Load test data, environment variables winning over the defaults
    pub fn from_env() -> Result<Self, SelectorError> {
        let defaults = Self::default();
        let data = config::Config::builder()
            .set_default("test_database", defaults.test_database)?
            .set_default("test_table", defaults.test_table)?
            .set_default("lark_base_app_token", defaults.lark_base_app_token)?
            .set_default("lark_base_table_id", defaults.lark_base_table_id)?
            .set_override_option("test_database", std::env::var("TEST_DATABASE").ok())?
            .set_override_option("test_table", std::env::var("TEST_TABLE").ok())?
            .set_override_option(
                "lark_base_app_token",
                std::env::var("LARK_BASE_APP_TOKEN").ok(),
            )?
            .set_override_option("lark_base_table_id", std::env::var("LARK_BASE_TABLE_ID").ok())?
            .build()?
            .try_deserialize()?;
        Ok(data)
    }
}

/// Columns of the standard test table, one per field type the connector maps
pub fn standard_table_columns() -> Vec<Column> {
    [
        ("field_text", "string"),
        ("field_barcode", "string"),
        ("field_single_select", "string"),
        ("field_phone", "string"),
        ("field_email", "string"),
        ("field_auto_number", "string"),
        ("field_number", "decimal"),
        ("field_progress", "decimal"),
        ("field_currency", "decimal"),
        ("field_rating", "tinyint"),
        ("field_checkbox", "boolean"),
        ("field_date_time", "timestamp"),
        ("field_created_time", "timestamp"),
        ("field_modified_time", "timestamp"),
        ("field_multi_select", "array<string>"),
    ]
    .into_iter()
    .map(|(name, column_type)| Column::new(name, column_type))
    .collect()
}

/// Table parameters linking the standard test table to its source records
pub fn standard_table_parameters(data: &TestData) -> HashMap<String, String> {
    HashMap::from([
        ("larkBaseId".to_string(), data.lark_base_app_token.clone()),
        ("larkTableId".to_string(), data.lark_base_table_id.clone()),
        ("larkBaseDataSourceId".to_string(), data.lark_base_app_token.clone()),
        ("larkTableDataSourceId".to_string(), data.lark_base_table_id.clone()),
        ("crawlingMethod".to_string(), "test".to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_columns() {
        let columns = standard_table_columns();
        assert_eq!(columns.len(), 15);
        assert_eq!(columns[0].name, "field_text");
        assert_eq!(columns[14].column_type, "array<string>");
    }

    #[test]
    fn test_standard_parameters_link_records() {
        let parameters = standard_table_parameters(&TestData::default());
        assert_eq!(parameters["larkBaseId"], "test_base_token");
        assert_eq!(parameters["larkTableDataSourceId"], "test_table_id");
        assert_eq!(parameters["crawlingMethod"], "test");
    }
}
