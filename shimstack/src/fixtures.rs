//! Baseline fixtures seeded into emulated stores on first access

use shimstack_secretsmanager::SecretsManagerStorage;
use shimstack_ssm::{ParameterType, SsmStorage};
use tracing::debug;

pub const APP_ID: &str = "test_app_id";
pub const APP_SECRET: &str = "test_app_secret";

/// Secret holding the app credentials as one JSON document
pub const CREDENTIALS_SECRET: &str = "lark-app-credentials";
pub const APP_ID_SECRET: &str = "lark-app-id";
pub const APP_SECRET_SECRET: &str = "lark-app-secret";

/// Baseline parameters as (name, value, type)
pub const BASELINE_PARAMETERS: &[(&str, &str, ParameterType)] = &[
    ("/lark/app_id", APP_ID, ParameterType::String),
    ("/lark/app_secret", APP_SECRET, ParameterType::SecureString),
    ("/lark/base/data_source_id", "test_base_id", ParameterType::String),
    ("/lark/table/data_source_id", "test_table_id", ParameterType::String),
    ("/athena/catalog", "test_catalog", ParameterType::String),
    ("/athena/workgroup", "primary", ParameterType::String),
    ("/features/enable_parallel_split", "true", ParameterType::String),
    ("/features/enable_debug_logging", "false", ParameterType::String),
];

/// JSON credentials document stored under [`CREDENTIALS_SECRET`]
pub fn credentials_document() -> String {
    serde_json::json!({ "app_id": APP_ID, "app_secret": APP_SECRET }).to_string()
}

/// Seed the baseline secrets
pub fn seed_secrets(storage: &SecretsManagerStorage) {
    storage.put_secret(CREDENTIALS_SECRET, &credentials_document());
    storage.put_secret(APP_ID_SECRET, APP_ID);
    storage.put_secret(APP_SECRET_SECRET, APP_SECRET);
    debug!(secrets = 3, "Seeded baseline secrets");
}

/// Seed the baseline parameters
pub fn seed_parameters(storage: &SsmStorage) {
    for (name, value, parameter_type) in BASELINE_PARAMETERS {
        storage.put_parameter(name, value, *parameter_type, "");
    }
    debug!(parameters = BASELINE_PARAMETERS.len(), "Seeded baseline parameters");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_document() {
        assert_eq!(
            credentials_document(),
            r#"{"app_id":"test_app_id","app_secret":"test_app_secret"}"#
        );
    }

    #[test]
    fn test_seed_secrets() {
        let storage = SecretsManagerStorage::new();
        seed_secrets(&storage);

        assert_eq!(
            storage.list_secret_names(),
            vec![CREDENTIALS_SECRET, APP_ID_SECRET, APP_SECRET_SECRET]
        );
        let value = storage.get_secret_value(APP_ID_SECRET).unwrap();
        assert_eq!(value.secret_string.as_deref(), Some(APP_ID));
    }

    #[test]
    fn test_seed_parameters() {
        let storage = SsmStorage::new();
        seed_parameters(&storage);

        assert_eq!(storage.parameter_names().len(), BASELINE_PARAMETERS.len());
        let secret = storage.get_parameter("/lark/app_secret", false).unwrap();
        assert_eq!(secret.value, shimstack_ssm::MASKED_VALUE);
        assert_eq!(secret.version, 1);

        let lark = storage.get_parameters_by_path("/lark", false, true);
        let names: Vec<&str> = lark.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["/lark/app_id", "/lark/app_secret"]);
    }
}
