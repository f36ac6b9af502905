//! Parameter Store in-memory storage

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use shimstack_core::{clock, AccountRegion, ErrorCode, ResourceArn};
use thiserror::Error;
use tracing::{debug, info};

use crate::path::matches_path;

/// Value returned in place of a SecureString when decryption is not requested
pub const MASKED_VALUE: &str = "****";

/// Parameter value type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterType {
    #[default]
    String,
    StringList,
    SecureString,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::StringList => "StringList",
            Self::SecureString => "SecureString",
        }
    }

    /// Only SecureString values are ever masked
    pub fn is_secure(&self) -> bool {
        matches!(self, Self::SecureString)
    }
}

/// A stored parameter
#[derive(Debug, Clone)]
struct StoredParameter {
    value: String,
    parameter_type: ParameterType,
    description: String,
    version: i64,
    last_modified: DateTime<Utc>,
}

/// A parameter as returned by GetParameter and GetParametersByPath
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    pub name: String,
    pub value: String,
    #[serde(rename = "Type")]
    pub parameter_type: ParameterType,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub version: i64,
    pub last_modified_date: DateTime<Utc>,
    #[serde(rename = "ARN")]
    pub arn: ResourceArn,
}

/// In-memory storage for parameters
#[derive(Debug, Default)]
pub struct SsmStorage {
    /// Parameters indexed by full name
    parameters: DashMap<String, StoredParameter>,
    scope: AccountRegion,
}

impl SsmStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose ARNs use the given account and region
    pub fn with_scope(scope: AccountRegion) -> Self {
        Self {
            parameters: DashMap::new(),
            scope,
        }
    }

    /// Get a parameter, masking SecureString values unless `with_decryption` is set
    pub fn get_parameter(&self, name: &str, with_decryption: bool) -> Result<Parameter, SsmError> {
        debug!(parameter = %name, with_decryption, "GetParameter");
        self.parameters
            .get(name)
            .map(|stored| self.render(name, &stored, with_decryption))
            .ok_or_else(|| SsmError::ParameterNotFound(name.to_string()))
    }

    /// Get every parameter under `path`, sorted by name
    pub fn get_parameters_by_path(
        &self,
        path: &str,
        recursive: bool,
        with_decryption: bool,
    ) -> Vec<Parameter> {
        let mut matched: Vec<Parameter> = self
            .parameters
            .iter()
            .filter(|entry| matches_path(entry.key(), path, recursive))
            .map(|entry| self.render(entry.key(), entry.value(), with_decryption))
            .collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name));

        debug!(path = %path, recursive, matched = matched.len(), "GetParametersByPath");
        matched
    }

    /// Create or overwrite a parameter and return its new version.
    ///
    /// The first write of a name is version 1 and every later write adds
    /// exactly one. A deleted name starts again at 1.
    pub fn put_parameter(
        &self,
        name: &str,
        value: &str,
        parameter_type: ParameterType,
        description: &str,
    ) -> i64 {
        let version = match self.parameters.entry(name.to_string()) {
            Entry::Occupied(mut occupied) => {
                let stored = occupied.get_mut();
                stored.value = value.to_string();
                stored.parameter_type = parameter_type;
                stored.description = description.to_string();
                stored.version += 1;
                stored.last_modified = clock::now_after(stored.last_modified);
                stored.version
            }
            Entry::Vacant(vacant) => {
                vacant.insert(StoredParameter {
                    value: value.to_string(),
                    parameter_type,
                    description: description.to_string(),
                    version: 1,
                    last_modified: clock::now(),
                });
                1
            }
        };

        info!(parameter = %name, parameter_type = parameter_type.as_str(), version, "Put parameter");
        version
    }

    /// Put a plain String parameter with no description
    pub fn put_string(&self, name: &str, value: &str) -> i64 {
        self.put_parameter(name, value, ParameterType::String, "")
    }

    /// Put a SecureString parameter with no description
    pub fn put_secure_string(&self, name: &str, value: &str) -> i64 {
        self.put_parameter(name, value, ParameterType::SecureString, "")
    }

    /// Delete a parameter
    pub fn delete_parameter(&self, name: &str) -> Result<(), SsmError> {
        self.parameters
            .remove(name)
            .ok_or_else(|| SsmError::ParameterNotFound(name.to_string()))?;

        info!(parameter = %name, "Deleted parameter");
        Ok(())
    }

    /// Check whether a parameter exists
    pub fn parameter_exists(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    /// Names of all parameters, sorted
    pub fn parameter_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.parameters.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    /// Remove all parameters
    pub fn clear(&self) {
        info!(parameters = self.parameters.len(), "Clearing parameters");
        self.parameters.clear();
    }

    fn render(&self, name: &str, stored: &StoredParameter, with_decryption: bool) -> Parameter {
        let value = if stored.parameter_type.is_secure() && !with_decryption {
            MASKED_VALUE.to_string()
        } else {
            stored.value.clone()
        };

        Parameter {
            name: name.to_string(),
            value,
            parameter_type: stored.parameter_type,
            description: stored.description.clone(),
            version: stored.version,
            last_modified_date: stored.last_modified,
            arn: self.scope.parameter_arn(name),
        }
    }
}

/// Parameter Store errors
#[derive(Debug, Error)]
pub enum SsmError {
    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),
}

impl SsmError {
    /// Exception name the real service reports for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ParameterNotFound(_) => ErrorCode::ParameterNotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(parameters: &[Parameter]) -> Vec<&str> {
        parameters.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_put_and_get_parameter() {
        let storage = SsmStorage::new();
        let version = storage.put_parameter("/app/url", "https://example.com", ParameterType::String, "endpoint");
        assert_eq!(version, 1);

        let param = storage.get_parameter("/app/url", true).unwrap();
        assert_eq!(param.name, "/app/url");
        assert_eq!(param.value, "https://example.com");
        assert_eq!(param.parameter_type, ParameterType::String);
        assert_eq!(param.description, "endpoint");
        assert_eq!(param.version, 1);
        assert_eq!(
            param.arn.to_string(),
            "arn:aws:ssm:us-east-1:123456789012:parameter/app/url"
        );
    }

    #[test]
    fn test_nth_put_returns_version_n() {
        let storage = SsmStorage::new();
        for n in 1..=5 {
            let version = storage.put_string("/counter", &n.to_string());
            assert_eq!(version, n);
            assert_eq!(storage.get_parameter("/counter", true).unwrap().version, n);
        }
    }

    #[test]
    fn test_overwrite_secure_parameter() {
        let storage = SsmStorage::new();
        storage.put_parameter("/app/token", "abc", ParameterType::SecureString, "");
        storage.put_parameter("/app/token", "xyz", ParameterType::SecureString, "");

        let param = storage.get_parameter("/app/token", true).unwrap();
        assert_eq!(param.value, "xyz");
        assert_eq!(param.version, 2);
    }

    #[test]
    fn test_overwrite_refreshes_last_modified_and_type() {
        let storage = SsmStorage::new();
        storage.put_string("/flag", "true");
        let before = storage.get_parameter("/flag", true).unwrap();

        storage.put_parameter("/flag", "false", ParameterType::SecureString, "now secret");
        let after = storage.get_parameter("/flag", true).unwrap();

        assert!(after.last_modified_date > before.last_modified_date);
        assert_eq!(after.parameter_type, ParameterType::SecureString);
        assert_eq!(after.description, "now secret");
    }

    #[test]
    fn test_secure_value_masked_without_decryption() {
        let storage = SsmStorage::new();
        storage.put_secure_string("/app/secret", "hunter2");

        let masked = storage.get_parameter("/app/secret", false).unwrap();
        assert_eq!(masked.value, MASKED_VALUE);

        let decrypted = storage.get_parameter("/app/secret", true).unwrap();
        assert_eq!(decrypted.value, "hunter2");
    }

    #[test]
    fn test_plain_values_never_masked() {
        let storage = SsmStorage::new();
        storage.put_string("/app/id", "plain");
        storage.put_parameter("/app/list", "a,b", ParameterType::StringList, "");

        assert_eq!(storage.get_parameter("/app/id", false).unwrap().value, "plain");
        assert_eq!(storage.get_parameter("/app/list", false).unwrap().value, "a,b");
    }

    #[test]
    fn test_get_missing_parameter() {
        let storage = SsmStorage::new();
        let err = storage.get_parameter("/missing", true).unwrap_err();
        assert!(matches!(err, SsmError::ParameterNotFound(ref name) if name == "/missing"));
        assert_eq!(err.code(), ErrorCode::ParameterNotFound);
    }

    #[test]
    fn test_get_parameters_by_path() {
        let storage = SsmStorage::new();
        storage.put_string("/a/b", "1");
        storage.put_string("/a/c", "2");
        storage.put_string("/a/b/c", "3");
        storage.put_string("/z/b", "4");

        let direct = storage.get_parameters_by_path("/a", false, true);
        assert_eq!(names(&direct), vec!["/a/b", "/a/c"]);

        let trailing = storage.get_parameters_by_path("/a/", false, true);
        assert_eq!(names(&trailing), vec!["/a/b", "/a/c"]);

        let recursive = storage.get_parameters_by_path("/a", true, true);
        assert_eq!(names(&recursive), vec!["/a/b", "/a/b/c", "/a/c"]);
    }

    #[test]
    fn test_get_parameters_by_path_masks_secure_values() {
        let storage = SsmStorage::new();
        storage.put_string("/lark/app_id", "test_app_id");
        storage.put_secure_string("/lark/app_secret", "test_app_secret");

        let masked = storage.get_parameters_by_path("/lark", false, false);
        assert_eq!(masked[0].value, "test_app_id");
        assert_eq!(masked[1].value, MASKED_VALUE);

        let decrypted = storage.get_parameters_by_path("/lark", false, true);
        assert_eq!(decrypted[1].value, "test_app_secret");
    }

    #[test]
    fn test_delete_then_recreate_restarts_version() {
        let storage = SsmStorage::new();
        storage.put_string("/p", "1");
        storage.put_string("/p", "2");

        storage.delete_parameter("/p").unwrap();
        assert!(!storage.parameter_exists("/p"));
        assert!(matches!(
            storage.delete_parameter("/p"),
            Err(SsmError::ParameterNotFound(_))
        ));

        assert_eq!(storage.put_string("/p", "3"), 1);
    }

    #[test]
    fn test_names_and_clear() {
        let storage = SsmStorage::new();
        storage.put_string("/b", "1");
        storage.put_string("/a", "2");
        assert_eq!(storage.parameter_names(), vec!["/a", "/b"]);

        storage.clear();
        assert!(storage.parameter_names().is_empty());
        assert!(storage.get_parameters_by_path("/", true, true).is_empty());
    }

    #[test]
    fn test_parameter_shape() {
        let storage = SsmStorage::new();
        storage.put_secure_string("/app/token", "abc");

        let json = serde_json::to_value(storage.get_parameter("/app/token", false).unwrap()).unwrap();
        assert_eq!(json["Name"], "/app/token");
        assert_eq!(json["Value"], "****");
        assert_eq!(json["Type"], "SecureString");
        assert_eq!(json["Version"], 1);
        assert!(json.get("Description").is_none());
        assert!(json.get("LastModifiedDate").is_some());
    }

    #[test]
    fn test_concurrent_puts_get_distinct_versions() {
        const THREADS: i64 = 8;
        const PUTS: i64 = 200;
        let storage = std::sync::Arc::new(SsmStorage::new());

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let storage = std::sync::Arc::clone(&storage);
                std::thread::spawn(move || {
                    (0..PUTS)
                        .map(|i| storage.put_string("/p", &format!("{t}-{i}")))
                        .collect::<Vec<i64>>()
                })
            })
            .collect();

        let mut versions: Vec<i64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        versions.sort_unstable();

        assert_eq!(versions, (1..=THREADS * PUTS).collect::<Vec<_>>());
        assert_eq!(storage.get_parameter("/p", true).unwrap().version, THREADS * PUTS);
    }
}
