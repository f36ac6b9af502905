//! Secrets Manager in-memory storage

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Serialize, Serializer};
use shimstack_core::{clock, AccountRegion, ErrorCode, ResourceArn};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// A secret payload. A secret holds text or binary data, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretPayload {
    Text(String),
    Binary(Vec<u8>),
}

impl SecretPayload {
    /// Pick the payload from a request's optional slots; text wins when both are set
    pub fn from_parts(secret_string: Option<String>, secret_binary: Option<Vec<u8>>) -> Option<Self> {
        match (secret_string, secret_binary) {
            (Some(text), _) => Some(Self::Text(text)),
            (None, Some(binary)) => Some(Self::Binary(binary)),
            (None, None) => None,
        }
    }
}

/// A stored secret
#[derive(Debug, Clone)]
struct Secret {
    arn: ResourceArn,
    payload: Option<SecretPayload>,
    /// Assigned fresh on every write
    version_id: String,
    /// When the current value was written
    created_date: DateTime<Utc>,
}

/// GetSecretValue response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecretValueOutput {
    #[serde(rename = "ARN")]
    pub arn: ResourceArn,
    pub name: String,
    pub version_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_string: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_binary"
    )]
    pub secret_binary: Option<Vec<u8>>,
    pub created_date: DateTime<Utc>,
}

/// CreateSecret and PutSecretValue response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecretWriteOutput {
    #[serde(rename = "ARN")]
    pub arn: ResourceArn,
    pub name: String,
    pub version_id: String,
}

/// DeleteSecret response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteSecretOutput {
    #[serde(rename = "ARN")]
    pub arn: ResourceArn,
    pub name: String,
}

fn serialize_binary<S: Serializer>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
        None => serializer.serialize_none(),
    }
}

/// In-memory storage for secrets
#[derive(Debug, Default)]
pub struct SecretsManagerStorage {
    /// Secrets indexed by name
    secrets: DashMap<String, Secret>,
    scope: AccountRegion,
}

impl SecretsManagerStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose ARNs use the given account and region
    pub fn with_scope(scope: AccountRegion) -> Self {
        Self {
            secrets: DashMap::new(),
            scope,
        }
    }

    /// Create a secret, overwriting any existing value under the same name
    pub fn create_secret(
        &self,
        name: &str,
        secret_string: Option<String>,
        secret_binary: Option<Vec<u8>>,
    ) -> SecretWriteOutput {
        info!(secret = %name, "Creating secret");
        self.write(name, SecretPayload::from_parts(secret_string, secret_binary))
    }

    /// Get the current value of a secret
    pub fn get_secret_value(&self, secret_id: &str) -> Result<SecretValueOutput, SecretsManagerError> {
        debug!(secret = %secret_id, "GetSecretValue");
        let secret = self
            .secrets
            .get(secret_id)
            .ok_or_else(|| SecretsManagerError::ResourceNotFound(secret_id.to_string()))?;

        let (secret_string, secret_binary) = match &secret.payload {
            Some(SecretPayload::Text(text)) => (Some(text.clone()), None),
            Some(SecretPayload::Binary(bytes)) => (None, Some(bytes.clone())),
            None => (None, None),
        };

        Ok(SecretValueOutput {
            arn: secret.arn.clone(),
            name: secret_id.to_string(),
            version_id: secret.version_id.clone(),
            secret_string,
            secret_binary,
            created_date: secret.created_date,
        })
    }

    /// Put a new secret value. Unknown ids are created.
    pub fn put_secret_value(
        &self,
        secret_id: &str,
        secret_string: Option<String>,
        secret_binary: Option<Vec<u8>>,
    ) -> SecretWriteOutput {
        info!(secret = %secret_id, "Putting secret value");
        self.write(secret_id, SecretPayload::from_parts(secret_string, secret_binary))
    }

    /// Delete a secret immediately
    pub fn delete_secret(&self, secret_id: &str) -> Result<DeleteSecretOutput, SecretsManagerError> {
        let (name, secret) = self
            .secrets
            .remove(secret_id)
            .ok_or_else(|| SecretsManagerError::ResourceNotFound(secret_id.to_string()))?;

        info!(secret = %name, "Deleted secret");
        Ok(DeleteSecretOutput {
            arn: secret.arn,
            name,
        })
    }

    /// Store a text secret
    pub fn put_secret(&self, name: &str, value: &str) -> SecretWriteOutput {
        self.write(name, Some(SecretPayload::Text(value.to_string())))
    }

    /// Store a binary secret
    pub fn put_binary_secret(&self, name: &str, value: &[u8]) -> SecretWriteOutput {
        self.write(name, Some(SecretPayload::Binary(value.to_vec())))
    }

    /// Check whether a secret exists
    pub fn secret_exists(&self, name: &str) -> bool {
        self.secrets.contains_key(name)
    }

    /// Names of all secrets, sorted
    pub fn list_secret_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.secrets.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    /// Remove all secrets
    pub fn clear(&self) {
        info!(secrets = self.secrets.len(), "Clearing secrets");
        self.secrets.clear();
    }

    fn write(&self, name: &str, payload: Option<SecretPayload>) -> SecretWriteOutput {
        let secret = Secret {
            arn: self.scope.secret_arn(name),
            payload,
            version_id: Uuid::new_v4().to_string(),
            created_date: clock::now(),
        };

        let output = SecretWriteOutput {
            arn: secret.arn.clone(),
            name: name.to_string(),
            version_id: secret.version_id.clone(),
        };
        self.secrets.insert(name.to_string(), secret);
        output
    }
}

/// Secrets Manager errors
#[derive(Debug, Error)]
pub enum SecretsManagerError {
    #[error("Secret not found: {0}")]
    ResourceNotFound(String),
}

impl SecretsManagerError {
    /// Exception name the real service reports for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ResourceNotFound(_) => ErrorCode::ResourceNotFoundException,
        }
    }
}
