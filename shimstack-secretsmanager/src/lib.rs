//! AWS Secrets Manager emulation for ShimStack
//!
//! Provides in-memory secrets storage with support for:
//! - CreateSecret, GetSecretValue, PutSecretValue, DeleteSecret
//! - Text or binary payloads, one per secret
//! - A fresh version id on every write

mod storage;

pub use storage::{
    DeleteSecretOutput, SecretPayload, SecretValueOutput, SecretWriteOutput, SecretsManagerError,
    SecretsManagerStorage,
};
