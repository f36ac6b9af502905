//! AWS Systems Manager Parameter Store emulation for ShimStack
//!
//! Provides in-memory hierarchical parameters with support for:
//! - PutParameter with per-name monotonic versions
//! - GetParameter and GetParametersByPath (direct children or recursive)
//! - SecureString masking unless decryption is requested
//! - DeleteParameter

mod path;
mod storage;

pub use path::matches_path;
pub use storage::{Parameter, ParameterType, SsmError, SsmStorage, MASKED_VALUE};
