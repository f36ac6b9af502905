//! Account and region scoped resource locators

use serde::{Serialize, Serializer};
use std::fmt;

/// Placeholder account used in every synthesized ARN
pub const DEFAULT_ACCOUNT_ID: &str = "123456789012";

/// Placeholder region used in every synthesized ARN
pub const DEFAULT_REGION: &str = "us-east-1";

/// Account and region an emulated store pretends to live in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountRegion {
    pub account_id: String,
    pub region: String,
}

impl AccountRegion {
    pub fn new(account_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            region: region.into(),
        }
    }

    /// Build an ARN for a resource of `service` owned by this account/region
    pub fn arn(&self, service: &'static str, resource: impl Into<String>) -> ResourceArn {
        ResourceArn {
            service,
            region: self.region.clone(),
            account_id: self.account_id.clone(),
            resource: resource.into(),
        }
    }

    /// `arn:aws:secretsmanager:<region>:<account>:secret:<name>`
    pub fn secret_arn(&self, name: &str) -> ResourceArn {
        self.arn("secretsmanager", format!("secret:{}", name))
    }

    /// `arn:aws:ssm:<region>:<account>:parameter/<path>`
    ///
    /// Hierarchical names already start with `/` and are appended as-is.
    pub fn parameter_arn(&self, name: &str) -> ResourceArn {
        if name.starts_with('/') {
            self.arn("ssm", format!("parameter{}", name))
        } else {
            self.arn("ssm", format!("parameter/{}", name))
        }
    }
}

impl Default for AccountRegion {
    fn default() -> Self {
        Self::new(DEFAULT_ACCOUNT_ID, DEFAULT_REGION)
    }
}

/// A synthesized Amazon Resource Name.
///
/// Values are placeholders kept only for response-shape compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceArn {
    pub service: &'static str,
    pub region: String,
    pub account_id: String,
    pub resource: String,
}

impl fmt::Display for ResourceArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:aws:{}:{}:{}:{}",
            self.service, self.region, self.account_id, self.resource
        )
    }
}

impl Serialize for ResourceArn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
