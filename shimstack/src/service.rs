//! Logical services a test can ask for

use std::fmt;
use std::str::FromStr;

use crate::error::SelectorError;

/// AWS services known to the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Service {
    Glue,
    SecretsManager,
    Ssm,
    Lambda,
    S3,
    Logs,
    Sts,
    Iam,
    Athena,
}

impl Service {
    pub const ALL: [Service; 9] = [
        Service::Glue,
        Service::SecretsManager,
        Service::Ssm,
        Service::Lambda,
        Service::S3,
        Service::Logs,
        Service::Sts,
        Service::Iam,
        Service::Athena,
    ];

    /// SDK service identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Glue => "glue",
            Self::SecretsManager => "secretsmanager",
            Self::Ssm => "ssm",
            Self::Lambda => "lambda",
            Self::S3 => "s3",
            Self::Logs => "logs",
            Self::Sts => "sts",
            Self::Iam => "iam",
            Self::Athena => "athena",
        }
    }

    /// Services with an in-memory store in this crate
    pub fn has_emulation(&self) -> bool {
        matches!(self, Self::Glue | Self::SecretsManager | Self::Ssm)
    }

    /// Services served by the local network emulator in hybrid mode
    pub fn is_network_capable(&self) -> bool {
        matches!(self, Self::Lambda | Self::S3 | Self::Logs | Self::Sts | Self::Iam)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SelectorError::Configuration(format!("Unknown service: {}", s)))
    }
}
