//! Service error codes shared by the emulated stores

use std::fmt;

/// Exception names returned by the emulated services.
///
/// The strings match the real services so that test code matching on
/// error names runs unchanged against emulated and real backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Glue
    EntityNotFoundException,
    AlreadyExistsException,

    // Secrets Manager
    ResourceNotFoundException,

    // SSM
    ParameterNotFound,

    // Dispatch
    ConfigurationError,
    UnsupportedOperation,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntityNotFoundException => "EntityNotFoundException",
            Self::AlreadyExistsException => "AlreadyExistsException",
            Self::ResourceNotFoundException => "ResourceNotFoundException",
            Self::ParameterNotFound => "ParameterNotFound",
            Self::ConfigurationError => "ConfigurationError",
            Self::UnsupportedOperation => "UnsupportedOperation",
        }
    }

    /// Whether this code reports a missing entity
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EntityNotFoundException | Self::ResourceNotFoundException | Self::ParameterNotFound
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of entity named by a NotFound or AlreadyExists error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Database,
    Table,
    Secret,
    Parameter,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Database => "Database",
            Self::Table => "Table",
            Self::Secret => "Secret",
            Self::Parameter => "Parameter",
        };
        f.write_str(name)
    }
}
