//! Backend selection errors

use shimstack_core::ErrorCode;
use thiserror::Error;

use crate::config::ExecutionMode;
use crate::service::Service;

/// Errors raised while resolving a backend.
///
/// `UnsupportedInMode` is a kind of configuration error: it reports
/// `UnsupportedOperation` from [`SelectorError::code`] but is also covered by
/// [`SelectorError::is_configuration`].
#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to load configuration: {0}")]
    ConfigSource(#[from] config::ConfigError),

    /// A service deliberately has no backend in this mode
    #[error("{service} client not supported in {mode} mode: {hint}")]
    UnsupportedInMode {
        service: Service,
        mode: ExecutionMode,
        hint: &'static str,
    },
}

impl SelectorError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Configuration(_) | Self::ConfigSource(_) => ErrorCode::ConfigurationError,
            Self::UnsupportedInMode { .. } => ErrorCode::UnsupportedOperation,
        }
    }

    /// True for every selector error, unsupported-in-mode included
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::ConfigSource(_) | Self::UnsupportedInMode { .. }
        )
    }

    pub fn is_unsupported_in_mode(&self) -> bool {
        matches!(self, Self::UnsupportedInMode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_in_mode_is_configuration() {
        let err = SelectorError::UnsupportedInMode {
            service: Service::Lambda,
            mode: ExecutionMode::Mock,
            hint: "set TEST_ENVIRONMENT=hybrid to use the local emulator",
        };
        assert!(err.is_configuration());
        assert!(err.is_unsupported_in_mode());
        assert_eq!(err.code(), ErrorCode::UnsupportedOperation);

        let err = SelectorError::Configuration("bad endpoint".to_string());
        assert!(err.is_configuration());
        assert!(!err.is_unsupported_in_mode());
        assert_eq!(err.code(), ErrorCode::ConfigurationError);
    }
}
