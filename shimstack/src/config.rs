//! Configuration management

use serde::Deserialize;
use shimstack_glue::DuplicatePolicy;
use std::fmt;
use tracing::warn;
use url::Url;

use crate::error::SelectorError;

/// Environment variable selecting the execution mode
pub const MODE_VAR: &str = "TEST_ENVIRONMENT";

/// Environment variable overriding the local network emulator endpoint
pub const ENDPOINT_VAR: &str = "LOCALSTACK_ENDPOINT";

/// Environment variable selecting the region for real services
pub const REGION_VAR: &str = "AWS_REGION";

pub const DEFAULT_LOCAL_ENDPOINT: &str = "http://localhost:4566";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Which backends the logical services resolve to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Every supported service is emulated in memory
    #[default]
    Mock,
    /// Network-capable services go to a local emulator, the rest are emulated in memory
    Hybrid,
    /// Every service is the real one
    Aws,
}

impl ExecutionMode {
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "mock" => Some(Self::Mock),
            "hybrid" => Some(Self::Hybrid),
            "aws" => Some(Self::Aws),
            _ => None,
        }
    }

    /// Parse a mode token, falling back to `Mock` for missing or unknown values
    pub fn parse_or_default(token: Option<&str>) -> Self {
        match token {
            None => Self::default(),
            Some(t) if t.trim().is_empty() => Self::default(),
            Some(t) => Self::parse(t).unwrap_or_else(|| {
                warn!("Invalid {} '{}', defaulting to mock", MODE_VAR, t);
                Self::default()
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Hybrid => "hybrid",
            Self::Aws => "aws",
        }
    }

    /// Whether in-memory stores back the emulated services
    pub fn uses_emulation(&self) -> bool {
        matches!(self, Self::Mock | Self::Hybrid)
    }

    /// Whether network-capable services go to the local emulator
    pub fn uses_local_endpoint(&self) -> bool {
        matches!(self, Self::Hybrid)
    }

    pub fn uses_real_services(&self) -> bool {
        matches!(self, Self::Aws)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog emulation settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSettings {
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

/// Settings as read from the configuration sources, before validation
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    mode: Option<String>,
    local_endpoint: Option<String>,
    region: Option<String>,
    #[serde(default)]
    catalog: CatalogSettings,
}

/// Validated selector settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub mode: ExecutionMode,
    /// Endpoint of the local network emulator used in hybrid mode
    pub local_endpoint: Url,
    /// Region for real service handles
    pub region: String,
    pub catalog: CatalogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self::for_mode(ExecutionMode::default())
    }
}

impl Settings {
    /// Default settings for a given mode
    pub fn for_mode(mode: ExecutionMode) -> Self {
        Self {
            mode,
            local_endpoint: default_local_endpoint(),
            region: DEFAULT_REGION.to_string(),
            catalog: CatalogSettings::default(),
        }
    }

    /// Load settings from `shimstack.toml`, `SHIMSTACK_*` variables and the
    /// harness variables (`TEST_ENVIRONMENT`, `LOCALSTACK_ENDPOINT`, `AWS_REGION`),
    /// later sources winning.
    pub fn load() -> Result<Self, SelectorError> {
        let raw = config::Config::builder()
            .add_source(config::File::with_name("shimstack").required(false))
            .add_source(
                config::Environment::with_prefix("SHIMSTACK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("mode", std::env::var(MODE_VAR).ok())?
            .set_override_option("local_endpoint", std::env::var(ENDPOINT_VAR).ok())?
            .set_override_option("region", std::env::var(REGION_VAR).ok())?
            .build()?
            .try_deserialize::<RawSettings>()?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self, SelectorError> {
        let local_endpoint = match raw.local_endpoint.as_deref() {
            Some(endpoint) => parse_endpoint(endpoint)?,
            None => default_local_endpoint(),
        };

        Ok(Self {
            mode: ExecutionMode::parse_or_default(raw.mode.as_deref()),
            local_endpoint,
            region: raw
                .region
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            catalog: raw.catalog,
        })
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_local_endpoint(mut self, endpoint: &str) -> Result<Self, SelectorError> {
        self.local_endpoint = parse_endpoint(endpoint)?;
        Ok(self)
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_duplicate_policy(mut self, duplicate_policy: DuplicatePolicy) -> Self {
        self.catalog.duplicate_policy = duplicate_policy;
        self
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, SelectorError> {
    Url::parse(endpoint).map_err(|e| {
        SelectorError::Configuration(format!("Invalid endpoint '{}': {}", endpoint, e))
    })
}

fn default_local_endpoint() -> Url {
    Url::parse(DEFAULT_LOCAL_ENDPOINT).expect("default endpoint is a valid URL")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_tokens() {
        assert_eq!(ExecutionMode::parse("mock"), Some(ExecutionMode::Mock));
        assert_eq!(ExecutionMode::parse("HYBRID"), Some(ExecutionMode::Hybrid));
        assert_eq!(ExecutionMode::parse(" aws "), Some(ExecutionMode::Aws));
        assert_eq!(ExecutionMode::parse("localstack"), None);
    }

    #[test]
    fn test_unknown_mode_defaults_to_mock() {
        assert_eq!(ExecutionMode::parse_or_default(None), ExecutionMode::Mock);
        assert_eq!(ExecutionMode::parse_or_default(Some("")), ExecutionMode::Mock);
        assert_eq!(ExecutionMode::parse_or_default(Some("prod")), ExecutionMode::Mock);
        assert_eq!(ExecutionMode::parse_or_default(Some("Hybrid")), ExecutionMode::Hybrid);
    }

    #[test]
    fn test_mode_capabilities() {
        assert!(ExecutionMode::Mock.uses_emulation());
        assert!(ExecutionMode::Hybrid.uses_emulation());
        assert!(!ExecutionMode::Aws.uses_emulation());
        assert!(ExecutionMode::Hybrid.uses_local_endpoint());
        assert!(!ExecutionMode::Mock.uses_local_endpoint());
        assert!(ExecutionMode::Aws.uses_real_services());
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.mode, ExecutionMode::Mock);
        assert_eq!(settings.local_endpoint.as_str(), "http://localhost:4566/");
        assert_eq!(settings.region, "us-east-1");
        assert_eq!(settings.catalog.duplicate_policy, DuplicatePolicy::Overwrite);
    }

    #[test]
    fn test_from_raw() {
        let settings = Settings::from_raw(RawSettings {
            mode: Some("aws".to_string()),
            local_endpoint: Some("http://127.0.0.1:4600".to_string()),
            region: Some("eu-central-1".to_string()),
            catalog: CatalogSettings {
                duplicate_policy: DuplicatePolicy::Reject,
            },
        })
        .unwrap();

        assert_eq!(settings.mode, ExecutionMode::Aws);
        assert_eq!(settings.local_endpoint.port(), Some(4600));
        assert_eq!(settings.region, "eu-central-1");
        assert_eq!(settings.catalog.duplicate_policy, DuplicatePolicy::Reject);
    }

    #[test]
    fn test_from_raw_blank_region_uses_default() {
        let settings = Settings::from_raw(RawSettings {
            region: Some("  ".to_string()),
            ..RawSettings::default()
        })
        .unwrap();
        assert_eq!(settings.region, DEFAULT_REGION);
    }

    #[test]
    fn test_invalid_endpoint_is_configuration_error() {
        let err = Settings::from_raw(RawSettings {
            local_endpoint: Some("not a url".to_string()),
            ..RawSettings::default()
        })
        .unwrap_err();
        assert!(matches!(err, SelectorError::Configuration(_)));

        let err = Settings::default().with_local_endpoint("::").unwrap_err();
        assert!(matches!(err, SelectorError::Configuration(_)));
    }

    #[test]
    fn test_duplicate_policy_deserializes() {
        let catalog: CatalogSettings =
            serde_json::from_str(r#"{"duplicate_policy": "reject"}"#).unwrap();
        assert_eq!(catalog.duplicate_policy, DuplicatePolicy::Reject);

        let catalog: CatalogSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(catalog.duplicate_policy, DuplicatePolicy::Overwrite);
    }
}
