//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use metapin_core::constants::{DEFAULT_PINNING_ENDPOINT, DEFAULT_TIMEOUT_SECONDS};

/// HTTP client settings shared by node and pinning clients.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ClientSettings {
    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Pinning service settings.
///
/// An absent or empty token means mirroring is disabled; it is not an error.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PinningSettings {
    /// Service endpoint (e.g. "https://api.nft.storage")
    pub endpoint: String,
    /// Bearer token for uploads
    pub token: Option<String>,
}

impl Default for PinningSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PINNING_ENDPOINT.into(),
            token: None,
        }
    }
}

impl PinningSettings {
    /// Settings for the default endpoint with the given token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Default::default()
        }
    }

    /// Overrides the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// The token, if present and non-blank.
    pub fn active_token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Whether mirroring is available.
    pub fn is_enabled(&self) -> bool {
        self.active_token().is_some()
    }
}
