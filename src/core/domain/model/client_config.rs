//! Client configuration.
//!
//! [`RedfishConfig`] mirrors the options of [`crate::RedfishClientBuilder`]
//! and can be deserialized from a JSON file so bootstrap tooling can keep
//! BMC settings next to the rest of its site configuration.

use crate::core::domain::{
    error::{RedfishResult, ValidationError},
    model::operation_context::DEFAULT_RETRY_BUDGET,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default interval between two convergence-poll attempts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default interval between two checks of an ejecting virtual media device.
pub const DEFAULT_MEDIA_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default time allowed to establish a connection to the BMC.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default time allowed for a whole request, from connect to last body byte.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Default `User-Agent` header sent to the BMC.
pub const DEFAULT_USER_AGENT: &str = concat!("redfish-oob/", env!("CARGO_PKG_VERSION"));

/// Connect and request timeouts of the HTTP transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportTimeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for TransportTimeouts {
    fn default() -> Self {
        Self {
            connect: DEFAULT_CONNECT_TIMEOUT,
            request: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Client-side request rate limiting towards a single BMC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

impl RateLimitConfig {
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.requests_per_second == 0 {
            return Err(ValidationError::Field {
                field: "requests_per_second".to_string(),
                message: "Rate limit must allow at least one request per second".to_string(),
            });
        }
        if self.burst_size == 0 {
            return Err(ValidationError::Field {
                field: "burst_size".to_string(),
                message: "Burst size must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Serializable configuration of a Redfish client.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RedfishConfig {
    /// Management URL of the system, e.g. `https://10.0.0.1/redfish/v1/Systems/1`.
    pub url: String,
    /// Skip TLS certificate verification.
    pub insecure: bool,
    /// Honour proxy settings from the environment.
    pub use_proxy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub user_agent: String,
    /// Seconds to wait between two convergence-poll attempts.
    pub poll_interval_secs: u64,
    /// Seconds to wait between two checks of an ejecting media device.
    pub media_poll_interval_secs: u64,
    /// Default number of poll attempts.
    pub retry_budget: u32,
    /// Seconds allowed to establish a connection.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for a whole request.
    pub request_timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for RedfishConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            insecure: false,
            use_proxy: true,
            username: None,
            password: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            media_poll_interval_secs: DEFAULT_MEDIA_POLL_INTERVAL.as_secs(),
            retry_budget: DEFAULT_RETRY_BUDGET,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT.as_secs(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            rate_limit: None,
        }
    }
}

impl RedfishConfig {
    /// Loads a configuration from a JSON file. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns `RedfishError::Validation` if the file cannot be read or parsed.
    pub async fn from_file(path: impl AsRef<Path>) -> RedfishResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            ValidationError::Field {
                field: "config".to_string(),
                message: format!("cannot read {}: {e}", path.display()),
            }
        })?;
        let config = serde_json::from_str(&raw)
            .map_err(|e| ValidationError::Format(format!("invalid configuration: {e}")))?;
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn media_poll_interval(&self) -> Duration {
        Duration::from_secs(self.media_poll_interval_secs)
    }

    pub fn timeouts(&self) -> TransportTimeouts {
        TransportTimeouts {
            connect: Duration::from_secs(self.connect_timeout_secs),
            request: Duration::from_secs(self.request_timeout_secs),
        }
    }
}
