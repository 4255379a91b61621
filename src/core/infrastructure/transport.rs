//! HTTP transport construction for talking to a BMC.

use crate::core::domain::{
    error::{RedfishError, RedfishResult, ValidationError},
    model::client_config::TransportTimeouts,
};
use reqwest::{
    Client,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
};

/// Transport settings shared by every request a client sends to its BMC.
///
/// Read-only once built. The wrapped [`reqwest::Client`] keeps reqwest's
/// connection pooling and bounds every request by the configured connect and
/// request timeouts.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    base_path: String,
    default_headers: HeaderMap,
    user_agent: String,
    timeouts: TransportTimeouts,
    http_client: Client,
}

impl TransportConfig {
    /// Builds the transport for `base_path`.
    ///
    /// # Arguments
    /// * `insecure` - skip TLS certificate verification (self-signed BMC certificates)
    /// * `use_proxy` - honour proxy settings from the environment
    /// * `user_agent` - value of the `User-Agent` header
    /// * `timeouts` - connect and whole-request timeouts
    ///
    /// # Errors
    /// * `RedfishError::Validation` if `user_agent` is not a valid header value
    /// * `RedfishError::Connection` if the HTTP client cannot be built
    pub fn build(
        base_path: impl Into<String>,
        insecure: bool,
        use_proxy: bool,
        user_agent: impl Into<String>,
        timeouts: TransportTimeouts,
    ) -> RedfishResult<Self> {
        let user_agent = user_agent.into();

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let agent_header = HeaderValue::from_str(&user_agent).map_err(|e| ValidationError::Field {
            field: "user_agent".to_string(),
            message: e.to_string(),
        })?;
        default_headers.insert(USER_AGENT, agent_header);

        let mut builder = Client::builder()
            .danger_accept_invalid_certs(insecure)
            .connect_timeout(timeouts.connect)
            .timeout(timeouts.request)
            .default_headers(default_headers.clone());
        if !use_proxy {
            builder = builder.no_proxy();
        }
        let http_client = builder
            .build()
            .map_err(|e| RedfishError::Connection(e.to_string()))?;

        Ok(Self {
            base_path: base_path.into().trim_end_matches('/').to_string(),
            default_headers,
            user_agent,
            timeouts,
            http_client,
        })
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn timeouts(&self) -> TransportTimeouts {
        self.timeouts
    }

    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    /// Joins a resource path onto the base path.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_path, path.trim_start_matches('/'))
    }
}
