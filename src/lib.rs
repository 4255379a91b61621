mod core;

#[cfg(test)]
mod tests;

pub use crate::core::{
    application::{
        out_of_band::{CLIENT_TYPE, OutOfBandClient},
        poller::BoundedPoller,
        redfish_api::RedfishApi,
        redfish_client::RedfishClient,
    },
    domain::{
        error::{
            ApiFailure, ApiResult, RedfishError, RedfishResult, ValidationError,
            screen_redfish_error,
        },
        model::{
            client_config::{
                DEFAULT_CONNECT_TIMEOUT, DEFAULT_MEDIA_POLL_INTERVAL, DEFAULT_POLL_INTERVAL,
                DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT, RateLimitConfig, RedfishConfig,
                TransportTimeouts,
            },
            computer_system::{Boot, BootPatch, ComputerSystem, OdataRef, SystemLinks, SystemPatch},
            operation_context::{DEFAULT_RETRY_BUDGET, OperationContext},
            power_state::{PowerState, ResetRequest, ResetType},
            redfish_fault::{ExtendedInfo, RedfishFault, RedfishFaultDetail},
            virtual_media::{
                COMPATIBLE_MEDIA_TYPES, InsertMediaRequest, VirtualMedia, VirtualMediaCollection,
            },
        },
        value_object::{BasicAuth, RedfishUrl, resource_id_from_url},
    },
    infrastructure::{api_client::HttpRedfishApi, transport::TransportConfig},
};
pub use tokio_util::sync::CancellationToken;

use std::time::Duration;

/// Builder for a [`RedfishClient`] talking HTTP to a BMC.
///
/// # Examples
///
/// ```no_run
/// use redfish_oob::{RedfishClient, RedfishResult};
///
/// #[tokio::main]
/// async fn main() -> RedfishResult<()> {
///     let client = RedfishClient::builder()
///         .url("https://10.0.0.1/redfish/v1/Systems/1")
///         .credentials("root", "calvin")
///         .insecure(true)
///         .build()?;
///
///     let ctx = client.operation_context();
///     client.set_virtual_media(&ctx, "http://10.0.0.2/installer.iso").await?;
///     client.set_boot_source_by_type(&ctx).await?;
///     client.reboot_system(&ctx).await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Default)]
pub struct RedfishClientBuilder {
    url: Option<String>,
    insecure: bool,
    use_proxy: Option<bool>,
    username: Option<String>,
    password: Option<String>,
    user_agent: Option<String>,
    poll_interval: Option<Duration>,
    media_poll_interval: Option<Duration>,
    retry_budget: Option<u32>,
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    rate_limit: Option<RateLimitConfig>,
}

impl RedfishClientBuilder {
    /// Starts a builder from a loaded [`RedfishConfig`].
    pub fn from_config(config: &RedfishConfig) -> Self {
        Self {
            url: Some(config.url.clone()),
            insecure: config.insecure,
            use_proxy: Some(config.use_proxy),
            username: config.username.clone(),
            password: config.password.clone(),
            user_agent: Some(config.user_agent.clone()),
            poll_interval: Some(config.poll_interval()),
            media_poll_interval: Some(config.media_poll_interval()),
            retry_budget: Some(config.retry_budget),
            connect_timeout: Some(config.timeouts().connect),
            request_timeout: Some(config.timeouts().request),
            rate_limit: config.rate_limit,
        }
    }

    /// Management URL of the system, `scheme://host[:port]/<base-path>/<systemID>`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Skip TLS certificate verification.
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Honour proxy settings from the environment (default: true).
    pub fn use_proxy(mut self, use_proxy: bool) -> Self {
        self.use_proxy = Some(use_proxy);
        self
    }

    /// Basic-auth credential. Ignored unless both parts are non-empty.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Interval between two power state checks (default: 30s).
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Interval between two checks of an ejecting media device (default: 2s).
    pub fn media_poll_interval(mut self, interval: Duration) -> Self {
        self.media_poll_interval = Some(interval);
        self
    }

    /// Poll attempts used when an operation context carries no budget (default: 30).
    pub fn retry_budget(mut self, retries: u32) -> Self {
        self.retry_budget = Some(retries);
        self
    }

    /// Time allowed to establish a connection to the BMC (default: 30s).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Time allowed for a whole request (default: 60s).
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    /// Builds the client. No request is sent to the BMC.
    ///
    /// # Errors
    /// * `MissingConfiguration` if the URL is empty or carries no system ID
    /// * `RedfishClient` if the URL cannot be parsed
    /// * `Validation` for an invalid user agent or rate limit
    /// * `Connection` if the HTTP client cannot be built
    pub fn build(self) -> RedfishResult<RedfishClient> {
        let url = RedfishUrl::parse(self.url.as_deref().unwrap_or_default())?;

        let transport = TransportConfig::build(
            url.base_path(),
            self.insecure,
            self.use_proxy.unwrap_or(true),
            self.user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            TransportTimeouts {
                connect: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
                request: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            },
        )?;
        let api = HttpRedfishApi::new(transport.clone(), self.rate_limit)?;

        let budget = self.retry_budget.unwrap_or(DEFAULT_RETRY_BUDGET);
        let power_poller =
            BoundedPoller::new(self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL), budget);
        let media_poller = BoundedPoller::new(
            self.media_poll_interval
                .unwrap_or(DEFAULT_MEDIA_POLL_INTERVAL),
            budget,
        );
        let credentials = BasicAuth::new(
            self.username.unwrap_or_default(),
            self.password.unwrap_or_default(),
        );

        Ok(
            RedfishClient::with_api(url.system_id(), api, power_poller, media_poller)
                .with_transport(transport, credentials),
        )
    }
}

impl RedfishClient {
    /// Creates a new builder for RedfishClient configuration
    pub fn builder() -> RedfishClientBuilder {
        RedfishClientBuilder::default()
    }
}

/// Builds a client for the system behind `redfish_url` along with the
/// operation context to run its operations with.
///
/// The context carries a basic-auth credential when both `username` and
/// `password` are non-empty.
///
/// # Errors
/// See [`RedfishClientBuilder::build`].
pub fn new_client(
    redfish_url: &str,
    insecure: bool,
    use_proxy: bool,
    username: &str,
    password: &str,
) -> RedfishResult<(OperationContext, RedfishClient)> {
    let client = RedfishClient::builder()
        .url(redfish_url)
        .insecure(insecure)
        .use_proxy(use_proxy)
        .credentials(username, password)
        .build()?;
    Ok((client.operation_context(), client))
}
