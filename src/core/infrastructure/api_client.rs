//! reqwest-backed implementation of the Management API surface.

use crate::core::{
    application::redfish_api::RedfishApi,
    domain::{
        error::{ApiFailure, ApiResult, RedfishResult},
        model::{
            client_config::RateLimitConfig,
            computer_system::{ComputerSystem, SystemPatch},
            operation_context::OperationContext,
            power_state::ResetRequest,
            virtual_media::{InsertMediaRequest, VirtualMedia, VirtualMediaCollection},
        },
    },
    infrastructure::transport::TransportConfig,
};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::Method;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::trace;

/// HTTP client for the Redfish endpoints of a single BMC.
///
/// Each request carries the transport's default headers and, when the
/// operation context has one, a basic-auth credential. Any non-2xx answer is
/// returned as an [`ApiFailure`] holding the status and body for screening.
#[derive(Debug, Clone)]
pub struct HttpRedfishApi {
    transport: TransportConfig,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl HttpRedfishApi {
    /// Creates a new `HttpRedfishApi` on top of `transport`.
    ///
    /// # Errors
    /// Returns `RedfishError::Validation` if the rate limit allows zero requests.
    pub fn new(transport: TransportConfig, rate_limit: Option<RateLimitConfig>) -> RedfishResult<Self> {
        let rate_limiter = match rate_limit {
            Some(rl) => {
                rl.validate()?;
                let per_second = NonZeroU32::new(rl.requests_per_second).unwrap_or(NonZeroU32::MIN);
                let burst = NonZeroU32::new(rl.burst_size).unwrap_or(NonZeroU32::MIN);
                let quota = Quota::per_second(per_second).allow_burst(burst);
                Some(Arc::new(DefaultDirectRateLimiter::direct(quota)))
            }
            None => None,
        };

        Ok(Self {
            transport,
            rate_limiter,
        })
    }

    /// Returns the transport this client sends requests through.
    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// Sends a request and returns the response if its status is a success.
    async fn execute_request<B>(
        &self,
        ctx: &OperationContext,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<reqwest::Response>
    where
        B: serde::Serialize + Sync,
    {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let url = self.transport.endpoint(path);
        trace!(%method, %url, "sending redfish request");

        let mut req_builder = self.transport.http_client().request(method, &url);
        if let Some(auth) = ctx.credentials() {
            req_builder = req_builder.basic_auth(auth.username(), Some(auth.password()));
        }
        if let Some(body) = body {
            req_builder = req_builder.json(body);
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| ApiFailure::transport(e.to_string()))?;

        let status = response.status();
        trace!(%status, %url, "received redfish response");
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                trace!(%status, %url, error = %e, "failed to read error response body");
                String::new()
            });
            return Err(ApiFailure::response(
                status.as_u16(),
                error_text,
                status.to_string(),
            ));
        }

        Ok(response)
    }

    async fn get_json<T>(&self, ctx: &OperationContext, path: &str) -> ApiResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .execute_request(ctx, Method::GET, path, None::<&()>)
            .await?;
        let status = response.status().as_u16();
        response.json::<T>().await.map_err(|e| {
            ApiFailure::response(status, "", format!("Failed to parse response: {e}"))
        })
    }

    async fn send_action<B>(&self, ctx: &OperationContext, method: Method, path: &str, body: &B) -> ApiResult<()>
    where
        B: serde::Serialize + Sync,
    {
        self.execute_request(ctx, method, path, Some(body))
            .await
            .map(|_| ())
    }
}

fn virtual_media_path(manager_id: &str, media_id: &str) -> String {
    format!("Managers/{manager_id}/VirtualMedia/{media_id}")
}

#[async_trait]
impl RedfishApi for HttpRedfishApi {
    async fn get_manager_virtual_media(
        &self,
        ctx: &OperationContext,
        manager_id: &str,
        media_id: &str,
    ) -> ApiResult<VirtualMedia> {
        self.get_json(ctx, &virtual_media_path(manager_id, media_id))
            .await
    }

    async fn list_manager_virtual_media(
        &self,
        ctx: &OperationContext,
        manager_id: &str,
    ) -> ApiResult<VirtualMediaCollection> {
        self.get_json(ctx, &format!("Managers/{manager_id}/VirtualMedia"))
            .await
    }

    async fn eject_virtual_media(
        &self,
        ctx: &OperationContext,
        manager_id: &str,
        media_id: &str,
    ) -> ApiResult<()> {
        let path = format!(
            "{}/Actions/VirtualMedia.EjectMedia",
            virtual_media_path(manager_id, media_id)
        );
        self.send_action(ctx, Method::POST, &path, &serde_json::json!({}))
            .await
    }

    async fn insert_virtual_media(
        &self,
        ctx: &OperationContext,
        manager_id: &str,
        media_id: &str,
        body: &InsertMediaRequest,
    ) -> ApiResult<()> {
        let path = format!(
            "{}/Actions/VirtualMedia.InsertMedia",
            virtual_media_path(manager_id, media_id)
        );
        self.send_action(ctx, Method::POST, &path, body).await
    }

    async fn get_system(&self, ctx: &OperationContext, system_id: &str) -> ApiResult<ComputerSystem> {
        self.get_json(ctx, &format!("Systems/{system_id}")).await
    }

    async fn set_system(
        &self,
        ctx: &OperationContext,
        system_id: &str,
        body: &SystemPatch,
    ) -> ApiResult<()> {
        self.send_action(ctx, Method::PATCH, &format!("Systems/{system_id}"), body)
            .await
    }

    async fn reset_system(
        &self,
        ctx: &OperationContext,
        system_id: &str,
        body: &ResetRequest,
    ) -> ApiResult<()> {
        let path = format!("Systems/{system_id}/Actions/ComputerSystem.Reset");
        self.send_action(ctx, Method::POST, &path, body).await
    }
}
