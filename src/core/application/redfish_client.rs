//! The Redfish out-of-band client.

use crate::core::{
    application::{poller::BoundedPoller, redfish_api::RedfishApi},
    domain::{
        error::{RedfishError, RedfishResult, screen_redfish_error},
        model::{
            computer_system::SystemPatch,
            operation_context::OperationContext,
            power_state::{PowerState, ResetRequest, ResetType},
            virtual_media::{COMPATIBLE_MEDIA_TYPES, InsertMediaRequest},
        },
        value_object::{BasicAuth, resource_id_from_url},
    },
    infrastructure::{api_client::HttpRedfishApi, transport::TransportConfig},
};
use tracing::{debug, info};

/// Drives the BMC of exactly one physical host.
///
/// Every operation runs sequentially on the calling task. State-changing
/// commands (power transitions, media ejection) are followed by a bounded
/// convergence poll; their retry budget and cancellation come from the
/// [`OperationContext`] passed to each call.
#[derive(Debug)]
pub struct RedfishClient<A = HttpRedfishApi> {
    node_id: String,
    api: A,
    transport: Option<TransportConfig>,
    credentials: Option<BasicAuth>,
    power_poller: BoundedPoller,
    media_poller: BoundedPoller,
}

impl<A: RedfishApi> RedfishClient<A> {
    /// Creates a client for `node_id` on top of an arbitrary API surface.
    ///
    /// `power_poller` paces the waits of power transitions, `media_poller`
    /// the waits of media ejection.
    pub fn with_api(
        node_id: impl Into<String>,
        api: A,
        power_poller: BoundedPoller,
        media_poller: BoundedPoller,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            api,
            transport: None,
            credentials: None,
            power_poller,
            media_poller,
        }
    }

    pub(crate) fn with_transport(
        mut self,
        transport: TransportConfig,
        credentials: Option<BasicAuth>,
    ) -> Self {
        self.transport = Some(transport);
        self.credentials = credentials;
        self
    }

    /// Identifier of the managed system.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// The Management API surface used by this client.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Transport configuration, when the client was built over HTTP.
    pub fn transport(&self) -> Option<&TransportConfig> {
        self.transport.as_ref()
    }

    /// A fresh operation context carrying this client's credential, if any.
    pub fn operation_context(&self) -> OperationContext {
        OperationContext::new().with_credentials(self.credentials.clone())
    }

    /// Ejects every inserted virtual media device of the node.
    ///
    /// Each inserted device is ejected and then polled until the BMC reports
    /// it as no longer inserted. When nothing is inserted no eject command is
    /// sent.
    ///
    /// # Errors
    /// * `OperationRetriesExceeded` if a device is still inserted after the retry budget
    /// * the screened error of any failed API call
    pub async fn eject_virtual_media(&self, ctx: &OperationContext) -> RedfishResult<()> {
        let manager_id = self.manager_id(ctx).await?;
        self.eject_all_media(ctx, &manager_id).await
    }

    /// Power cycles the node: forced power off, wait for `Off`, power on,
    /// wait for `On`.
    ///
    /// # Errors
    /// * `OperationRetriesExceeded` naming the phase that did not converge
    /// * the screened error of a failed reset command; no further step is taken
    pub async fn reboot_system(&self, ctx: &OperationContext) -> RedfishResult<()> {
        debug!(node = %self.node_id, "rebooting node: powering off");
        self.reset(ctx, ResetType::ForceOff).await.inspect_err(|_| {
            debug!(node = %self.node_id, "failed to reboot node: shutdown failure");
        })?;
        self.wait_for_power_state(ctx, PowerState::Off).await?;

        debug!(node = %self.node_id, "rebooting node: powering on");
        self.reset(ctx, ResetType::On).await.inspect_err(|_| {
            debug!(node = %self.node_id, "failed to reboot node: startup failure");
        })?;
        self.wait_for_power_state(ctx, PowerState::On).await?;

        info!(node = %self.node_id, "node rebooted");
        Ok(())
    }

    /// Sets the next boot source to the node's CD/DVD virtual media.
    ///
    /// The override target is the first value allowed by the BMC that
    /// matches the virtual media type, compared case-insensitively.
    ///
    /// # Errors
    /// `RedfishClient` if the system cannot be queried or no allowable boot
    /// source matches the media type.
    pub async fn set_boot_source_by_type(&self, ctx: &OperationContext) -> RedfishResult<()> {
        let manager_id = self.manager_id(ctx).await?;
        let (_, media_type) = self.compatible_virtual_media(ctx, &manager_id).await?;
        debug!(node = %self.node_id, %media_type, "setting boot device");

        let system = screen_redfish_error(self.api.get_system(ctx, &self.node_id).await)
            .map_err(|e| {
                let status = match &e {
                    RedfishError::RedfishClient { status, .. } => *status,
                    _ => None,
                };
                RedfishError::RedfishClient {
                    message: format!("Get System[{}] failed with err: {e}", self.node_id),
                    status,
                }
            })?;

        let target = system
            .boot
            .allowable_override_targets
            .iter()
            .find(|value| value.eq_ignore_ascii_case(&media_type))
            .ok_or_else(|| {
                RedfishError::client(format!(
                    "failed to set system[{}] boot source: no allowable value matches '{media_type}'",
                    self.node_id
                ))
            })?;

        ensure_not_cancelled(ctx, &format!("set boot source system {}", self.node_id))?;
        let patch = SystemPatch::boot_source_override(target.as_str());
        screen_redfish_error(self.api.set_system(ctx, &self.node_id, &patch).await)?;

        info!(node = %self.node_id, boot_target = %target, "boot source override set");
        Ok(())
    }

    /// Inserts `image` into the node's CD/DVD virtual media device.
    ///
    /// All inserted media are ejected first, so at most one image is ever
    /// inserted. `image` must be reachable by the BMC.
    ///
    /// # Errors
    /// Whatever ejecting fails with, or the screened error of the insert.
    pub async fn set_virtual_media(&self, ctx: &OperationContext, image: &str) -> RedfishResult<()> {
        debug!(node = %self.node_id, image, "inserting virtual media");
        let manager_id = self.manager_id(ctx).await?;
        self.eject_all_media(ctx, &manager_id).await?;

        let (media_id, _) = self.compatible_virtual_media(ctx, &manager_id).await?;
        ensure_not_cancelled(ctx, &format!("insert media {media_id}"))?;
        let request = InsertMediaRequest::new(image);
        screen_redfish_error(
            self.api
                .insert_virtual_media(ctx, &manager_id, &media_id, &request)
                .await,
        )?;

        info!(node = %self.node_id, image, media = %media_id, "virtual media inserted");
        Ok(())
    }

    /// Sends a forced power off. Does not wait for the node to be off.
    pub async fn system_power_off(&self, ctx: &OperationContext) -> RedfishResult<()> {
        self.reset(ctx, ResetType::ForceOff).await
    }

    /// Sends a power on. Does not wait for the node to be on.
    pub async fn system_power_on(&self, ctx: &OperationContext) -> RedfishResult<()> {
        self.reset(ctx, ResetType::On).await
    }

    /// Current power state of the node. Unrecognized states are `Unknown`.
    pub async fn system_power_status(&self, ctx: &OperationContext) -> RedfishResult<PowerState> {
        let system = screen_redfish_error(self.api.get_system(ctx, &self.node_id).await)?;
        Ok(system.power())
    }

    async fn reset(&self, ctx: &OperationContext, reset_type: ResetType) -> RedfishResult<()> {
        let what = match reset_type {
            ResetType::ForceOff => format!("power off system {}", self.node_id),
            ResetType::On => format!("power on system {}", self.node_id),
        };
        ensure_not_cancelled(ctx, &what)?;
        let request = ResetRequest::new(reset_type);
        screen_redfish_error(self.api.reset_system(ctx, &self.node_id, &request).await)
    }

    async fn wait_for_power_state(
        &self,
        ctx: &OperationContext,
        desired: PowerState,
    ) -> RedfishResult<()> {
        let what = match desired {
            PowerState::Off => format!("power off system {}", self.node_id),
            _ => format!("power on system {}", self.node_id),
        };
        let api = &self.api;
        let node_id = self.node_id.as_str();

        self.power_poller
            .poll_until(ctx, &what, move || async move {
                let system = screen_redfish_error(api.get_system(ctx, node_id).await)?;
                Ok(system.power() == desired)
            })
            .await?;

        debug!(node = %self.node_id, state = %desired, "node reached power state");
        Ok(())
    }

    async fn eject_all_media(&self, ctx: &OperationContext, manager_id: &str) -> RedfishResult<()> {
        let collection =
            screen_redfish_error(self.api.list_manager_virtual_media(ctx, manager_id).await)?;

        for member in &collection.members {
            let media_id = resource_id_from_url(&member.odata_id);
            let media = screen_redfish_error(
                self.api
                    .get_manager_virtual_media(ctx, manager_id, &media_id)
                    .await,
            )?;
            if !media.is_inserted() {
                continue;
            }

            debug!(media = %media.name, "virtual media inserted, attempting to eject");
            let what = format!("eject media {media_id}");
            ensure_not_cancelled(ctx, &what)?;
            screen_redfish_error(
                self.api
                    .eject_virtual_media(ctx, manager_id, &media_id)
                    .await,
            )?;

            let api = &self.api;
            let id = media_id.as_str();
            self.media_poller
                .poll_until(ctx, &what, move || async move {
                    let media =
                        screen_redfish_error(api.get_manager_virtual_media(ctx, manager_id, id).await)?;
                    Ok(!media.is_inserted())
                })
                .await?;
            debug!(media = %media.name, "successfully ejected virtual media");
        }

        Ok(())
    }

    /// Resolves the manager responsible for the node.
    async fn manager_id(&self, ctx: &OperationContext) -> RedfishResult<String> {
        let system = screen_redfish_error(self.api.get_system(ctx, &self.node_id).await)?;
        system
            .manager_link()
            .map(resource_id_from_url)
            .ok_or_else(|| {
                RedfishError::client(format!(
                    "system '{}' is not managed by any manager",
                    self.node_id
                ))
            })
    }

    /// Finds the first virtual media device able to hold a CD/DVD image,
    /// returning its id and media type.
    async fn compatible_virtual_media(
        &self,
        ctx: &OperationContext,
        manager_id: &str,
    ) -> RedfishResult<(String, String)> {
        let collection =
            screen_redfish_error(self.api.list_manager_virtual_media(ctx, manager_id).await)?;

        for member in &collection.members {
            let media_id = resource_id_from_url(&member.odata_id);
            let media = screen_redfish_error(
                self.api
                    .get_manager_virtual_media(ctx, manager_id, &media_id)
                    .await,
            )?;
            if let Some(media_type) = media.compatible_media_type() {
                return Ok((media_id, media_type.to_string()));
            }
        }

        Err(RedfishError::client(format!(
            "unable to find virtual media with type {}",
            COMPATIBLE_MEDIA_TYPES.join(" or ")
        )))
    }
}

/// Fails with `Cancelled` instead of sending `what` once the context is cancelled.
fn ensure_not_cancelled(ctx: &OperationContext, what: &str) -> RedfishResult<()> {
    if ctx.is_cancelled() {
        return Err(RedfishError::Cancelled {
            what: what.to_string(),
        });
    }
    Ok(())
}
