//! Protocol-agnostic interface of an out-of-band management client.

use crate::core::{
    application::{redfish_api::RedfishApi, redfish_client::RedfishClient},
    domain::{
        error::RedfishResult,
        model::{operation_context::OperationContext, power_state::PowerState},
    },
};
use async_trait::async_trait;

/// Identifier of the Redfish implementation of [`OutOfBandClient`].
pub const CLIENT_TYPE: &str = "redfish";

/// Operations a cluster-bootstrap tool needs from a node's management
/// controller to provision it remotely.
#[async_trait]
pub trait OutOfBandClient: Send + Sync {
    /// Identifier of the managed node.
    fn node_id(&self) -> &str;

    /// Ejects all inserted virtual media.
    async fn eject_virtual_media(&self, ctx: &OperationContext) -> RedfishResult<()>;

    /// Power cycles the node and waits until it is back on.
    async fn reboot_system(&self, ctx: &OperationContext) -> RedfishResult<()>;

    /// Points the next boot at the virtual media device.
    async fn set_boot_source_by_type(&self, ctx: &OperationContext) -> RedfishResult<()>;

    /// Replaces any inserted media with `image`.
    async fn set_virtual_media(&self, ctx: &OperationContext, image: &str) -> RedfishResult<()>;

    async fn system_power_off(&self, ctx: &OperationContext) -> RedfishResult<()>;

    async fn system_power_on(&self, ctx: &OperationContext) -> RedfishResult<()>;

    async fn system_power_status(&self, ctx: &OperationContext) -> RedfishResult<PowerState>;
}

#[async_trait]
impl<A: RedfishApi> OutOfBandClient for RedfishClient<A> {
    fn node_id(&self) -> &str {
        RedfishClient::node_id(self)
    }

    async fn eject_virtual_media(&self, ctx: &OperationContext) -> RedfishResult<()> {
        RedfishClient::eject_virtual_media(self, ctx).await
    }

    async fn reboot_system(&self, ctx: &OperationContext) -> RedfishResult<()> {
        RedfishClient::reboot_system(self, ctx).await
    }

    async fn set_boot_source_by_type(&self, ctx: &OperationContext) -> RedfishResult<()> {
        RedfishClient::set_boot_source_by_type(self, ctx).await
    }

    async fn set_virtual_media(&self, ctx: &OperationContext, image: &str) -> RedfishResult<()> {
        RedfishClient::set_virtual_media(self, ctx, image).await
    }

    async fn system_power_off(&self, ctx: &OperationContext) -> RedfishResult<()> {
        RedfishClient::system_power_off(self, ctx).await
    }

    async fn system_power_on(&self, ctx: &OperationContext) -> RedfishResult<()> {
        RedfishClient::system_power_on(self, ctx).await
    }

    async fn system_power_status(&self, ctx: &OperationContext) -> RedfishResult<PowerState> {
        RedfishClient::system_power_status(self, ctx).await
    }
}
