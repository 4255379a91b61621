//! The Management API surface consumed by the client.

use crate::core::domain::{
    error::ApiResult,
    model::{
        computer_system::{ComputerSystem, SystemPatch},
        operation_context::OperationContext,
        power_state::ResetRequest,
        virtual_media::{InsertMediaRequest, VirtualMedia, VirtualMediaCollection},
    },
};
use async_trait::async_trait;

/// The subset of the Redfish resource model needed for power and virtual
/// media control.
///
/// Every call receives the operation context so implementations can attach
/// its credential. Failures are reported raw as [`crate::ApiFailure`] and are
/// screened by the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedfishApi: Send + Sync {
    async fn get_manager_virtual_media(
        &self,
        ctx: &OperationContext,
        manager_id: &str,
        media_id: &str,
    ) -> ApiResult<VirtualMedia>;

    async fn list_manager_virtual_media(
        &self,
        ctx: &OperationContext,
        manager_id: &str,
    ) -> ApiResult<VirtualMediaCollection>;

    async fn eject_virtual_media(
        &self,
        ctx: &OperationContext,
        manager_id: &str,
        media_id: &str,
    ) -> ApiResult<()>;

    async fn insert_virtual_media(
        &self,
        ctx: &OperationContext,
        manager_id: &str,
        media_id: &str,
        body: &InsertMediaRequest,
    ) -> ApiResult<()>;

    async fn get_system(&self, ctx: &OperationContext, system_id: &str)
    -> ApiResult<ComputerSystem>;

    async fn set_system(
        &self,
        ctx: &OperationContext,
        system_id: &str,
        body: &SystemPatch,
    ) -> ApiResult<()>;

    async fn reset_system(
        &self,
        ctx: &OperationContext,
        system_id: &str,
        body: &ResetRequest,
    ) -> ApiResult<()>;
}
