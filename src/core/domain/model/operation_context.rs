//! Per-call context threaded through every client operation.

use crate::core::domain::value_object::BasicAuth;
use tokio_util::sync::CancellationToken;

/// Number of poll attempts used when a context carries no retry budget.
pub const DEFAULT_RETRY_BUDGET: u32 = 30;

/// Request-scoped state for one top-level operation.
///
/// Carries the basic-auth credential sent with each request, an optional
/// override of the convergence-poll retry budget, and a cancellation token
/// observed by every poll loop. Cloning a context shares its token.
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    credentials: Option<BasicAuth>,
    retry_budget: Option<u32>,
    cancellation: CancellationToken,
}

impl OperationContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: Option<BasicAuth>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Overrides the number of poll attempts for operations run with this context.
    #[must_use]
    pub fn with_retry_budget(mut self, retries: u32) -> Self {
        self.retry_budget = Some(retries);
        self
    }

    /// Uses `token` to cancel operations run with this context.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn credentials(&self) -> Option<&BasicAuth> {
        self.credentials.as_ref()
    }

    pub fn retry_budget(&self) -> Option<u32> {
        self.retry_budget
    }

    /// The retry budget, falling back to `default` when none was set.
    pub fn retry_budget_or(&self, default: u32) -> u32 {
        self.retry_budget.unwrap_or(default)
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
