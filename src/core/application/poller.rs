//! Bounded convergence polling.

use crate::core::domain::{
    error::{RedfishError, RedfishResult},
    model::operation_context::OperationContext,
};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Re-queries a resource until it reaches an expected state.
///
/// Each attempt runs the probe once; between attempts the poller sleeps for
/// a fixed interval. The number of attempts comes from the operation
/// context, falling back to the poller's default budget. Cancellation of the
/// context is observed before every attempt, while a probe is in flight and
/// during every sleep.
#[derive(Debug, Clone, Copy)]
pub struct BoundedPoller {
    interval: Duration,
    default_budget: u32,
}

impl BoundedPoller {
    pub fn new(interval: Duration, default_budget: u32) -> Self {
        Self {
            interval,
            default_budget,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn default_budget(&self) -> u32 {
        self.default_budget
    }

    /// Runs `probe` until it yields `true`.
    ///
    /// Makes at most `budget` attempts (at least one), where `budget` is the
    /// context's retry budget or the poller default.
    ///
    /// # Errors
    /// * the probe's own error, immediately
    /// * `RedfishError::OperationRetriesExceeded` once every attempt has failed
    /// * `RedfishError::Cancelled` if the context is cancelled
    pub async fn poll_until<F, Fut>(
        &self,
        ctx: &OperationContext,
        what: &str,
        mut probe: F,
    ) -> RedfishResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RedfishResult<bool>>,
    {
        let retries = ctx.retry_budget_or(self.default_budget);
        let attempts = retries.max(1);

        for attempt in 1..=attempts {
            if ctx.is_cancelled() {
                return Err(cancelled(what));
            }

            let reached = tokio::select! {
                _ = ctx.cancellation().cancelled() => return Err(cancelled(what)),
                reached = probe() => reached?,
            };
            if reached {
                debug!(what, attempt, "condition reached");
                return Ok(());
            }
            debug!(what, attempt, attempts, "condition not reached yet");

            if attempt < attempts {
                tokio::select! {
                    _ = ctx.cancellation().cancelled() => return Err(cancelled(what)),
                    _ = tokio::time::sleep(self.interval) => {}
                }
            }
        }

        Err(RedfishError::OperationRetriesExceeded {
            what: what.to_string(),
            retries,
        })
    }
}

fn cancelled(what: &str) -> RedfishError {
    RedfishError::Cancelled {
        what: what.to_string(),
    }
}
