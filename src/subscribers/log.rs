//! # LogWriter: events as `tracing` records
//!
//! A minimal subscriber that turns every [`Event`] into a structured `tracing` record under
//! the `taskcell` target. Install any `tracing` subscriber (for example
//! `tracing_subscriber::fmt`) to see them.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! DEBUG taskcell: starting controller="users" task="fetch-users" generation=2
//!  WARN taskcell: failed controller="users" generation=2 reason="execution failed: BigNumber"
//! DEBUG taskcell: superseded controller="users" generation=3
//!  INFO taskcell: torn down controller="users"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let controller = e.controller.as_deref().unwrap_or("-");
        let generation = e.generation.unwrap_or(0);
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::Activated => {
                tracing::debug!(target: "taskcell", controller, mode = reason, "activated");
            }
            EventKind::InputsChanged => {
                tracing::trace!(target: "taskcell", controller, effect = reason, "inputs changed");
            }
            EventKind::ExecuteRequested => {
                tracing::trace!(target: "taskcell", controller, "execute requested");
            }
            EventKind::CancelRequested => {
                tracing::debug!(target: "taskcell", controller, generation, "cancel requested");
            }
            EventKind::TaskStarting => {
                let task = e.task.as_deref().unwrap_or("-");
                tracing::debug!(target: "taskcell", controller, task, generation, "starting");
            }
            EventKind::TaskSucceeded => {
                tracing::debug!(target: "taskcell", controller, generation, "succeeded");
            }
            EventKind::TaskFailed => {
                tracing::warn!(target: "taskcell", controller, generation, reason, "failed");
            }
            EventKind::TaskCancelled => {
                tracing::debug!(target: "taskcell", controller, generation, "cancelled");
            }
            EventKind::TaskSuperseded => {
                tracing::debug!(target: "taskcell", controller, generation, "superseded");
            }
            EventKind::SettlementDropped => {
                tracing::trace!(target: "taskcell", controller, generation, outcome = reason, "stale settlement dropped");
            }
            EventKind::TornDown => {
                tracing::info!(target: "taskcell", controller, "torn down");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
