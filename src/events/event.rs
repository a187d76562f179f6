//! # Events emitted by controllers.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Trigger events**: what asked the controller to act (activation, input change, execute, cancel)
//! - **Run events**: lifecycle of one run (starting, succeeded, failed, cancelled, superseded)
//! - **Controller events**: dropped stale settlements and teardown
//!
//! The [`Event`] struct carries metadata such as timestamps, controller name, the run
//! generation and a reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use taskcell::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_controller("users")
//!     .with_generation(3)
//!     .with_reason("BigNumber");
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.controller.as_deref(), Some("users"));
//! assert_eq!(ev.generation, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of controller events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Trigger events ===
    /// Controller was activated by its collaborator.
    ///
    /// Sets:
    /// - `controller`: controller name
    /// - `reason`: `"auto"` or `"on_demand"`
    Activated,

    /// Inputs changed (shallow inequality).
    ///
    /// Sets:
    /// - `controller`: controller name
    /// - `reason`: `"trigger"` or `"stored"` (on-demand controllers only store them)
    InputsChanged,

    /// `execute()` was requested.
    ExecuteRequested,

    /// `cancel()` was requested while a run was active.
    ///
    /// Sets:
    /// - `generation`: run being cancelled
    CancelRequested,

    // === Run events ===
    /// A new run is starting.
    ///
    /// Sets:
    /// - `generation`: run generation (1-based, per controller)
    /// - `task`: task name
    TaskStarting,

    /// The active run produced a value.
    TaskSucceeded,

    /// The active run failed.
    ///
    /// Sets:
    /// - `reason`: failure message
    TaskFailed,

    /// Cancellation of the active run was acknowledged.
    TaskCancelled,

    /// A run was cancelled because a newer one replaced it.
    ///
    /// Sets:
    /// - `generation`: superseded run
    TaskSuperseded,

    // === Controller events ===
    /// A settlement arrived for a run that is no longer active and was dropped.
    ///
    /// Sets:
    /// - `generation`: stale run
    /// - `reason`: outcome label
    SettlementDropped,

    /// Controller was torn down; no further transitions happen.
    TornDown,
}

/// Controller event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the emitting controller.
    pub controller: Option<Arc<str>>,
    /// Name of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Run generation, if applicable.
    pub generation: Option<u64>,
    /// Human-readable reason (errors, outcome labels, ...).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            controller: None,
            task: None,
            generation: None,
            reason: None,
        }
    }

    /// Attaches the controller name.
    #[inline]
    pub fn with_controller(mut self, name: impl Into<Arc<str>>) -> Self {
        self.controller = Some(name.into());
        self
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a run generation.
    #[inline]
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = Some(generation);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// True for events that end a run observably.
    #[inline]
    pub fn is_settlement(&self) -> bool {
        matches!(
            self.kind,
            EventKind::TaskSucceeded | EventKind::TaskFailed | EventKind::TaskCancelled
        )
    }
}
