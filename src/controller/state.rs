//! # Observable execution state.
//!
//! ```text
//!            trigger                 resolves
//!   Idle ───────────────► Pending ─────────────► Succeeded
//!    ▲ (on-demand only)     │  │    rejects
//!    │                      │  └───────────────► Failed
//!    │                      │ cancel acknowledged
//!    │                      └──────────────────► Cancelled   (result/error untouched)
//!    │
//!  Succeeded / Failed / Cancelled ──trigger──► Pending
//! ```
//!
//! ## Invariants
//! - At most one of `result` / `error` is set.
//! - `is_pending` is `true` exactly in `Status::Pending`.

use crate::error::TaskError;

/// Lifecycle position of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// Nothing has run yet.
    #[default]
    Idle,
    /// A run is in flight.
    Pending,
    /// The last observed run produced a value.
    Succeeded,
    /// The last observed run failed.
    Failed,
    /// The last observed run was cancelled.
    Cancelled,
}

/// Externally observable snapshot of a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T> {
    /// Last successful value.
    pub result: Option<T>,
    /// Last failure.
    pub error: Option<TaskError>,
    /// True strictly between run start and its settlement or acknowledged cancellation.
    pub is_pending: bool,
    /// Lifecycle position.
    pub status: Status,
}

impl<T> Snapshot<T> {
    /// Initial snapshot.
    pub fn idle() -> Self {
        Self {
            result: None,
            error: None,
            is_pending: false,
            status: Status::Idle,
        }
    }

    /// Enter `Pending`, keeping the previous result/error visible.
    pub(crate) fn begin(&mut self) {
        self.is_pending = true;
        self.status = Status::Pending;
    }

    pub(crate) fn resolve(&mut self, value: T) {
        self.result = Some(value);
        self.error = None;
        self.is_pending = false;
        self.status = Status::Succeeded;
    }

    pub(crate) fn reject(&mut self, error: TaskError) {
        self.result = None;
        self.error = Some(error);
        self.is_pending = false;
        self.status = Status::Failed;
    }

    pub(crate) fn acknowledge_cancel(&mut self) {
        self.is_pending = false;
        self.status = Status::Cancelled;
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_and_failure_are_mutually_exclusive() {
        let mut s = Snapshot::idle();
        s.begin();
        assert!(s.is_pending);
        s.resolve(vec![1, 2, 3]);
        assert_eq!(s.result, Some(vec![1, 2, 3]));
        assert_eq!(s.status, Status::Succeeded);

        s.begin();
        assert_eq!(s.result, Some(vec![1, 2, 3]), "pending keeps previous result");
        s.reject(TaskError::fail("BigNumber"));
        assert_eq!(s.result, None);
        assert_eq!(s.error, Some(TaskError::fail("BigNumber")));
        assert!(!s.is_pending);
    }

    #[test]
    fn cancellation_leaves_result_and_error_untouched() {
        let mut s: Snapshot<u8> = Snapshot::idle();
        s.reject(TaskError::fail("old"));
        s.begin();
        s.acknowledge_cancel();

        assert_eq!(s.error, Some(TaskError::fail("old")));
        assert!(!s.is_pending);
        assert_eq!(s.status, Status::Cancelled);
    }
}
