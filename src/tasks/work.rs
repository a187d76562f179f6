//! # Shapes of work returned by a creation function.
//!
//! [`Work`] is the tagged union the task wrapper normalizes:
//! ```text
//! Work::Immediate(Result)          → settles synchronously, no pending window
//! Work::Deferred(future)           → spawned, settles when the future does
//! Work::Cancellable(TaskHandle)    → like Deferred, plus a caller-supplied cancel action
//! ```
//!
//! [`TaskHandle`] pairs a deferred value with an explicit cancel action, for callers that
//! own their cancellation logic (closing a connection, aborting a request, ...).

use std::fmt;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::TaskError;

/// Cancel action attached to a [`TaskHandle`]. Invoked at most once.
pub type CancelAction = Box<dyn FnOnce() + Send + 'static>;

/// Future produced by deferred work.
pub type WorkFuture<T> = BoxFuture<'static, Result<T, TaskError>>;

/// What a creation function produced.
pub enum Work<T> {
    /// Already settled value or failure.
    Immediate(Result<T, TaskError>),
    /// Deferred value.
    Deferred(WorkFuture<T>),
    /// Deferred value with its own cancel action.
    Cancellable(TaskHandle<T>),
}

impl<T> Work<T> {
    /// Immediately successful work.
    pub fn ready(value: T) -> Self {
        Work::Immediate(Ok(value))
    }

    /// Immediately failed work.
    pub fn failed(error: TaskError) -> Self {
        Work::Immediate(Err(error))
    }

    /// Deferred work backed by `fut`.
    pub fn deferred<Fut>(fut: Fut) -> Self
    where
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        Work::Deferred(fut.boxed())
    }

    /// True if the work settles without suspending.
    pub fn is_immediate(&self) -> bool {
        matches!(self, Work::Immediate(_))
    }
}

impl<T> From<Result<T, TaskError>> for Work<T> {
    fn from(res: Result<T, TaskError>) -> Self {
        Work::Immediate(res)
    }
}

impl<T> From<TaskHandle<T>> for Work<T> {
    fn from(handle: TaskHandle<T>) -> Self {
        Work::Cancellable(handle)
    }
}

impl<T> fmt::Debug for Work<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Work::Immediate(Ok(_)) => f.write_str("Work::Immediate(Ok(..))"),
            Work::Immediate(Err(e)) => write!(f, "Work::Immediate(Err({e:?}))"),
            Work::Deferred(_) => f.write_str("Work::Deferred(..)"),
            Work::Cancellable(h) => write!(f, "Work::Cancellable({h:?})"),
        }
    }
}

/// A deferred value paired with an optional cancel action.
///
/// # Example
/// ```
/// use taskcell::{TaskHandle, TaskError};
/// use tokio_util::sync::CancellationToken;
///
/// let conn = CancellationToken::new();
/// let guard = conn.clone();
/// let handle = TaskHandle::with_cancel(
///     async { Ok::<_, TaskError>(7_u32) },
///     move || guard.cancel(),
/// );
/// assert!(handle.has_cancel());
/// ```
pub struct TaskHandle<T> {
    future: WorkFuture<T>,
    cancel: Option<CancelAction>,
}

impl<T> TaskHandle<T> {
    /// Handle without a custom cancel action.
    pub fn new<Fut>(fut: Fut) -> Self
    where
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        Self {
            future: fut.boxed(),
            cancel: None,
        }
    }

    /// Handle whose `cancel` runs when the owning run is cancelled or superseded.
    pub fn with_cancel<Fut, C>(fut: Fut, cancel: C) -> Self
    where
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        Self {
            future: fut.boxed(),
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Handle over an already known result, still honoring `cancel`.
    pub fn ready<C>(result: Result<T, TaskError>, cancel: C) -> Self
    where
        T: Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        Self::with_cancel(futures::future::ready(result), cancel)
    }

    /// True if a cancel action was supplied.
    pub fn has_cancel(&self) -> bool {
        self.cancel.is_some()
    }

    /// Splits the handle into its future and cancel action.
    pub fn into_parts(self) -> (WorkFuture<T>, Option<CancelAction>) {
        (self.future, self.cancel)
    }
}

impl<T> fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("cancel", &self.cancel.is_some())
            .finish_non_exhaustive()
    }
}
