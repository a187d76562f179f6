//! # Task abstraction.
//!
//! A [`Task`] is a *creation function*: every time the controller decides to (re)run, it
//! calls [`Task::create`] with the current inputs and an [`Injection`], and receives a
//! [`Work`] describing the shape of the produced value.
//!
//! The common handle type is [`TaskRef`], an `Arc<dyn Task<I, T>>` that the controller
//! stores in its self-record and can swap without restarting an in-flight run.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::tasks::work::Work;

/// Auxiliary context passed to the creation function.
///
/// `abort` is cancelled as soon as the run is cancelled, superseded or the controller is
/// torn down. Pass it to cancellable I/O (or `select!` on it) to actually stop the work;
/// ignoring it only means the work keeps running unobserved.
#[derive(Clone, Debug)]
pub struct Injection {
    /// Cancellation token of this run.
    pub abort: CancellationToken,
}

impl Injection {
    pub(crate) fn new(abort: CancellationToken) -> Self {
        Self { abort }
    }

    /// Shorthand for `self.abort.is_cancelled()`.
    pub fn is_aborted(&self) -> bool {
        self.abort.is_cancelled()
    }
}

/// # Creation function for one unit of work.
///
/// `create` is invoked synchronously on every trigger. It must not block; long work
/// belongs in the returned future.
///
/// # Example
/// ```
/// use taskcell::{Injection, Task, TaskError, Work};
///
/// struct Double;
///
/// impl Task<u32, u32> for Double {
///     fn name(&self) -> &str { "double" }
///
///     fn create(&self, inputs: &u32, _injection: Injection) -> Work<u32> {
///         Work::ready(inputs * 2)
///     }
/// }
/// ```
pub trait Task<I, T>: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Produces the work for one run.
    fn create(&self, inputs: &I, injection: Injection) -> Work<T>;
}

/// Shared reference to a task.
pub type TaskRef<I, T> = Arc<dyn Task<I, T>>;
