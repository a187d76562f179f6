//! # Task abstractions and the task wrapper.
//!
//! This module provides the task-related types:
//! - [`Task`] - trait for creation functions (inputs + injection → work)
//! - [`TaskFn`] - function-backed task implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task<I, T>>`)
//! - [`Work`] / [`TaskHandle`] - shapes a creation function may return
//! - [`Outcome`] - terminal outcome of a run, with a dedicated cancellation variant
//! - [`TaskWrapper`] - one run: completion signal plus idempotent cancellation

mod outcome;
mod task;
mod task_fn;
mod work;
mod wrapper;

pub use outcome::Outcome;
pub use task::{Injection, Task, TaskRef};
pub use task_fn::TaskFn;
pub use work::{CancelAction, TaskHandle, Work, WorkFuture};
pub use wrapper::{Completion, TaskWrapper};
