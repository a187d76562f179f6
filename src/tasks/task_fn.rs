//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn(&I, Injection) -> W` where `W: Into<Work<T>>`,
//! producing a fresh [`Work`] per run. Closures can return a plain
//! `Result<T, TaskError>`, a [`TaskHandle`](crate::TaskHandle) or a [`Work`] directly.
//!
//! ## Concurrency semantics
//! - Every run calls the closure again; nothing is shared between runs unless the closure
//!   captures it explicitly (use `Arc<...>` for that).
//!
//! ## Example
//! ```rust
//! use taskcell::{Injection, Task, TaskError, TaskFn, TaskRef, Work};
//!
//! let t: TaskRef<Vec<u32>, usize> = TaskFn::arc("count", |ids: &Vec<u32>, _inj: Injection| {
//!     Ok::<_, TaskError>(ids.len())
//! });
//!
//! assert_eq!(t.name(), "count");
//!
//! let slow: TaskRef<u32, u32> = TaskFn::arc("slow", |n: &u32, _inj: Injection| {
//!     let n = *n;
//!     Work::deferred(async move { Ok(n + 1) })
//! });
//! assert_eq!(slow.name(), "slow");
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use crate::tasks::task::{Injection, Task};
use crate::tasks::work::Work;

/// Function-backed task implementation.
#[derive(Debug)]
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a [`TaskRef`](crate::TaskRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<I, T, F, W> Task<I, T> for TaskFn<F>
where
    F: Fn(&I, Injection) -> W + Send + Sync + 'static,
    W: Into<Work<T>>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self, inputs: &I, injection: Injection) -> Work<T> {
        (self.f)(inputs, injection).into()
    }
}
