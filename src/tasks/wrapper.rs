//! # Task wrapper: one run of a creation function.
//!
//! [`TaskWrapper`] normalizes whatever [`Task::create`] returned into a uniform handle:
//! a shared completion signal ([`Completion`]) plus an idempotent cancel action.
//!
//! ## Flow
//! ```text
//! start(task, inputs, token)
//!   ├─► task.create(inputs, Injection{abort: token})     (synchronous, panics caught)
//!   │
//!   ├─ Work::Immediate(res)   ──► completion = ready(Outcome)   (no pending window)
//!   │
//!   └─ Work::Deferred / Cancellable
//!        ├─► tokio::spawn(future)        (work runs detached from the observer)
//!        └─► completion = select! {
//!                biased;
//!                token.cancelled() → Outcome::Cancelled
//!                join              → token cancelled meanwhile? Cancelled : outcome
//!            }
//! ```
//!
//! ## Rules
//! - Cancellation is **cooperative**: the spawned work keeps running unless it watches
//!   [`Injection::abort`]; only its settlement is suppressed.
//! - Cancellation **wins** any race with a late settlement.
//! - `cancel()` is idempotent; the caller-supplied cancel action runs at most once.
//! - Completion is forced to `Outcome::Cancelled` on cancel, so every observer is unblocked.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::tasks::outcome::Outcome;
use crate::tasks::task::{Injection, Task};
use crate::tasks::work::{CancelAction, Work, WorkFuture};

/// Shared completion signal of a run. Cloneable; every clone yields the same outcome.
pub type Completion<T> = Shared<BoxFuture<'static, Outcome<T>>>;

/// One run of a task, owned by the controller that started it.
pub struct TaskWrapper<T>
where
    T: Clone + Send + Sync + 'static,
{
    id: u64,
    token: CancellationToken,
    cancelled: AtomicBool,
    action: Mutex<Option<CancelAction>>,
    immediate: Option<Outcome<T>>,
    completion: Completion<T>,
}

impl<T> TaskWrapper<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Invokes the creation function and wraps what it returned.
    ///
    /// Deferred work is spawned right away, so this must be called within a Tokio runtime.
    pub fn start<I, K>(id: u64, task: &K, inputs: &I, token: CancellationToken) -> Self
    where
        K: Task<I, T> + ?Sized,
    {
        let injection = Injection::new(token.clone());
        let work = catch_unwind(AssertUnwindSafe(|| task.create(inputs, injection)))
            .unwrap_or_else(|payload| Work::failed(TaskError::from_panic(payload)));

        match work {
            Work::Immediate(res) => Self::settled(id, token, res.into()),
            Work::Deferred(fut) => Self::spawn(id, token, fut, None),
            Work::Cancellable(handle) => {
                let (fut, action) = handle.into_parts();
                Self::spawn(id, token, fut, action)
            }
        }
    }

    fn settled(id: u64, token: CancellationToken, outcome: Outcome<T>) -> Self {
        let completion = futures::future::ready(outcome.clone()).boxed().shared();
        Self {
            id,
            token,
            cancelled: AtomicBool::new(false),
            action: Mutex::new(None),
            immediate: Some(outcome),
            completion,
        }
    }

    fn spawn(
        id: u64,
        token: CancellationToken,
        fut: WorkFuture<T>,
        action: Option<CancelAction>,
    ) -> Self {
        let join = tokio::spawn(fut);
        let guard = token.clone();

        let completion = async move {
            tokio::select! {
                biased;
                _ = guard.cancelled() => Outcome::Cancelled,
                joined = join => match joined {
                    _ if guard.is_cancelled() => Outcome::Cancelled,
                    Ok(res) => res.into(),
                    Err(e) if e.is_panic() => Outcome::Failed(TaskError::from_panic(e.into_panic())),
                    // runtime is shutting down underneath us
                    Err(_) => Outcome::Cancelled,
                },
            }
        }
        .boxed()
        .shared();

        Self {
            id,
            token,
            cancelled: AtomicBool::new(false),
            action: Mutex::new(action),
            immediate: None,
            completion,
        }
    }

    /// Generation this run was started for.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Outcome of work that settled synchronously, if any.
    pub fn outcome_now(&self) -> Option<Outcome<T>> {
        self.immediate.clone()
    }

    /// A clone of the completion signal.
    pub fn completion(&self) -> Completion<T> {
        self.completion.clone()
    }

    /// True once `cancel` was called (or the parent token was cancelled).
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire) || self.token.is_cancelled()
    }

    /// Cancels the run. Returns `false` if it was already cancelled.
    ///
    /// Flips the cancelled flag, cancels the injected token (which also forces the
    /// completion signal to `Outcome::Cancelled` if still unsettled), then runs the
    /// caller-supplied cancel action, once.
    pub fn cancel(&self) -> bool {
        if self.cancelled.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.token.cancel();

        let action = self.action.lock().take();
        if let Some(action) = action {
            action();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::{TaskFn, TaskHandle};
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[tokio::test]
    async fn immediate_value_settles_without_suspending() {
        let task = TaskFn::new("ids", |ids: &Vec<u32>, _inj: Injection| {
            Ok::<_, TaskError>(ids.iter().map(|id| id * 10).collect::<Vec<_>>())
        });
        let w = TaskWrapper::start(1, &task, &vec![1, 2, 3], CancellationToken::new());

        assert_eq!(w.outcome_now(), Some(Outcome::Succeeded(vec![10, 20, 30])));
        assert_eq!(w.completion().await, Outcome::Succeeded(vec![10, 20, 30]));
    }

    #[tokio::test]
    async fn synchronous_failure_and_panic_become_failed_outcomes() {
        let failing = TaskFn::new("fail", |_: &u32, _inj: Injection| {
            Err::<u32, _>(TaskError::fail("BigNumber"))
        });
        let w = TaskWrapper::start(1, &failing, &100, CancellationToken::new());
        assert_eq!(
            w.outcome_now(),
            Some(Outcome::Failed(TaskError::fail("BigNumber")))
        );

        let panicking = TaskFn::new("panic", |_: &u32, _inj: Injection| -> Work<u32> {
            panic!("exploded during create")
        });
        let w = TaskWrapper::start(2, &panicking, &1, CancellationToken::new());
        assert_eq!(
            w.outcome_now(),
            Some(Outcome::Failed(TaskError::Panicked {
                message: "exploded during create".into()
            }))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn deferred_work_settles_through_completion() {
        let task = TaskFn::new("slow", |n: &u32, _inj: Injection| {
            let n = *n;
            Work::deferred(async move {
                tokio::time::sleep(Duration::from_millis(1000)).await;
                Ok(n + 1)
            })
        });
        let w = TaskWrapper::start(1, &task, &41, CancellationToken::new());

        assert!(w.outcome_now().is_none());
        assert_eq!(w.completion().await, Outcome::Succeeded(42));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_forces_completion_and_runs_action_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicBool::new(false));

        let task = {
            let calls = calls.clone();
            let finished = finished.clone();
            TaskFn::new("cancellable", move |_: &(), _inj: Injection| {
                let calls = calls.clone();
                let finished = finished.clone();
                TaskHandle::with_cancel(
                    async move {
                        tokio::time::sleep(Duration::from_millis(1000)).await;
                        finished.store(true, Ordering::SeqCst);
                        Ok::<_, TaskError>("late")
                    },
                    move || {
                        calls.fetch_add(1, Ordering::SeqCst);
                    },
                )
            })
        };
        let w = TaskWrapper::start(7, &task, &(), CancellationToken::new());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(w.cancel());
        assert!(!w.cancel());
        assert!(w.is_cancelled());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Observers are released at once, long before the work would settle.
        assert_eq!(w.completion().await, Outcome::Cancelled);

        // The work itself is cooperative and still finishes, unobserved.
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(finished.load(Ordering::SeqCst));
        assert_eq!(w.completion().await, Outcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn injected_token_observes_cancellation() {
        let observed = Arc::new(AtomicBool::new(false));
        let task = {
            let observed = observed.clone();
            TaskFn::new("watcher", move |_: &(), inj: Injection| {
                let observed = observed.clone();
                Work::deferred(async move {
                    inj.abort.cancelled().await;
                    observed.store(true, Ordering::SeqCst);
                    Err::<(), _>(TaskError::Aborted)
                })
            })
        };
        let w = TaskWrapper::start(1, &task, &(), CancellationToken::new());

        w.cancel();
        assert_eq!(w.completion().await, Outcome::Cancelled);
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(observed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn panic_inside_future_is_reported() {
        let task = TaskFn::new("boom", |_: &(), _inj: Injection| {
            Work::<u8>::deferred(async {
                if true {
                    panic!("inside future");
                }
                Ok(0)
            })
        });
        let w = TaskWrapper::start(1, &task, &(), CancellationToken::new());

        assert_eq!(
            w.completion().await,
            Outcome::Failed(TaskError::Panicked {
                message: "inside future".into()
            })
        );
    }

    #[tokio::test]
    async fn parent_token_cancels_the_run() {
        let parent = CancellationToken::new();
        let task = TaskFn::new("pending", |_: &(), _inj: Injection| {
            Work::<u8>::deferred(futures::future::pending())
        });
        let w = TaskWrapper::start(1, &task, &(), parent.child_token());

        parent.cancel();
        assert!(w.is_cancelled());
        assert_eq!(w.completion().await, Outcome::Cancelled);
    }
}
