//! # taskcell
//!
//! **taskcell** manages the lifecycle of a single asynchronous unit of work bound to a
//! changing set of inputs. It exposes pending/result/error state, cancels superseded runs,
//! reports cancellation distinctly from failure and re-runs whenever inputs change or a
//! run is explicitly requested.
//!
//! It is meant to sit underneath a UI layer (or any other collaborator that re-evaluates
//! on change): the collaborator notifies the controller, the controller owns the task.
//!
//! ## Architecture
//! ```text
//!   collaborator (UI)
//!     │ activate / set_inputs / execute / cancel / teardown
//!     ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  Controller                                                │
//! │  - self-record (task + callbacks, swappable in flight)     │
//! │  - generation counter (trigger identity)                   │
//! │  - Snapshot { result, error, is_pending, status } (watch)  │
//! │  - root CancellationToken                                  │
//! └──────┬────────────────────────────────────────────┬────────┘
//!        │ one active at a time                       │ publish(Event)
//!        ▼                                            ▼
//! ┌──────────────────────────────┐             ┌────────────┐
//! │ TaskWrapper                  │             │    Bus     │──► SubscriberSet ──► LogWriter, ...
//! │ - Work: Immediate / Deferred │             └────────────┘
//! │   / Cancellable(TaskHandle)  │
//! │ - Completion (shared future) │
//! │ - cancel(): flag, token,     │
//! │   cancel action, forced      │
//! │   Outcome::Cancelled         │
//! └──────────────────────────────┘
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types                               |
//! |-------------------|----------------------------------------------------------|-----------------------------------------|
//! | **Tasks**         | Creation functions and the shapes they may return.       | [`Task`], [`TaskFn`], [`Work`], [`TaskHandle`] |
//! | **Runs**          | One run, its completion signal and cancellation.         | [`TaskWrapper`], [`Outcome`], [`Injection`] |
//! | **Control**       | Triggers, supersession, observable state, callbacks.     | [`Controller`], [`Handle`], [`Snapshot`] |
//! | **Configuration** | On-demand mode, cancellation policy, event capacity.     | [`ControllerConfig`], [`CancelPolicy`]  |
//! | **Errors**        | Typed task errors, including the `AbortError` marker.    | [`TaskError`]                           |
//! | **Events**        | Lifecycle events and pluggable subscribers.              | [`Event`], [`Subscribe`]                |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a subscriber that emits `tracing` records.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use taskcell::{Injection, TaskError, TaskFn, TaskRef, Work};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let search: TaskRef<String, Vec<String>> =
//!         TaskFn::arc("search", |query: &String, inj: Injection| {
//!             let query = query.clone();
//!             Work::deferred(async move {
//!                 tokio::select! {
//!                     _ = inj.abort.cancelled() => Err(TaskError::Aborted),
//!                     _ = tokio::time::sleep(Duration::from_millis(10)) => {
//!                         Ok(vec![format!("{query}-1"), format!("{query}-2")])
//!                     }
//!                 }
//!             })
//!         });
//!
//!     let ctrl = taskcell::create(search, "ru".to_string(), Default::default(), Default::default());
//!     ctrl.set_inputs("rust".to_string()); // supersedes the "ru" run
//!
//!     let snap = ctrl.handle().settled().await;
//!     assert_eq!(snap.result, Some(vec!["rust-1".to_string(), "rust-2".to_string()]));
//! }
//! ```

mod controller;
mod error;
mod events;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use controller::{
    Callbacks, CancelPolicy, Controller, ControllerBuilder, ControllerConfig, Handle, OnCancel,
    OnError, OnSuccess, Snapshot, Status,
};
pub use error::TaskError;
pub use events::{Bus, Event, EventKind};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{
    CancelAction, Completion, Injection, Outcome, Task, TaskFn, TaskHandle, TaskRef, TaskWrapper,
    Work, WorkFuture,
};

// Optional: a built-in `tracing` subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

/// Builds a controller with `config` and `callbacks` and activates it right away.
///
/// Unless `config.on_demand` is set, this starts the first run immediately. Must be
/// called within a Tokio runtime.
pub fn create<I, T>(
    task: TaskRef<I, T>,
    inputs: I,
    config: ControllerConfig,
    callbacks: Callbacks<I, T>,
) -> Controller<I, T>
where
    I: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    let ctrl = Controller::builder(task, inputs)
        .config(config)
        .callbacks(callbacks)
        .build();
    ctrl.activate();
    ctrl
}

/// Like [`create`], but forces on-demand mode: nothing runs until `execute()`.
pub fn create_on_demand<I, T>(
    task: TaskRef<I, T>,
    inputs: I,
    config: ControllerConfig,
    callbacks: Callbacks<I, T>,
) -> Controller<I, T>
where
    I: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    create(
        task,
        inputs,
        ControllerConfig {
            on_demand: true,
            ..config
        },
        callbacks,
    )
}
