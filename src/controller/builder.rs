use std::borrow::Cow;
use std::sync::Arc;

use crate::error::TaskError;
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::tasks::TaskRef;

use super::{
    callbacks::Callbacks,
    config::{CancelPolicy, ControllerConfig},
    core::{Controller, Inner, Record},
};

/// Builder for constructing a [`Controller`].
///
/// ## Example
/// ```rust
/// use taskcell::{Controller, TaskError, TaskFn, TaskRef};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let users: TaskRef<Vec<u32>, usize> =
///     TaskFn::arc("users", |ids: &Vec<u32>, _inj: taskcell::Injection| {
///         Ok::<_, TaskError>(ids.len())
///     });
///
/// let ctrl = Controller::builder(users, vec![1, 2, 3])
///     .name("users")
///     .on_success(|n: &usize, ids: &Vec<u32>| assert_eq!(*n, ids.len()))
///     .build();
/// ctrl.activate();
///
/// assert_eq!(ctrl.handle().result(), Some(3));
/// # }
/// ```
pub struct ControllerBuilder<I, T> {
    task: TaskRef<I, T>,
    inputs: I,
    config: ControllerConfig,
    callbacks: Callbacks<I, T>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl<I, T> ControllerBuilder<I, T>
where
    I: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Creates a builder with default configuration and no callbacks.
    pub fn new(task: TaskRef<I, T>, inputs: I) -> Self {
        Self {
            task,
            inputs,
            config: ControllerConfig::default(),
            callbacks: Callbacks::new(),
            subscribers: Vec::new(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the controller name used in events.
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Suppresses automatic runs; only `execute()` starts one.
    pub fn on_demand(mut self, on_demand: bool) -> Self {
        self.config.on_demand = on_demand;
        self
    }

    /// Selects how cancellation is reported.
    pub fn cancel_policy(mut self, policy: CancelPolicy) -> Self {
        self.config.cancel_policy = policy;
        self
    }

    /// Replaces all callbacks.
    pub fn callbacks(mut self, callbacks: Callbacks<I, T>) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Sets the success callback.
    pub fn on_success(mut self, f: impl Fn(&T, &I) + Send + Sync + 'static) -> Self {
        self.callbacks = self.callbacks.on_success(f);
        self
    }

    /// Sets the error callback.
    pub fn on_error(mut self, f: impl Fn(&TaskError, &I) + Send + Sync + 'static) -> Self {
        self.callbacks = self.callbacks.on_error(f);
        self
    }

    /// Sets the cancel callback.
    pub fn on_cancel(mut self, f: impl Fn(&I) + Send + Sync + 'static) -> Self {
        self.callbacks = self.callbacks.on_cancel(f);
        self
    }

    /// Sets event subscribers.
    ///
    /// Subscribers receive controller events through dedicated workers with bounded
    /// queues. With a non-empty list, [`build`](Self::build) must run within a Tokio
    /// runtime.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the controller. It stays idle until [`Controller::activate`] is called.
    pub fn build(self) -> Controller<I, T> {
        let record = Record {
            task: self.task,
            callbacks: self.callbacks,
        };
        let inner = Arc::new(Inner::new(self.config, record, self.inputs));

        if !self.subscribers.is_empty() {
            // Detached: ends once the bus closes together with `inner`.
            let _listener = SubscriberSet::new(self.subscribers).listen(inner.bus());
        }
        Controller { inner }
    }
}

impl<I, T> Controller<I, T>
where
    I: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Starts building a controller for `task` with initial `inputs`.
    pub fn builder(task: TaskRef<I, T>, inputs: I) -> ControllerBuilder<I, T> {
        ControllerBuilder::new(task, inputs)
    }
}
