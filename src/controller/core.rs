use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};
use crate::tasks::{Completion, Outcome, TaskRef, TaskWrapper};

use super::{
    callbacks::Callbacks,
    config::{CancelPolicy, ControllerConfig},
    state::{Snapshot, Status},
};

/// Mutable self-record: the latest creation function and callbacks.
///
/// Replaced synchronously by the collaborator and read at settlement time, so an
/// in-flight run always reports through the newest callbacks.
pub(super) struct Record<I, T> {
    pub task: TaskRef<I, T>,
    pub callbacks: Callbacks<I, T>,
}

/// Everything the controller mutates, behind one lock.
///
/// The lock is never held while user code (creation function, callbacks, cancel
/// actions) runs.
struct Slot<I, T>
where
    T: Clone + Send + Sync + 'static,
{
    record: Record<I, T>,
    inputs: I,
    /// Trigger identity; the run with `id == generation` is the only one allowed to settle.
    generation: u64,
    active: Option<Arc<TaskWrapper<T>>>,
    latest: Option<Completion<T>>,
    activated: bool,
    torn_down: bool,
}

pub(super) struct Inner<I, T>
where
    T: Clone + Send + Sync + 'static,
{
    config: ControllerConfig,
    name: Arc<str>,
    slot: Mutex<Slot<I, T>>,
    state: watch::Sender<Snapshot<T>>,
    root: CancellationToken,
    bus: Bus,
}

impl<I, T> Inner<I, T>
where
    I: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub(super) fn new(config: ControllerConfig, record: Record<I, T>, inputs: I) -> Self {
        let bus = Bus::new(config.bus_capacity_clamped());
        let name: Arc<str> = Arc::from(config.name.as_ref());
        let (state, _rx) = watch::channel(Snapshot::idle());

        Self {
            config,
            name,
            slot: Mutex::new(Slot {
                record,
                inputs,
                generation: 0,
                active: None,
                latest: None,
                activated: false,
                torn_down: false,
            }),
            state,
            root: CancellationToken::new(),
            bus,
        }
    }

    pub(super) fn bus(&self) -> &Bus {
        &self.bus
    }

    fn event(&self, kind: EventKind) -> Event {
        Event::new(kind).with_controller(Arc::clone(&self.name))
    }

    fn publish(&self, ev: Event) {
        self.bus.publish(ev);
    }

    /// First activation. Starts a run unless on-demand; later calls are ignored.
    pub(super) fn activate(self: &Arc<Self>) {
        {
            let mut slot = self.slot.lock();
            if slot.torn_down || slot.activated {
                return;
            }
            slot.activated = true;
        }

        let mode = if self.config.on_demand { "on_demand" } else { "auto" };
        self.publish(self.event(EventKind::Activated).with_reason(mode));
        if !self.config.on_demand {
            self.run();
        }
    }

    /// Input-change notification; triggers a run only for active, non-on-demand controllers.
    pub(super) fn set_inputs(self: &Arc<Self>, inputs: I) {
        let trigger = {
            let mut slot = self.slot.lock();
            if slot.torn_down || slot.inputs == inputs {
                return;
            }
            slot.inputs = inputs;
            slot.activated && !self.config.on_demand
        };

        let effect = if trigger { "trigger" } else { "stored" };
        self.publish(self.event(EventKind::InputsChanged).with_reason(effect));
        if trigger {
            self.run();
        }
    }

    /// Explicit run request. Also counts as activation, so later input changes trigger.
    pub(super) fn execute(self: &Arc<Self>) {
        {
            let mut slot = self.slot.lock();
            if slot.torn_down {
                return;
            }
            slot.activated = true;
        }
        self.publish(self.event(EventKind::ExecuteRequested));
        self.run();
    }

    /// Cancels the active run; the acknowledgement arrives through its completion.
    pub(super) fn cancel(&self) {
        let active = {
            let slot = self.slot.lock();
            if slot.torn_down {
                return;
            }
            slot.active.clone()
        };

        let Some(wrapper) = active else { return };
        if wrapper.cancel() {
            self.publish(
                self.event(EventKind::CancelRequested)
                    .with_generation(wrapper.id()),
            );
        }
    }

    pub(super) fn teardown(&self) {
        let active = {
            let mut slot = self.slot.lock();
            if slot.torn_down {
                return;
            }
            slot.torn_down = true;
            slot.active.take()
        };

        if let Some(wrapper) = active {
            wrapper.cancel();
        }
        self.root.cancel();
        self.publish(self.event(EventKind::TornDown));
    }

    pub(super) fn set_task(&self, task: TaskRef<I, T>) {
        self.slot.lock().record.task = task;
    }

    pub(super) fn set_callbacks(&self, callbacks: Callbacks<I, T>) {
        self.slot.lock().record.callbacks = callbacks;
    }

    /// Starts a new run, cancelling the previous one first.
    fn run(self: &Arc<Self>) {
        let (id, task, inputs, prev) = {
            let mut slot = self.slot.lock();
            if slot.torn_down {
                return;
            }
            slot.generation += 1;
            (
                slot.generation,
                Arc::clone(&slot.record.task),
                slot.inputs.clone(),
                slot.active.take(),
            )
        };

        if let Some(prev) = prev {
            prev.cancel();
            self.publish(
                self.event(EventKind::TaskSuperseded)
                    .with_generation(prev.id()),
            );
        }

        self.publish(
            self.event(EventKind::TaskStarting)
                .with_task(task.name())
                .with_generation(id),
        );
        let wrapper = Arc::new(TaskWrapper::start(
            id,
            task.as_ref(),
            &inputs,
            self.root.child_token(),
        ));

        if let Some(outcome) = wrapper.outcome_now() {
            {
                let mut slot = self.slot.lock();
                if slot.generation == id {
                    slot.latest = Some(wrapper.completion());
                }
            }
            self.settle(id, outcome, &inputs);
            return;
        }

        {
            let mut slot = self.slot.lock();
            // A trigger fired from inside the creation function already replaced us.
            if slot.torn_down || slot.generation != id {
                drop(slot);
                wrapper.cancel();
                self.publish(self.event(EventKind::TaskSuperseded).with_generation(id));
                return;
            }
            slot.active = Some(Arc::clone(&wrapper));
            slot.latest = Some(wrapper.completion());
            self.state.send_modify(|s| s.begin());
        }

        let weak: Weak<Self> = Arc::downgrade(self);
        let completion = wrapper.completion();
        tokio::spawn(async move {
            let outcome = completion.await;
            if let Some(inner) = weak.upgrade() {
                inner.settle(id, outcome, &inputs);
            }
        });
    }

    /// Applies the settlement of run `id` if it is still the current run.
    fn settle(&self, id: u64, outcome: Outcome<T>, inputs: &I) {
        let (callbacks, outcome) = {
            let mut slot = self.slot.lock();
            if slot.torn_down || slot.generation != id {
                drop(slot);
                self.publish(
                    self.event(EventKind::SettlementDropped)
                        .with_generation(id)
                        .with_reason(outcome.as_label()),
                );
                return;
            }
            slot.active = None;

            let outcome = match (outcome, self.config.cancel_policy) {
                (Outcome::Cancelled, CancelPolicy::AbortError) => {
                    Outcome::Failed(TaskError::Aborted)
                }
                (outcome, _) => outcome,
            };
            match &outcome {
                Outcome::Succeeded(v) => self.state.send_modify(|s| s.resolve(v.clone())),
                Outcome::Failed(e) => self.state.send_modify(|s| s.reject(e.clone())),
                Outcome::Cancelled => self.state.send_modify(|s| s.acknowledge_cancel()),
            }
            (slot.record.callbacks.clone(), outcome)
        };

        match outcome {
            Outcome::Succeeded(value) => {
                self.publish(self.event(EventKind::TaskSucceeded).with_generation(id));
                if let Some(f) = callbacks.on_success {
                    self.notify("on_success", id, || f(&value, inputs));
                }
            }
            Outcome::Failed(error) => {
                self.publish(
                    self.event(EventKind::TaskFailed)
                        .with_generation(id)
                        .with_reason(error.to_string()),
                );
                if let Some(f) = callbacks.on_error {
                    self.notify("on_error", id, || f(&error, inputs));
                }
            }
            Outcome::Cancelled => {
                self.publish(self.event(EventKind::TaskCancelled).with_generation(id));
                if let Some(f) = callbacks.on_cancel {
                    self.notify("on_cancel", id, || f(inputs));
                }
            }
        }
    }

    /// Runs a user callback; a panic is logged and never reaches the trigger's caller.
    fn notify(&self, callback: &'static str, id: u64, f: impl FnOnce()) {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(f)) {
            let info = TaskError::from_panic(payload);
            tracing::warn!(
                controller = %self.name,
                callback,
                generation = id,
                %info,
                "callback panicked"
            );
        }
    }
}

/// Owner of one execution cell.
///
/// The controller is driven by an external collaborator (typically a UI component):
/// [`activate`](Controller::activate) on mount, [`set_inputs`](Controller::set_inputs) on
/// change, [`teardown`](Controller::teardown) (or drop) on unmount. Dropping the controller
/// tears it down; [`Handle`]s kept elsewhere then only observe the final snapshot.
///
/// All trigger operations spawn onto the ambient Tokio runtime when the work is deferred,
/// so they must be called from within one.
pub struct Controller<I, T>
where
    I: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub(super) inner: Arc<Inner<I, T>>,
}

impl<I, T> Controller<I, T>
where
    I: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Returns a cloneable handle for observing state and requesting runs.
    pub fn handle(&self) -> Handle<I, T> {
        Handle {
            inner: Arc::clone(&self.inner),
        }
    }

    /// First activation: starts the initial run unless the controller is on-demand.
    pub fn activate(&self) {
        self.inner.activate();
    }

    /// Notifies the controller of new inputs.
    ///
    /// Equal inputs (by `PartialEq`) are ignored. Different inputs start a new run,
    /// cancelling the current one, unless the controller is on-demand or not yet
    /// activated; in that case they are only stored for the next run.
    pub fn set_inputs(&self, inputs: I) {
        self.inner.set_inputs(inputs);
    }

    /// Replaces the creation function used by future runs.
    pub fn set_task(&self, task: TaskRef<I, T>) {
        self.inner.set_task(task);
    }

    /// Replaces the callbacks; in-flight runs report through the new ones.
    pub fn set_callbacks(&self, callbacks: Callbacks<I, T>) {
        self.inner.set_callbacks(callbacks);
    }

    /// Starts a new run with the current inputs, regardless of on-demand configuration.
    ///
    /// Counts as activation: a later [`activate`](Controller::activate) does nothing and
    /// input changes trigger runs from then on (unless on-demand).
    pub fn execute(&self) {
        self.inner.execute();
    }

    /// Cancels the active run, if any. Does not start a new one.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// Cancels the active run and stops all further transitions and callbacks.
    pub fn teardown(&self) {
        self.inner.teardown();
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.inner.state.borrow().clone()
    }

    /// Creates a raw receiver of this controller's events.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.inner.bus().subscribe()
    }

    /// Static configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }
}

impl<I, T> Drop for Controller<I, T>
where
    I: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.inner.teardown();
    }
}

/// Cloneable view of a controller: state accessors plus `execute` / `cancel`.
pub struct Handle<I, T>
where
    I: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    inner: Arc<Inner<I, T>>,
}

impl<I, T> Clone for Handle<I, T>
where
    I: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I, T> Handle<I, T>
where
    I: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Current snapshot.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.inner.state.borrow().clone()
    }

    /// Last successful value.
    pub fn result(&self) -> Option<T> {
        self.inner.state.borrow().result.clone()
    }

    /// Last failure.
    pub fn error(&self) -> Option<TaskError> {
        self.inner.state.borrow().error.clone()
    }

    /// True while a run is in flight.
    pub fn is_pending(&self) -> bool {
        self.inner.state.borrow().is_pending
    }

    /// Lifecycle position.
    pub fn status(&self) -> Status {
        self.inner.state.borrow().status
    }

    /// Starts a new run with the current inputs.
    pub fn execute(&self) {
        self.inner.execute();
    }

    /// Cancels the active run, if any.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// Subscribes to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.inner.state.subscribe()
    }

    /// Completion signal of the most recent run, if any run has started.
    ///
    /// Resolves to [`Outcome::Cancelled`] if that run is cancelled or superseded.
    pub fn completion(&self) -> Option<Completion<T>> {
        self.inner.slot.lock().latest.clone()
    }

    /// Current trigger generation (number of runs started so far).
    pub fn generation(&self) -> u64 {
        self.inner.slot.lock().generation
    }

    /// Waits until no run is pending (or the controller is torn down), then returns the
    /// snapshot.
    pub async fn settled(&self) -> Snapshot<T> {
        let mut rx = self.inner.state.subscribe();
        tokio::select! {
            _ = rx.wait_for(|s| !s.is_pending) => {}
            _ = self.inner.root.cancelled() => {}
        }
        self.snapshot()
    }
}
