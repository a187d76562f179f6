//! Settlement callbacks.
//!
//! Callbacks receive the inputs the run was started with, not the controller's current
//! inputs. They are read from the self-record at settlement time, so replacing them
//! with [`Controller::set_callbacks`](crate::Controller::set_callbacks) affects runs that
//! are already in flight.

use std::fmt;
use std::sync::Arc;

use crate::error::TaskError;

/// Called with `(result, inputs)` when the active run succeeds.
pub type OnSuccess<I, T> = Arc<dyn Fn(&T, &I) + Send + Sync>;
/// Called with `(error, inputs)` when the active run fails.
pub type OnError<I> = Arc<dyn Fn(&TaskError, &I) + Send + Sync>;
/// Called with `inputs` when cancellation of the active run is acknowledged.
pub type OnCancel<I> = Arc<dyn Fn(&I) + Send + Sync>;

/// The set of settlement callbacks; every one is optional.
pub struct Callbacks<I, T> {
    pub(crate) on_success: Option<OnSuccess<I, T>>,
    pub(crate) on_error: Option<OnError<I>>,
    pub(crate) on_cancel: Option<OnCancel<I>>,
}

impl<I, T> Callbacks<I, T> {
    /// No callbacks.
    pub fn new() -> Self {
        Self {
            on_success: None,
            on_error: None,
            on_cancel: None,
        }
    }

    /// Sets the success callback.
    pub fn on_success(mut self, f: impl Fn(&T, &I) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(f));
        self
    }

    /// Sets the error callback.
    pub fn on_error(mut self, f: impl Fn(&TaskError, &I) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }

    /// Sets the cancel callback.
    pub fn on_cancel(mut self, f: impl Fn(&I) + Send + Sync + 'static) -> Self {
        self.on_cancel = Some(Arc::new(f));
        self
    }
}

impl<I, T> Default for Callbacks<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, T> Clone for Callbacks<I, T> {
    fn clone(&self) -> Self {
        Self {
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
            on_cancel: self.on_cancel.clone(),
        }
    }
}

impl<I, T> fmt::Debug for Callbacks<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_cancel", &self.on_cancel.is_some())
            .finish()
    }
}
