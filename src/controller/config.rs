//! # Controller configuration.
//!
//! [`ControllerConfig`] holds the static settings of one controller. Callbacks live in
//! the mutable self-record instead (see [`Callbacks`](crate::Callbacks)), since they may
//! change between runs.
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1

use std::borrow::Cow;

/// How an acknowledged cancellation surfaces.
///
/// Exactly one policy applies per controller; the two are never mixed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CancelPolicy {
    /// Cancellation is its own outcome: `result`/`error` are left as they were,
    /// `status` becomes `Cancelled` and `on_cancel(inputs)` runs if set (default).
    #[default]
    Callback,

    /// Cancellation is folded into the error channel as
    /// [`TaskError::Aborted`](crate::TaskError::Aborted) and reported through `on_error`.
    AbortError,
}

/// Static configuration of a controller.
///
/// ## Field semantics
/// - `name`: label attached to every event
/// - `on_demand`: suppress automatic runs on activation and on input change
/// - `cancel_policy`: see [`CancelPolicy`]
/// - `bus_capacity`: event ring buffer size (min 1)
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Controller name used in events and logs.
    pub name: Cow<'static, str>,

    /// When `true`, only an explicit `execute()` starts a run.
    pub on_demand: bool,

    /// Cancellation reporting policy.
    pub cancel_policy: CancelPolicy,

    /// Capacity of the event bus broadcast channel.
    ///
    /// Receivers that lag behind more than `bus_capacity` events skip the oldest ones.
    pub bus_capacity: usize,
}

impl ControllerConfig {
    /// Configuration of an on-demand controller, otherwise default.
    pub fn on_demand() -> Self {
        Self {
            on_demand: true,
            ..Self::default()
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for ControllerConfig {
    /// Default configuration:
    ///
    /// - `name = "taskcell"`
    /// - `on_demand = false`
    /// - `cancel_policy = CancelPolicy::Callback`
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("taskcell"),
            on_demand: false,
            cancel_policy: CancelPolicy::default(),
            bus_capacity: 256,
        }
    }
}
