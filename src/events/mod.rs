//! Controller events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publisher**: the controller (triggers, run lifecycle, teardown).
//! - **Consumers**: the subscriber listener (fans out to `SubscriberSet`) and raw
//!   receivers from `Controller::events()`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
