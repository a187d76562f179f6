//! # Execution controller.
//!
//! A [`Controller`] owns at most one active [`TaskWrapper`](crate::TaskWrapper) and turns
//! triggers into runs:
//!
//! ```text
//! collaborator                     Controller                          TaskWrapper
//! ────────────                     ──────────                          ───────────
//! activate() / set_inputs()  ──►  generation += 1
//! execute()                       cancel previous wrapper  ─────────►  cancel()
//!                                 task.create(inputs, injection) ───►  start()
//!                                   ├─ immediate → settle now
//!                                   └─ deferred  → Pending, driver awaits completion
//!                                                    │
//!                                 settle(id, outcome) ◄────────────────┘
//!                                   ├─ id != generation → dropped (stale)
//!                                   └─ update Snapshot, fire one callback
//! teardown() / drop          ──►  cancel active, no further transitions
//! ```
//!
//! ## Invariants
//! - At most one wrapper is active; starting a run cancels the previous one first.
//! - At most one success/error/cancel notification per started run, and only for the
//!   run that was current when it settled.
//! - On-demand controllers never run before `execute()`, and input changes never
//!   trigger them.

mod builder;
mod callbacks;
mod config;
mod core;
mod state;

pub use builder::ControllerBuilder;
pub use callbacks::{Callbacks, OnCancel, OnError, OnSuccess};
pub use config::{CancelPolicy, ControllerConfig};
pub use core::{Controller, Handle};
pub use state::{Snapshot, Status};
