//! Host-side scheduling primitives.
//!
//! Two pieces that background annotation work hangs off:
//!
//! - [`OperationTracker`] counts in-flight operations and lets callers
//!   (mostly tests and shutdown paths) await quiescence.
//! - [`ForegroundDispatcher`] queues debounced, coalescing work for the
//!   host thread. It never spawns; the host drains it from its own loop.

pub mod dispatch;
pub mod tracker;

pub use dispatch::{DispatchKey, DispatchWork, ForegroundDispatcher};
pub use tracker::{OperationGuard, OperationTracker};
