//! In-flight operation accounting.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;
use tracing::trace;

#[derive(Default)]
struct TrackerInner {
	active: AtomicUsize,
	idle: Notify,
}

/// Counts operations in flight and wakes waiters when the count hits zero.
///
/// Every background step registers itself with [`begin`](Self::begin) and
/// holds the returned guard for the operation's lifetime. `wait_idle` gives
/// tests and shutdown paths a deterministic join point without polling.
#[derive(Clone, Default)]
pub struct OperationTracker {
	inner: Arc<TrackerInner>,
}

impl OperationTracker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers one in-flight operation.
	pub fn begin(&self, label: &'static str) -> OperationGuard {
		self.inner.active.fetch_add(1, Ordering::AcqRel);
		trace!(label, "ops.begin");
		OperationGuard {
			inner: Arc::clone(&self.inner),
			label,
		}
	}

	/// Number of operations currently in flight.
	pub fn active(&self) -> usize {
		self.inner.active.load(Ordering::Acquire)
	}

	pub fn is_idle(&self) -> bool {
		self.active() == 0
	}

	/// Resolves once no operation is in flight.
	///
	/// Returns immediately when already idle. New operations begun after
	/// the count reaches zero do not retroactively fail the wait.
	pub async fn wait_idle(&self) {
		loop {
			// The future must exist before the idle check so a wakeup
			// between check and await is not lost.
			let notified = self.inner.idle.notified();
			if self.is_idle() {
				return;
			}
			notified.await;
		}
	}
}

/// Guard for one tracked operation. Dropping it ends the operation.
pub struct OperationGuard {
	inner: Arc<TrackerInner>,
	label: &'static str,
}

impl Drop for OperationGuard {
	fn drop(&mut self) {
		let prev = self.inner.active.fetch_sub(1, Ordering::AcqRel);
		trace!(label = self.label, "ops.end");
		if prev == 1 {
			self.inner.idle.notify_waiters();
		}
	}
}
