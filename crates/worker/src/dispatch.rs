//! Debounced work queue drained by the host thread.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::trace;

static NEXT_DISPATCH_KEY: AtomicU64 = AtomicU64::new(1);

/// Identity of one dispatch subscriber.
///
/// Each consumer of the dispatcher mints its own key once and reuses it, so
/// repeated submissions from the same consumer coalesce with each other and
/// never with anyone else's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DispatchKey(pub u64);

impl DispatchKey {
	pub fn next() -> Self {
		Self(NEXT_DISPATCH_KEY.fetch_add(1, Ordering::Relaxed))
	}
}

/// Work queued for the host thread.
pub type DispatchWork = Box<dyn FnOnce() + Send>;

struct PendingDispatch {
	work: DispatchWork,
	first_submitted_at: Instant,
	delay: Duration,
	coalesced: u64,
}

/// Debounced, coalescing queue of host-thread work.
///
/// The dispatcher never spawns anything. The host calls [`run_due`] from its
/// own loop and due work executes right there, on the caller's thread.
///
/// One entry is kept per [`DispatchKey`]. A submission for a key that is
/// already pending replaces the queued work but keeps the original window,
/// so a steady stream of submissions cannot push delivery out forever.
///
/// [`run_due`]: Self::run_due
#[derive(Clone, Default)]
pub struct ForegroundDispatcher {
	state: Arc<Mutex<HashMap<DispatchKey, PendingDispatch>>>,
}

impl ForegroundDispatcher {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues `work` to run once `delay` has elapsed.
	///
	/// If the key already has work pending, the new closure wins and the
	/// existing window (anchor and delay) is left untouched.
	pub fn submit(&self, key: DispatchKey, delay: Duration, work: DispatchWork) {
		let mut state = self.state.lock();
		match state.get_mut(&key) {
			Some(pending) => {
				pending.work = work;
				pending.coalesced += 1;
				trace!(key = key.0, folded = pending.coalesced, "dispatch.coalesce");
			}
			None => {
				state.insert(
					key,
					PendingDispatch {
						work,
						first_submitted_at: Instant::now(),
						delay,
						coalesced: 0,
					},
				);
				trace!(key = key.0, delay_ms = delay.as_millis() as u64, "dispatch.submit");
			}
		}
	}

	/// Runs every entry whose window has elapsed at `now`.
	///
	/// Work executes on the calling thread, outside the queue lock and in
	/// submission order, so a closure may submit again without deadlocking.
	/// Returns the number of entries run.
	pub fn run_due(&self, now: Instant) -> usize {
		let due = self.take(|pending| {
			now.saturating_duration_since(pending.first_submitted_at) >= pending.delay
		});
		self.run(due)
	}

	/// Runs every pending entry regardless of its window.
	pub fn run_all(&self) -> usize {
		let due = self.take(|_| true);
		self.run(due)
	}

	/// Drops a pending entry without running it.
	pub fn cancel(&self, key: DispatchKey) -> bool {
		let removed = self.state.lock().remove(&key).is_some();
		if removed {
			trace!(key = key.0, "dispatch.cancel");
		}
		removed
	}

	/// Number of entries waiting for their window.
	pub fn pending(&self) -> usize {
		self.state.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.state.lock().is_empty()
	}

	fn take(&self, select: impl Fn(&PendingDispatch) -> bool) -> Vec<(DispatchKey, PendingDispatch)> {
		let mut state = self.state.lock();
		let keys: Vec<DispatchKey> = state
			.iter()
			.filter(|(_, pending)| select(pending))
			.map(|(key, _)| *key)
			.collect();
		let mut due = Vec::with_capacity(keys.len());
		for key in keys {
			if let Some(pending) = state.remove(&key) {
				due.push((key, pending));
			}
		}
		due
	}

	fn run(&self, mut due: Vec<(DispatchKey, PendingDispatch)>) -> usize {
		if due.is_empty() {
			return 0;
		}
		due.sort_by_key(|(key, pending)| (pending.first_submitted_at, key.0));
		let count = due.len();
		trace!(count, "dispatch.run_due");
		for (_, pending) in due {
			(pending.work)();
		}
		count
	}
}
