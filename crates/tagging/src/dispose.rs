//! One-shot disposal signal.

use std::sync::Arc;

use parking_lot::Mutex;

type DisposeCallback = Box<dyn FnOnce() + Send>;

/// Outcome of [`DisposeSignal::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
	/// The callback is registered and will run exactly once, at first fire.
	Subscribed,
	/// The signal had already fired; the callback was not registered and
	/// will never run. The caller compensates.
	AlreadyFired,
}

#[derive(Default)]
struct SignalState {
	fired: bool,
	callbacks: Vec<DisposeCallback>,
}

/// One-shot, payload-free disposal notification.
///
/// A producer raises it exactly once, either itself (document closed, view
/// torn down) or forced from outside. Only the first [`fire`](Self::fire)
/// runs the registered callbacks; they execute after the internal lock is
/// released, so a callback may take cache or provider locks freely.
///
/// Cloning shares the signal.
#[derive(Clone, Default)]
pub struct DisposeSignal {
	state: Arc<Mutex<SignalState>>,
}

impl DisposeSignal {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_fired(&self) -> bool {
		self.state.lock().fired
	}

	/// Registers a one-shot callback for the first fire.
	#[must_use = "an AlreadyFired subscription never runs; the caller must compensate"]
	pub fn subscribe(&self, callback: impl FnOnce() + Send + 'static) -> Subscription {
		let mut state = self.state.lock();
		if state.fired {
			return Subscription::AlreadyFired;
		}
		state.callbacks.push(Box::new(callback));
		Subscription::Subscribed
	}

	/// Fires the signal. The first call drains and runs the callbacks;
	/// every later call is a no-op.
	pub fn fire(&self) {
		let callbacks = {
			let mut state = self.state.lock();
			if state.fired {
				return;
			}
			state.fired = true;
			std::mem::take(&mut state.callbacks)
		};
		for callback in callbacks {
			callback();
		}
	}
}
