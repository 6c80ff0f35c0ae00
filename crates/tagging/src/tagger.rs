//! Consumer-facing handle.

use std::sync::Arc;

use limn_primitives::{AnnotationBatch, AnnotationTag};
use limn_worker::{DispatchKey, ForegroundDispatcher, OperationTracker};

use crate::delay::TaggerDelay;
use crate::producer::ProducerRef;

/// Short-lived handle wrapping a cached producer for one consumer.
///
/// Many taggers may wrap the same producer at once; a tagger owns none of
/// the producer's lifecycle and dropping it changes nothing in the cache.
/// Each tagger mints its own dispatch subscriber key, so its change
/// notifications coalesce with its own earlier ones and never with another
/// consumer's.
///
/// Assembly is pure composition: building a tagger starts no asynchronous
/// work. The producer alone schedules its recomputation.
pub struct Tagger<T: AnnotationTag> {
	producer: ProducerRef<T>,
	tracker: OperationTracker,
	dispatcher: ForegroundDispatcher,
	delay: TaggerDelay,
	subscriber: DispatchKey,
}

impl<T: AnnotationTag> Tagger<T> {
	pub(crate) fn new(
		producer: ProducerRef<T>,
		tracker: OperationTracker,
		dispatcher: ForegroundDispatcher,
		delay: TaggerDelay,
	) -> Self {
		Self {
			producer,
			tracker,
			dispatcher,
			delay,
			subscriber: DispatchKey::next(),
		}
	}

	pub fn producer(&self) -> &ProducerRef<T> {
		&self.producer
	}

	/// Latest batch the wrapped producer has published.
	pub fn current(&self) -> AnnotationBatch<T> {
		self.producer.current()
	}

	pub fn delay(&self) -> TaggerDelay {
		self.delay
	}

	/// The tracker producer-side background work registers with.
	pub fn tracker(&self) -> &OperationTracker {
		&self.tracker
	}

	pub fn subscriber(&self) -> DispatchKey {
		self.subscriber
	}

	/// Queues a change notification for the host thread.
	///
	/// Submissions within this tagger's delay window coalesce latest-wins;
	/// the window is anchored at the first undelivered submission, so a
	/// steady stream still delivers once per window.
	pub fn notify(&self, work: impl FnOnce() + Send + 'static) {
		self.dispatcher
			.submit(self.subscriber, self.delay.duration(), Box::new(work));
	}

	/// Drops this tagger's pending notification, if any.
	pub fn cancel_pending(&self) -> bool {
		self.dispatcher.cancel(self.subscriber)
	}
}

impl<T: AnnotationTag> Drop for Tagger<T> {
	fn drop(&mut self) {
		// A notification queued by a handle nobody holds any more has no
		// consumer; let it die with the handle.
		self.dispatcher.cancel(self.subscriber);
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicU32, Ordering};
	use std::time::{Duration, Instant};

	use limn_primitives::{AnnotationSpan, TextRange};

	use super::*;
	use crate::dispose::DisposeSignal;
	use crate::producer::AnnotationProducer;

	struct FixedProducer {
		batch: AnnotationBatch<u8>,
		signal: DisposeSignal,
	}

	impl AnnotationProducer<u8> for FixedProducer {
		fn name(&self) -> &str {
			"fixed"
		}

		fn current(&self) -> AnnotationBatch<u8> {
			self.batch.clone()
		}

		fn dispose_signal(&self) -> &DisposeSignal {
			&self.signal
		}
	}

	fn fixed_producer() -> ProducerRef<u8> {
		Arc::new(FixedProducer {
			batch: AnnotationBatch::new(1, vec![AnnotationSpan::new(TextRange::new(0, 4), 9)]),
			signal: DisposeSignal::new(),
		})
	}

	fn tagger(dispatcher: &ForegroundDispatcher) -> Tagger<u8> {
		Tagger::new(
			fixed_producer(),
			OperationTracker::new(),
			dispatcher.clone(),
			TaggerDelay::NearImmediate,
		)
	}

	#[test]
	fn test_current_reads_through_to_the_producer() {
		let tagger = tagger(&ForegroundDispatcher::new());
		let batch = tagger.current();
		assert_eq!(batch.revision, 1);
		assert_eq!(batch.len(), 1);
	}

	#[test]
	fn test_notifications_coalesce_per_tagger() {
		let dispatcher = ForegroundDispatcher::new();
		let a = tagger(&dispatcher);
		let b = tagger(&dispatcher);
		let hits = Arc::new(AtomicU32::new(0));

		for tagger in [&a, &b] {
			for _ in 0..3 {
				let hits = Arc::clone(&hits);
				tagger.notify(move || {
					hits.fetch_add(1, Ordering::SeqCst);
				});
			}
		}

		// Two taggers, three submissions each: one delivery per tagger.
		assert_eq!(dispatcher.pending(), 2);
		let due = Instant::now() + Duration::from_secs(1);
		assert_eq!(dispatcher.run_due(due), 2);
		assert_eq!(hits.load(Ordering::SeqCst), 2);
	}

	#[test]
	fn test_fan_out_taggers_share_one_producer() {
		let dispatcher = ForegroundDispatcher::new();
		let producer = fixed_producer();
		let a = Tagger::new(
			Arc::clone(&producer),
			OperationTracker::new(),
			dispatcher.clone(),
			TaggerDelay::default(),
		);
		let b = Tagger::new(
			Arc::clone(&producer),
			OperationTracker::new(),
			dispatcher.clone(),
			TaggerDelay::default(),
		);

		assert!(Arc::ptr_eq(a.producer(), b.producer()));
		assert_ne!(a.subscriber(), b.subscriber());

		// Dropping a tagger leaves the producer alive and undisposed.
		drop(a);
		assert!(!producer.is_disposed());
	}

	#[test]
	fn test_drop_cancels_the_pending_notification() {
		let dispatcher = ForegroundDispatcher::new();
		let tagger = tagger(&dispatcher);
		tagger.notify(|| {});
		assert_eq!(dispatcher.pending(), 1);

		drop(tagger);
		assert!(dispatcher.is_empty());
	}
}
