//! Gated, cached producer lifecycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use limn_primitives::{AnnotationTag, Document, DocumentId, ViewId};
use limn_registry::{FlagKey, FlagsHandle, TAGGING_ENABLED};
use limn_worker::{ForegroundDispatcher, OperationTracker};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::cache::{CachedProducer, KeyedProducerCache, ProducerCache};
use crate::delay::TaggerDelay;
use crate::dispose::Subscription;
use crate::factory::ProducerFactory;
use crate::gate;
use crate::key::ResourceKey;
use crate::producer::ProducerRef;
use crate::tagger::Tagger;

/// Monotonic lifecycle totals, for diagnostics only.
#[derive(Default)]
struct Counters {
	created: AtomicU64,
	reused: AtomicU64,
	gated: AtomicU64,
	declined: AtomicU64,
	removed: AtomicU64,
}

impl Counters {
	fn bump(counter: &AtomicU64) {
		counter.fetch_add(1, Ordering::Relaxed);
	}
}

/// Point-in-time copy of a provider's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
	/// Producers constructed and stored.
	pub created: u64,
	/// Requests answered from the cache.
	pub reused: u64,
	/// Requests refused by the flag gate.
	pub gated: u64,
	/// Requests the factory declined.
	pub declined: u64,
	/// Entries evicted (disposal or sweep).
	pub removed: u64,
}

/// One feature's producer lifecycle: flag gate, identity cache, factory,
/// and tagger assembly.
///
/// At most one producer is live per [`ResourceKey`]: the fast hit path is
/// lock-free against creation, and the whole miss path (double-checked
/// lookup, gate, factory, store, disposal wiring) runs under a creation
/// mutex, so racing callers for a brand-new key block and then observe the
/// winner's entry. Because the factory runs inside that critical section it
/// must not call back into the same provider.
///
/// A stored producer stays cached until its disposal signal fires; the
/// provider subscribes a one-shot handler at store time that removes exactly
/// the entry it wired (key plus instance), so a second fire, or a fire from
/// a producer whose key has since been reused, removes nothing.
pub struct TaggerProvider<T: AnnotationTag> {
	feature: &'static str,
	flags: FlagsHandle,
	global_flags: Vec<FlagKey>,
	per_language_flags: Vec<FlagKey>,
	factory: Box<dyn ProducerFactory<T>>,
	cache: Arc<dyn ProducerCache<T>>,
	creation: Mutex<()>,
	tracker: OperationTracker,
	dispatcher: ForegroundDispatcher,
	delay: TaggerDelay,
	counters: Arc<Counters>,
}

impl<T: AnnotationTag> TaggerProvider<T> {
	pub fn new(
		feature: &'static str,
		flags: FlagsHandle,
		factory: impl ProducerFactory<T> + 'static,
		tracker: OperationTracker,
		dispatcher: ForegroundDispatcher,
	) -> Self {
		Self {
			feature,
			flags,
			global_flags: Vec::new(),
			per_language_flags: Vec::new(),
			factory: Box::new(factory),
			cache: Arc::new(KeyedProducerCache::new()),
			creation: Mutex::new(()),
			tracker,
			dispatcher,
			delay: TaggerDelay::default(),
			counters: Arc::new(Counters::default()),
		}
	}

	/// Flags that must all be enabled, regardless of document language.
	pub fn with_global_flags(mut self, flags: impl IntoIterator<Item = FlagKey>) -> Self {
		self.global_flags.extend(flags);
		self
	}

	/// Flags resolved against the document's language.
	pub fn with_per_language_flags(mut self, flags: impl IntoIterator<Item = FlagKey>) -> Self {
		self.per_language_flags.extend(flags);
		self
	}

	/// Notification debounce tier for taggers this provider assembles.
	pub fn with_delay(mut self, delay: TaggerDelay) -> Self {
		self.delay = delay;
		self
	}

	/// Replaces the keyed side table with a feature-supplied store.
	pub fn with_cache(mut self, cache: Arc<dyn ProducerCache<T>>) -> Self {
		self.cache = cache;
		self
	}

	pub fn feature(&self) -> &'static str {
		self.feature
	}

	pub fn counters(&self) -> CounterSnapshot {
		CounterSnapshot {
			created: self.counters.created.load(Ordering::Relaxed),
			reused: self.counters.reused.load(Ordering::Relaxed),
			gated: self.counters.gated.load(Ordering::Relaxed),
			declined: self.counters.declined.load(Ordering::Relaxed),
			removed: self.counters.removed.load(Ordering::Relaxed),
		}
	}

	/// Number of producers currently cached.
	pub fn cached(&self) -> usize {
		self.cache.len()
	}

	/// The consumer entry point: master switch, then producer lifecycle,
	/// then tagger assembly.
	///
	/// `None` means the subsystem or feature is off for this document, or
	/// the factory declined. All of those look the same to the caller and
	/// none of them is an error.
	pub fn get_or_create_tagger(&self, view: Option<ViewId>, doc: &Document) -> Option<Tagger<T>> {
		if !self.flags.resolve(&TAGGING_ENABLED, doc.language()) {
			trace!(feature = self.feature, doc = doc.id.0, "tagger.master_off");
			return None;
		}
		let producer = self.get_or_create_producer(view, doc)?;
		Some(self.assemble(producer))
	}

	/// Wraps a producer for one consumer. Pure composition; starts nothing.
	pub fn assemble(&self, producer: ProducerRef<T>) -> Tagger<T> {
		Tagger::new(
			producer,
			self.tracker.clone(),
			self.dispatcher.clone(),
			self.delay,
		)
	}

	/// Returns the cached producer for (view, doc), creating it on a miss
	/// when the gate passes and the factory applies.
	pub fn get_or_create_producer(
		&self,
		view: Option<ViewId>,
		doc: &Document,
	) -> Option<ProducerRef<T>> {
		let key = ResourceKey::new(view, doc.id);

		// Fast path: a live cached producer needs no lock at all.
		if let Some(producer) = self.lookup_live(&key) {
			return Some(producer);
		}

		let _creating = self.creation.lock();

		// Double-check: a racing creator may have stored while we waited.
		if let Some(producer) = self.lookup_live(&key) {
			return Some(producer);
		}

		if !gate::all_enabled(
			&self.flags,
			doc,
			&self.global_flags,
			&self.per_language_flags,
		) {
			Counters::bump(&self.counters.gated);
			trace!(feature = self.feature, doc = doc.id.0, "tagger.gated");
			return None;
		}

		let Some(producer) = self.factory.create(view, doc) else {
			Counters::bump(&self.counters.declined);
			debug!(feature = self.feature, doc = doc.id.0, "tagger.decline");
			return None;
		};
		if producer.is_disposed() {
			// Dead on arrival; indistinguishable from a decline for the
			// caller, and the next request retries.
			Counters::bump(&self.counters.declined);
			warn!(feature = self.feature, doc = doc.id.0, "tagger.disposed_on_create");
			return None;
		}

		let entry = CachedProducer::new(Arc::clone(&producer));
		let instance = entry.instance;
		self.cache.put(key, entry);

		let cache = Arc::clone(&self.cache);
		let counters = Arc::clone(&self.counters);
		let feature = self.feature;
		let outcome = producer.dispose_signal().subscribe(move || {
			if cache.remove(&key, instance) {
				Counters::bump(&counters.removed);
				trace!(feature, doc = key.doc.0, instance, "tagger.remove");
			}
		});
		if outcome == Subscription::AlreadyFired {
			// Disposed between the liveness check and the subscription;
			// the handler will never run, so undo the store ourselves.
			self.cache.remove(&key, instance);
			Counters::bump(&self.counters.declined);
			warn!(feature = self.feature, doc = doc.id.0, "tagger.disposed_on_create");
			return None;
		}

		Counters::bump(&self.counters.created);
		debug!(
			feature = self.feature,
			doc = doc.id.0,
			view = view.map(|v| v.0),
			instance,
			"tagger.create"
		);
		Some(producer)
	}

	/// Force-disposes and evicts every cached producer for a closing
	/// document, any view. Returns how many were disposed.
	pub fn dispose_for_document(&self, doc: DocumentId) -> usize {
		let drained = self.cache.drain_for_document(doc);
		let count = drained.len();
		for (key, entry) in drained {
			Counters::bump(&self.counters.removed);
			trace!(
				feature = self.feature,
				doc = key.doc.0,
				instance = entry.instance,
				"tagger.remove"
			);
			// The entry is already out of the cache, so the disposal
			// handler's keyed remove is a no-op; firing here only tells
			// the producer itself to stop.
			entry.producer.dispose_signal().fire();
		}
		if count > 0 {
			debug!(feature = self.feature, doc = doc.0, count, "tagger.sweep");
		}
		count
	}

	/// Cache hit that screens out stale entries.
	///
	/// A hit whose signal has fired but whose removal handler has not run
	/// yet must read as a miss; evict it by instance so a fresh producer
	/// stored meanwhile is left alone.
	fn lookup_live(&self, key: &ResourceKey) -> Option<ProducerRef<T>> {
		let entry = self.cache.try_get(key)?;
		if entry.producer.is_disposed() {
			if self.cache.remove(key, entry.instance) {
				Counters::bump(&self.counters.removed);
				trace!(
					feature = self.feature,
					doc = key.doc.0,
					instance = entry.instance,
					"tagger.remove"
				);
			}
			return None;
		}
		Counters::bump(&self.counters.reused);
		trace!(feature = self.feature, doc = key.doc.0, "tagger.reuse");
		Some(entry.producer)
	}
}

#[cfg(test)]
mod tests {
	use limn_primitives::AnnotationBatch;

	use super::*;
	use crate::dispose::DisposeSignal;
	use crate::producer::AnnotationProducer;

	struct StubProducer {
		signal: DisposeSignal,
	}

	impl AnnotationProducer<u8> for StubProducer {
		fn name(&self) -> &str {
			"stub"
		}

		fn current(&self) -> AnnotationBatch<u8> {
			AnnotationBatch::empty()
		}

		fn dispose_signal(&self) -> &DisposeSignal {
			&self.signal
		}
	}

	fn stub_factory(_: Option<ViewId>, _: &Document) -> Option<ProducerRef<u8>> {
		Some(Arc::new(StubProducer {
			signal: DisposeSignal::new(),
		}))
	}

	fn provider() -> TaggerProvider<u8> {
		TaggerProvider::new(
			"stub.feature",
			FlagsHandle::default(),
			stub_factory,
			OperationTracker::new(),
			ForegroundDispatcher::new(),
		)
	}

	#[test]
	fn test_counters_track_the_lifecycle() {
		let provider = provider();
		let doc = Document::new("a.rs", None);

		let first = provider.get_or_create_producer(None, &doc).unwrap();
		provider.get_or_create_producer(None, &doc).unwrap();
		first.dispose_signal().fire();
		provider.get_or_create_producer(None, &doc).unwrap();

		let counters = provider.counters();
		assert_eq!(counters.created, 2);
		assert_eq!(counters.reused, 1);
		assert_eq!(counters.removed, 1);
		assert_eq!(counters.gated, 0);
		assert_eq!(counters.declined, 0);
	}

	#[test]
	fn test_factory_product_already_disposed_is_a_decline() {
		let provider = TaggerProvider::new(
			"stub.feature",
			FlagsHandle::default(),
			|_: Option<ViewId>, _: &Document| {
				let signal = DisposeSignal::new();
				signal.fire();
				Some(Arc::new(StubProducer { signal }) as ProducerRef<u8>)
			},
			OperationTracker::new(),
			ForegroundDispatcher::new(),
		);
		let doc = Document::new("a.rs", None);

		assert!(provider.get_or_create_producer(None, &doc).is_none());
		assert_eq!(provider.cached(), 0);
		assert_eq!(provider.counters().declined, 1);

		// Not cached as a permanent failure; the next call retries.
		assert!(provider.get_or_create_producer(None, &doc).is_none());
		assert_eq!(provider.counters().declined, 2);
	}

	#[test]
	fn test_sweep_disposes_every_entry_for_the_document() {
		let provider = provider();
		let doc = Document::new("a.rs", None);
		let other = Document::new("b.rs", None);

		let by_doc = provider.get_or_create_producer(None, &doc).unwrap();
		let by_view = provider
			.get_or_create_producer(Some(ViewId(1)), &doc)
			.unwrap();
		provider.get_or_create_producer(None, &other).unwrap();
		assert_eq!(provider.cached(), 3);

		assert_eq!(provider.dispose_for_document(doc.id), 2);
		assert!(by_doc.is_disposed());
		assert!(by_view.is_disposed());
		assert_eq!(provider.cached(), 1);

		// Nothing left for that document.
		assert_eq!(provider.dispose_for_document(doc.id), 0);
	}
}
