//! Producer storage.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use limn_primitives::{AnnotationTag, DocumentId};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::key::ResourceKey;
use crate::producer::ProducerRef;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// One stored producer plus its removal credentials.
///
/// `instance` is minted when the entry is built and never reused, so a
/// disposal handler holding (key, instance) can only ever remove the entry
/// it was wired to. A later producer cached under the same key gets a fresh
/// instance and is untouchable by stale handlers.
pub struct CachedProducer<T: AnnotationTag> {
	pub producer: ProducerRef<T>,
	pub instance: u64,
}

impl<T: AnnotationTag> CachedProducer<T> {
	pub fn new(producer: ProducerRef<T>) -> Self {
		Self {
			producer,
			instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
		}
	}
}

impl<T: AnnotationTag> Clone for CachedProducer<T> {
	fn clone(&self) -> Self {
		Self {
			producer: Arc::clone(&self.producer),
			instance: self.instance,
		}
	}
}

/// Storage strategy for cached producers.
///
/// The default is [`KeyedProducerCache`]; a feature that keeps producer
/// state somewhere else (on the document itself, say) supplies its own.
///
/// `put` does not make check-then-set atomic; the orchestration above the
/// cache confirms absence and serializes creation, so an implementation is
/// only responsible for making each single call consistent.
pub trait ProducerCache<T: AnnotationTag>: Send + Sync {
	/// Non-blocking lookup. Never creates.
	fn try_get(&self, key: &ResourceKey) -> Option<CachedProducer<T>>;

	/// Stores an entry. The caller has already confirmed the key absent.
	fn put(&self, key: ResourceKey, entry: CachedProducer<T>);

	/// Removes the entry only if its instance matches. Absent keys and
	/// mismatched instances are no-ops. Returns whether anything was
	/// removed.
	fn remove(&self, key: &ResourceKey, instance: u64) -> bool;

	/// Removes and returns every entry keyed to `doc`, any view.
	fn drain_for_document(&self, doc: DocumentId) -> Vec<(ResourceKey, CachedProducer<T>)>;

	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// The provided cache: a keyed side table under a mutex.
pub struct KeyedProducerCache<T: AnnotationTag> {
	entries: Mutex<FxHashMap<ResourceKey, CachedProducer<T>>>,
}

impl<T: AnnotationTag> KeyedProducerCache<T> {
	pub fn new() -> Self {
		Self::default()
	}
}

impl<T: AnnotationTag> Default for KeyedProducerCache<T> {
	fn default() -> Self {
		Self {
			entries: Mutex::new(FxHashMap::default()),
		}
	}
}

impl<T: AnnotationTag> ProducerCache<T> for KeyedProducerCache<T> {
	fn try_get(&self, key: &ResourceKey) -> Option<CachedProducer<T>> {
		self.entries.lock().get(key).cloned()
	}

	fn put(&self, key: ResourceKey, entry: CachedProducer<T>) {
		self.entries.lock().insert(key, entry);
	}

	fn remove(&self, key: &ResourceKey, instance: u64) -> bool {
		let mut entries = self.entries.lock();
		match entries.get(key) {
			Some(entry) if entry.instance == instance => {
				entries.remove(key);
				true
			}
			_ => false,
		}
	}

	fn drain_for_document(&self, doc: DocumentId) -> Vec<(ResourceKey, CachedProducer<T>)> {
		let mut entries = self.entries.lock();
		let keys: Vec<ResourceKey> = entries
			.keys()
			.filter(|key| key.doc == doc)
			.copied()
			.collect();
		keys.into_iter()
			.filter_map(|key| entries.remove(&key).map(|entry| (key, entry)))
			.collect()
	}

	fn len(&self) -> usize {
		self.entries.lock().len()
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

	impl StubProducer {
		fn shared() -> ProducerRef<u8> {
			Arc::new(Self {
				signal: DisposeSignal::new(),
			})
		}
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

	#[test]
	fn test_put_then_try_get_returns_the_same_instance() {
		let cache = KeyedProducerCache::new();
		let key = ResourceKey::document_scoped(DocumentId(1));
		let entry = CachedProducer::new(StubProducer::shared());
		let instance = entry.instance;

		cache.put(key, entry);
		let hit = cache.try_get(&key).unwrap();
		assert_eq!(hit.instance, instance);
		assert_eq!(cache.len(), 1);
	}

	#[test]
	fn test_remove_requires_matching_instance() {
		let cache = KeyedProducerCache::new();
		let key = ResourceKey::document_scoped(DocumentId(1));
		let entry = CachedProducer::new(StubProducer::shared());
		let instance = entry.instance;
		cache.put(key, entry);

		assert!(!cache.remove(&key, instance + 1));
		assert_eq!(cache.len(), 1);
		assert!(cache.remove(&key, instance));
		assert!(cache.is_empty());

		// Removing again, or removing a key never stored, is a no-op.
		assert!(!cache.remove(&key, instance));
	}

	#[test]
	fn test_instances_are_unique_per_entry() {
		let a = CachedProducer::new(StubProducer::shared());
		let b = CachedProducer::new(StubProducer::shared());
		assert_ne!(a.instance, b.instance);
	}

	#[test]
	fn test_drain_for_document_takes_all_views_of_one_doc() {
		use limn_primitives::ViewId;

		let cache = KeyedProducerCache::new();
		let doc = DocumentId(7);
		let other = DocumentId(8);
		cache.put(
			ResourceKey::document_scoped(doc),
			CachedProducer::new(StubProducer::shared()),
		);
		cache.put(
			ResourceKey::view_scoped(ViewId(1), doc),
			CachedProducer::new(StubProducer::shared()),
		);
		cache.put(
			ResourceKey::document_scoped(other),
			CachedProducer::new(StubProducer::shared()),
		);

		let drained = cache.drain_for_document(doc);
		assert_eq!(drained.len(), 2);
		assert!(drained.iter().all(|(key, _)| key.doc == doc));
		assert_eq!(cache.len(), 1);
		assert!(cache.try_get(&ResourceKey::document_scoped(other)).is_some());
	}
}
