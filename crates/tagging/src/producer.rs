//! Producer contract.

use std::sync::Arc;

use limn_primitives::{AnnotationBatch, AnnotationTag};

use crate::dispose::DisposeSignal;

/// A long-lived object computing annotations for one document, possibly
/// scoped to a single view.
///
/// How a producer recomputes is its own business; implementations schedule
/// their background work themselves and register it with the host's
/// operation tracker. The lifecycle layer only needs the latest published
/// batch and the one-shot disposal signal it keys eviction on.
pub trait AnnotationProducer<T: AnnotationTag>: Send + Sync {
	/// Stable feature name, for logs only.
	fn name(&self) -> &str;

	/// Latest batch this producer has published.
	fn current(&self) -> AnnotationBatch<T>;

	/// The producer's disposal signal. Must return the same signal for the
	/// producer's whole life.
	fn dispose_signal(&self) -> &DisposeSignal;

	fn is_disposed(&self) -> bool {
		self.dispose_signal().is_fired()
	}
}

/// Shared producer reference, as cached and as handed to taggers.
pub type ProducerRef<T> = Arc<dyn AnnotationProducer<T>>;
