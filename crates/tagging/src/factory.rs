//! Per-feature producer construction.

use limn_primitives::{AnnotationTag, Document, ViewId};

use crate::producer::ProducerRef;

/// Creation strategy supplied by each concrete feature.
///
/// `None` means the feature does not apply to this view/document
/// combination — a scratch buffer for a language-bound feature, a
/// document-scoped request to a view-only feature. That is distinct from
/// being gated off, which is decided before the factory is consulted.
///
/// A factory must be side-effect-free on decline (no partial registration),
/// and its products must be safely discardable: a constructed producer that
/// never gets stored is simply dropped.
pub trait ProducerFactory<T: AnnotationTag>: Send + Sync {
	fn create(&self, view: Option<ViewId>, doc: &Document) -> Option<ProducerRef<T>>;
}

/// Plain closures of the right shape are factories.
impl<T, F> ProducerFactory<T> for F
where
	T: AnnotationTag,
	F: Fn(Option<ViewId>, &Document) -> Option<ProducerRef<T>> + Send + Sync,
{
	fn create(&self, view: Option<ViewId>, doc: &Document) -> Option<ProducerRef<T>> {
		self(view, doc)
	}
}
