//! Cache identity.

use limn_primitives::{DocumentId, ViewId};

/// Composite identity a producer is cached under.
///
/// Equality is by id. Ids are the host's stable identity for live views and
/// documents, so a key is only meaningful while its document is open; the
/// document-close sweep reclaims every entry keyed to a closing document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceKey {
	/// Present for view-scoped features, absent for document-scoped ones.
	pub view: Option<ViewId>,
	pub doc: DocumentId,
}

impl ResourceKey {
	pub fn new(view: Option<ViewId>, doc: DocumentId) -> Self {
		Self { view, doc }
	}

	pub fn view_scoped(view: ViewId, doc: DocumentId) -> Self {
		Self::new(Some(view), doc)
	}

	pub fn document_scoped(doc: DocumentId) -> Self {
		Self::new(None, doc)
	}
}
