//! Identifier types for host entities.
//!
//! Documents and views are identified by u64 newtypes. Equality of a
//! [`DocumentId`] or [`ViewId`] stands in for reference identity of the
//! underlying host object: the host never reuses an ID while the entity
//! is alive.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for generating unique document IDs.
static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

impl DocumentId {
	/// Generates a new unique document ID.
	pub fn next() -> Self {
		Self(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed))
	}
}

/// Unique identifier for a view (one on-screen presentation of a document).
///
/// Views are minted by the host's view manager; this crate only carries the
/// identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub u64);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_document_ids_are_unique() {
		let a = DocumentId::next();
		let b = DocumentId::next();
		assert_ne!(a, b);
	}
}
