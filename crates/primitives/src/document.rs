//! Light document model at the host boundary.
//!
//! The annotation layer only needs a document's identity, its language (for
//! per-language flag resolution), and a name for diagnostics. Content, undo
//! history, and syntax state live with the host.

use crate::ids::DocumentId;
use crate::language::LanguageId;

/// A document as seen by the annotation layer: identity plus metadata.
#[derive(Debug, Clone)]
pub struct Document {
	/// Unique identifier for this document.
	pub id: DocumentId,

	/// Display name (file name or scratch title), used in diagnostics only.
	name: String,

	/// Detected language, if any. Scratch documents may have none.
	language: Option<LanguageId>,
}

impl Document {
	/// Creates a document with a fresh ID.
	pub fn new(name: impl Into<String>, language: Option<LanguageId>) -> Self {
		Self {
			id: DocumentId::next(),
			name: name.into(),
			language,
		}
	}

	/// Returns the display name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the document's language, if one has been detected.
	pub fn language(&self) -> Option<LanguageId> {
		self.language
	}

	/// Updates the language after re-detection (e.g. a file rename).
	///
	/// Flag gates consult the language at request time, so a change takes
	/// effect on the next request without invalidating existing state.
	pub fn set_language(&mut self, language: Option<LanguageId>) {
		self.language = language;
	}
}
