//! Annotation output data model.
//!
//! Producers publish their results as an [`AnnotationBatch`]: a revisioned
//! set of byte-range spans, each carrying a feature-defined tag payload.
//! Consumers treat a batch as an immutable snapshot; a producer replaces the
//! whole batch when it finishes a recomputation.

/// A byte range in document text, end-exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
	/// Start byte offset (inclusive).
	pub start: usize,
	/// End byte offset (exclusive).
	pub end: usize,
}

impl TextRange {
	/// Creates a range from start to end.
	pub fn new(start: usize, end: usize) -> Self {
		debug_assert!(start <= end, "range start must not exceed end");
		Self { start, end }
	}

	/// Returns the length of the range in bytes.
	#[inline]
	pub fn len(&self) -> usize {
		self.end - self.start
	}

	/// Returns true if the range is zero-width.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Returns true if `offset` falls inside the range.
	#[inline]
	pub fn contains(&self, offset: usize) -> bool {
		self.start <= offset && offset < self.end
	}
}

/// Bound alias for per-feature tag payloads carried on annotation spans.
///
/// Any cloneable, thread-safe type qualifies; features typically use a small
/// enum or a style handle.
pub trait AnnotationTag: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> AnnotationTag for T {}

/// One annotated span: a byte range plus the feature's tag payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationSpan<T> {
	/// Where the annotation applies.
	pub range: TextRange,
	/// Feature-defined payload (highlight kind, marker style, ...).
	pub tag: T,
}

impl<T> AnnotationSpan<T> {
	pub fn new(range: TextRange, tag: T) -> Self {
		Self { range, tag }
	}
}

/// A revisioned batch of annotation spans for one document or view.
///
/// `revision` is producer-local and monotonic; consumers use it to discard
/// stale snapshots when updates race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationBatch<T> {
	/// Producer revision this batch was computed at.
	pub revision: u64,
	/// Spans in document order (sorted by start offset).
	pub spans: Vec<AnnotationSpan<T>>,
}

impl<T> AnnotationBatch<T> {
	/// Creates a batch at the given revision.
	pub fn new(revision: u64, spans: Vec<AnnotationSpan<T>>) -> Self {
		Self { revision, spans }
	}

	/// Creates an empty batch at revision zero (the pre-first-compute state).
	pub fn empty() -> Self {
		Self {
			revision: 0,
			spans: Vec::new(),
		}
	}

	/// Returns the number of spans.
	pub fn len(&self) -> usize {
		self.spans.len()
	}

	/// Returns true if the batch holds no spans.
	pub fn is_empty(&self) -> bool {
		self.spans.is_empty()
	}
}

impl<T> Default for AnnotationBatch<T> {
	fn default() -> Self {
		Self::empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_range_contains_is_end_exclusive() {
		let range = TextRange::new(4, 10);
		assert!(range.contains(4));
		assert!(range.contains(9));
		assert!(!range.contains(10));
		assert_eq!(range.len(), 6);
	}

	#[test]
	fn test_empty_batch_starts_at_revision_zero() {
		let batch: AnnotationBatch<u8> = AnnotationBatch::empty();
		assert_eq!(batch.revision, 0);
		assert!(batch.is_empty());
	}
}
