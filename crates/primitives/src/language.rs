//! Language identity.

/// Unique identifier for a language, assigned densely by the host's
/// language loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LanguageId(pub u32);

impl LanguageId {
	#[inline]
	pub fn idx(self) -> usize {
		self.0 as usize
	}
}
