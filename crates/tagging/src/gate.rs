//! Flag gating.

use limn_primitives::Document;
use limn_registry::{FlagKey, FlagsHandle};

/// True iff every flag in both lists resolves to enabled for `doc`.
///
/// Empty lists are vacuously true. Per-language flags resolve against the
/// document's language; a document without one falls back to the flag's
/// global value or default. Evaluation short-circuits on the first disabled
/// flag and takes a single read lock, so calling this on every request is
/// fine.
pub fn all_enabled(
	flags: &FlagsHandle,
	doc: &Document,
	global: &[FlagKey],
	per_language: &[FlagKey],
) -> bool {
	let language = doc.language();
	flags.with(|store| {
		global
			.iter()
			.chain(per_language)
			.all(|flag| store.resolve(flag, language))
	})
}
