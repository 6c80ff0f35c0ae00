//! Built-in flag definitions.

use crate::def::{FlagDef, FlagScope};
use crate::registry::FlagRegistry;

/// Master switch for the tagging subsystem. When off, no taggers are
/// assembled at all regardless of per-producer gates.
pub static TAGGING_ENABLED: FlagDef = FlagDef {
	name: "tagging.enabled",
	default: true,
	scope: FlagScope::Global,
};

/// Registers every built-in flag.
///
/// Duplicate registration only happens if a caller registered one of the
/// builtins by hand first, which is a programming error worth surfacing.
pub fn register_builtins(registry: &mut FlagRegistry) {
	for def in [&TAGGING_ENABLED] {
		if let Err(err) = registry.register(def) {
			debug_assert!(false, "builtin flag collision: {err}");
		}
	}
}
