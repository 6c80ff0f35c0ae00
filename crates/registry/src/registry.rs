//! Name-indexed flag definitions.

use rustc_hash::FxHashMap;

use crate::FlagError;
use crate::builtins::register_builtins;
use crate::def::FlagKey;

/// All known flag definitions, indexed by name.
///
/// Registration happens once at startup; lookups are read-only afterwards,
/// so the registry itself needs no interior mutability.
#[derive(Default)]
pub struct FlagRegistry {
	by_name: FxHashMap<&'static str, FlagKey>,
}

impl FlagRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// A registry pre-populated with the built-in flags.
	pub fn with_builtins() -> Self {
		let mut registry = Self::new();
		register_builtins(&mut registry);
		registry
	}

	/// Registers a definition under its name.
	pub fn register(&mut self, def: FlagKey) -> Result<(), FlagError> {
		if self.by_name.contains_key(def.name) {
			return Err(FlagError::Duplicate(def.name));
		}
		self.by_name.insert(def.name, def);
		Ok(())
	}

	pub fn find(&self, name: &str) -> Option<FlagKey> {
		self.by_name.get(name).copied()
	}

	pub fn len(&self) -> usize {
		self.by_name.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_name.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::def::{FlagDef, FlagScope};

	static DEMO: FlagDef = FlagDef {
		name: "demo.flag",
		default: false,
		scope: FlagScope::Global,
	};

	#[test]
	fn test_register_and_find() {
		let mut registry = FlagRegistry::new();
		registry.register(&DEMO).unwrap();
		let found = registry.find("demo.flag").unwrap();
		assert!(std::ptr::eq(found, &DEMO));
		assert!(registry.find("missing.flag").is_none());
	}

	#[test]
	fn test_duplicate_registration_rejected() {
		let mut registry = FlagRegistry::new();
		registry.register(&DEMO).unwrap();
		assert_eq!(
			registry.register(&DEMO),
			Err(FlagError::Duplicate("demo.flag"))
		);
	}

	#[test]
	fn test_builtins_present() {
		let registry = FlagRegistry::with_builtins();
		assert!(registry.find("tagging.enabled").is_some());
	}
}
