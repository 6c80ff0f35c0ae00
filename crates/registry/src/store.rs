//! Runtime flag values.

use std::sync::Arc;

use limn_primitives::LanguageId;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::FlagError;
use crate::def::{FlagKey, FlagScope};
use crate::registry::FlagRegistry;

/// Runtime values layered over flag defaults.
///
/// Resolution order for a [`FlagScope::PerLanguage`] flag is per-language
/// override, then global override, then the definition's default. Global
/// flags skip the per-language layer entirely.
#[derive(Default)]
pub struct FlagStore {
	global: FxHashMap<&'static str, bool>,
	per_language: FxHashMap<(LanguageId, &'static str), bool>,
}

impl FlagStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the global value for a flag.
	pub fn set(&mut self, flag: FlagKey, value: bool) {
		self.global.insert(flag.name, value);
	}

	/// Sets a per-language override.
	///
	/// Ignored with a warning if the flag is global-scoped.
	pub fn set_for_language(&mut self, flag: FlagKey, language: LanguageId, value: bool) {
		if flag.scope == FlagScope::Global {
			warn!(flag = flag.name, "flags.scope_mismatch");
			return;
		}
		self.per_language.insert((language, flag.name), value);
	}

	/// Removes the global override, restoring the default.
	pub fn clear(&mut self, flag: FlagKey) {
		self.global.remove(flag.name);
	}

	pub fn clear_for_language(&mut self, flag: FlagKey, language: LanguageId) {
		self.per_language.remove(&(language, flag.name));
	}

	/// Resolves a flag's effective value.
	pub fn resolve(&self, flag: FlagKey, language: Option<LanguageId>) -> bool {
		if flag.scope == FlagScope::PerLanguage {
			if let Some(language) = language {
				if let Some(&value) = self.per_language.get(&(language, flag.name)) {
					return value;
				}
			}
		}
		self.global.get(flag.name).copied().unwrap_or(flag.default)
	}

	/// Sets a flag by name, e.g. from a config file or command.
	pub fn set_by_name(
		&mut self,
		registry: &FlagRegistry,
		name: &str,
		value: bool,
	) -> Result<(), FlagError> {
		let Some(flag) = registry.find(name) else {
			return Err(FlagError::Unknown(name.to_string()));
		};
		self.set(flag, value);
		Ok(())
	}

	pub fn len(&self) -> usize {
		self.global.len() + self.per_language.len()
	}

	pub fn is_empty(&self) -> bool {
		self.global.is_empty() && self.per_language.is_empty()
	}
}

/// Shared handle to a [`FlagStore`].
#[derive(Clone, Default)]
pub struct FlagsHandle(Arc<RwLock<FlagStore>>);

impl FlagsHandle {
	pub fn new(store: FlagStore) -> Self {
		Self(Arc::new(RwLock::new(store)))
	}

	pub fn with<R>(&self, f: impl FnOnce(&FlagStore) -> R) -> R {
		f(&self.0.read())
	}

	pub fn with_mut<R>(&self, f: impl FnOnce(&mut FlagStore) -> R) -> R {
		f(&mut self.0.write())
	}

	/// Resolves a flag without exposing the lock.
	pub fn resolve(&self, flag: FlagKey, language: Option<LanguageId>) -> bool {
		self.0.read().resolve(flag, language)
	}
}
