//! Feature-flag registry.
//!
//! Flags are `'static` [`FlagDef`] values (dotted name, default, scope);
//! runtime values live in a [`FlagStore`] with a global layer and
//! per-language overrides. The store is shared through [`FlagsHandle`] so
//! gates can resolve flags from any thread with a read lock only.

pub mod builtins;
pub mod def;
pub mod registry;
pub mod store;

pub use builtins::{TAGGING_ENABLED, register_builtins};
pub use def::{FlagDef, FlagKey, FlagScope};
pub use registry::FlagRegistry;
pub use store::{FlagStore, FlagsHandle};

/// Errors from flag registration and name-based configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlagError {
	/// No flag with this name has been registered.
	#[error("unknown flag: {0}")]
	Unknown(String),
	/// A flag with this name was already registered.
	#[error("flag already registered: {0}")]
	Duplicate(&'static str),
}
