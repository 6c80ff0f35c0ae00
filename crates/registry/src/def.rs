//! Flag definitions.

/// Where a flag's value may be overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagScope {
	/// One value for the whole process.
	Global,
	/// Global value, optionally overridden per language.
	PerLanguage,
}

/// A statically-defined feature flag.
///
/// Definitions are declared as `static` items so a [`FlagKey`] is just a
/// reference and comparing keys is pointer equality.
#[derive(Debug)]
pub struct FlagDef {
	/// Dotted name, e.g. `"tagging.enabled"`.
	pub name: &'static str,
	/// Value when nothing has been set.
	pub default: bool,
	pub scope: FlagScope,
}

/// Handle to a registered flag definition.
pub type FlagKey = &'static FlagDef;
