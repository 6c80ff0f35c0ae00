//! Notification debounce tiers.

use std::time::Duration;

/// How long a tagger's change notifications coalesce before delivery.
///
/// The delay shapes responsiveness only. It never drops computed state;
/// within the window the latest notification supersedes earlier undelivered
/// ones for the same tagger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaggerDelay {
	/// Barely perceptible; for features that should feel synchronous.
	NearImmediate,
	/// Quick feedback that still folds typing bursts.
	Short,
	/// The default for most features.
	#[default]
	Medium,
	/// Deferred until the user has gone quiet.
	Idle,
}

impl TaggerDelay {
	pub const fn duration(self) -> Duration {
		match self {
			Self::NearImmediate => Duration::from_millis(50),
			Self::Short => Duration::from_millis(250),
			Self::Medium => Duration::from_millis(500),
			Self::Idle => Duration::from_millis(3000),
		}
	}
}

impl From<TaggerDelay> for Duration {
	fn from(delay: TaggerDelay) -> Self {
		delay.duration()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_tier_is_medium() {
		assert_eq!(TaggerDelay::default(), TaggerDelay::Medium);
	}

	#[test]
	fn test_tiers_are_ordered() {
		let tiers = [
			TaggerDelay::NearImmediate,
			TaggerDelay::Short,
			TaggerDelay::Medium,
			TaggerDelay::Idle,
		];
		assert!(tiers.windows(2).all(|w| w[0].duration() < w[1].duration()));
	}
}
