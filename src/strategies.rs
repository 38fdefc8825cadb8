//! Sync strategies, UI event keys and settings keys
//!
//! Every category is a closed enum so dispatch sites match exhaustively.
//! Strategies carry the human-readable label shown in the UI; saved
//! configurations store that label verbatim.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ============================================================================
// SYNC STRATEGY
// ============================================================================

/// How the right tree is reconciled with the left tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SyncStrategy {
	/// Right mirrors left; left is never modified
	#[default]
	OneWay,

	/// Both sides are reconciled toward each other
	TwoWay,

	/// Copy newer or missing files left to right; never delete
	Update,
}

impl SyncStrategy {
	/// All strategies in the order the UI offers them
	pub const ALL: [SyncStrategy; 3] = [SyncStrategy::OneWay, SyncStrategy::TwoWay, SyncStrategy::Update];

	/// Human-readable label
	pub fn label(self) -> &'static str {
		match self {
			Self::OneWay => "One-way",
			Self::TwoWay => "Two-way",
			Self::Update => "Update",
		}
	}

	/// Reverse lookup from a UI label. Only the exact labels resolve.
	pub fn from_label(label: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|s| s.label() == label)
	}

	/// Whether the purge flag has any effect under this strategy
	pub fn allows_purge(self) -> bool {
		!matches!(self, Self::Update)
	}
}

impl FromStr for SyncStrategy {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if let Some(strategy) = Self::from_label(s) {
			return Ok(strategy);
		}
		match s.to_lowercase().as_str() {
			"one-way" | "one_way" | "oneway" => Ok(Self::OneWay),
			"two-way" | "two_way" | "twoway" => Ok(Self::TwoWay),
			"update" => Ok(Self::Update),
			_ => Err(format!(
				"Unknown sync strategy: {}. Valid options: One-way, Two-way, Update",
				s
			)),
		}
	}
}

impl std::fmt::Display for SyncStrategy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.label())
	}
}

impl Serialize for SyncStrategy {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.label())
	}
}

impl<'de> Deserialize<'de> for SyncStrategy {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}

// ============================================================================
// EVENTS
// ============================================================================

/// Events the presentation layer dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
	/// User asked for a diff of the current pair
	Evaluate,

	/// A diff finished on a worker
	EvaluationComplete,

	/// User asked for a sync of the current pair
	Synchronize,

	/// A sync finished on a worker
	SynchronizationComplete,

	/// Source folder field changed
	SourceFolder,

	/// Destination folder field changed
	DestinationFolder,

	/// Strategy dropdown changed
	SyncDropdown,

	/// A saved configuration was picked
	ConfigurationDropdown,

	/// Current pair should be saved under a name
	SaveConfiguration,

	/// Purge checkbox toggled
	EnablePurge,
}

impl Event {
	/// Whether the event starts a long-running operation
	pub fn starts_operation(self) -> bool {
		matches!(self, Event::Evaluate | Event::Synchronize)
	}

	/// Whether the event is a completion posted by a worker
	pub fn is_completion(self) -> bool {
		matches!(self, Event::EvaluationComplete | Event::SynchronizationComplete)
	}
}

// ============================================================================
// SETTINGS KEYS
// ============================================================================

/// Keys of persisted settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsKey {
	EnablePurge,
}

impl SettingsKey {
	/// Key name in settings.json
	pub fn as_str(self) -> &'static str {
		match self {
			SettingsKey::EnablePurge => "enablePurge",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_label_round_trip() {
		for strategy in SyncStrategy::ALL {
			assert_eq!(SyncStrategy::from_label(strategy.label()), Some(strategy));
		}
	}

	#[test]
	fn test_from_label_is_exact() {
		assert_eq!(SyncStrategy::from_label("one-way"), None);
		assert_eq!(SyncStrategy::from_label("Sideways"), None);
		assert_eq!(SyncStrategy::from_label(""), None);
	}

	#[test]
	fn test_sync_strategy_from_str() {
		assert_eq!(SyncStrategy::from_str("One-way").unwrap(), SyncStrategy::OneWay);
		assert_eq!(SyncStrategy::from_str("one_way").unwrap(), SyncStrategy::OneWay);
		assert_eq!(SyncStrategy::from_str("TWO-WAY").unwrap(), SyncStrategy::TwoWay);
		assert_eq!(SyncStrategy::from_str("update").unwrap(), SyncStrategy::Update);
		assert!(SyncStrategy::from_str("mirror").is_err());
	}

	#[test]
	fn test_allows_purge() {
		assert!(SyncStrategy::OneWay.allows_purge());
		assert!(SyncStrategy::TwoWay.allows_purge());
		assert!(!SyncStrategy::Update.allows_purge());
	}

	#[test]
	fn test_strategy_serializes_as_label() {
		let json = serde_json::to_string(&SyncStrategy::TwoWay).unwrap();
		assert_eq!(json, "\"Two-way\"");
		let back: SyncStrategy = serde_json::from_str("\"Update\"").unwrap();
		assert_eq!(back, SyncStrategy::Update);
		assert!(serde_json::from_str::<SyncStrategy>("\"Nope\"").is_err());
	}

	#[test]
	fn test_event_classification() {
		assert!(Event::Evaluate.starts_operation());
		assert!(Event::Synchronize.starts_operation());
		assert!(!Event::SyncDropdown.starts_operation());
		assert!(Event::EvaluationComplete.is_completion());
		assert!(!Event::Evaluate.is_completion());
	}

	#[test]
	fn test_settings_key_name() {
		assert_eq!(SettingsKey::EnablePurge.as_str(), "enablePurge");
	}
}

// vim: ts=4
