//! Persisted user settings and saved directory-pair configurations
//!
//! Two JSON files live in the Lockstep directory:
//! - `settings.json`: `{"enablePurge": false}`
//! - `configurations.json`: `{"<name>": {"src": "...", "dst": "...", "sync": "One-way"}}`
//!
//! The sync core never reads these; callers take a [`SettingsSnapshot`] and
//! pass its values in at call time.

use crate::error::SettingsError;
use crate::logging::*;
use crate::strategies::{SettingsKey, SyncStrategy};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";
pub const CONFIGURATIONS_FILE: &str = "configurations.json";

/// Global UI settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuiSettings {
	pub enable_purge: bool,
}

/// A named source/destination/strategy triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedConfiguration {
	pub src: String,
	pub dst: String,
	pub sync: SyncStrategy,
}

/// Values handed to the core at call time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsSnapshot {
	pub enable_purge: bool,
}

/// Settings store backed by the Lockstep directory
#[derive(Debug)]
pub struct Settings {
	base_dir: PathBuf,
	gui: GuiSettings,
	configurations: BTreeMap<String, SavedConfiguration>,
}

impl Settings {
	/// Load settings from `base_dir`, creating the directory and a default
	/// `settings.json` on first use.
	pub fn load(base_dir: &Path) -> Result<Settings, SettingsError> {
		fs::create_dir_all(base_dir).map_err(|source| SettingsError::Io { path: base_dir.to_path_buf(), source })?;

		let mut settings =
			Settings { base_dir: base_dir.to_path_buf(), gui: GuiSettings::default(), configurations: BTreeMap::new() };

		let settings_file = settings.settings_file();
		if settings_file.exists() {
			settings.gui = read_json(&settings_file)?;
		} else {
			write_json(&settings_file, &settings.gui)?;
		}

		let configurations_file = settings.configurations_file();
		if configurations_file.exists() {
			settings.configurations = read_json(&configurations_file)?;
		}

		debug!("Settings: {:?}", settings.gui);
		debug!("Configurations: {:?}", settings.configurations.keys().collect::<Vec<_>>());
		Ok(settings)
	}

	pub fn settings_file(&self) -> PathBuf {
		self.base_dir.join(SETTINGS_FILE)
	}

	pub fn configurations_file(&self) -> PathBuf {
		self.base_dir.join(CONFIGURATIONS_FILE)
	}

	pub fn gui_settings(&self) -> GuiSettings {
		self.gui
	}

	pub fn snapshot(&self) -> SettingsSnapshot {
		SettingsSnapshot { enable_purge: self.gui.enable_purge }
	}

	/// Boolean setting by key
	pub fn get(&self, key: SettingsKey) -> bool {
		match key {
			SettingsKey::EnablePurge => self.gui.enable_purge,
		}
	}

	/// Commit a boolean setting to memory and disk
	pub fn set(&mut self, key: SettingsKey, value: bool) -> Result<(), SettingsError> {
		match key {
			SettingsKey::EnablePurge => self.gui.enable_purge = value,
		}
		info!("Setting {} = {}", key.as_str(), value);
		write_json(&self.settings_file(), &self.gui)
	}

	pub fn set_enable_purge(&mut self, value: bool) -> Result<(), SettingsError> {
		self.set(SettingsKey::EnablePurge, value)
	}

	pub fn configuration(&self, name: &str) -> Option<&SavedConfiguration> {
		self.configurations.get(name)
	}

	/// Names of saved configurations, sorted
	pub fn configuration_names(&self) -> Vec<String> {
		self.configurations.keys().cloned().collect()
	}

	/// Commit a named configuration to memory and disk, replacing any
	/// previous one with that name
	pub fn save_configuration(&mut self, name: &str, config: SavedConfiguration) -> Result<(), SettingsError> {
		self.configurations.insert(name.to_string(), config);
		info!("Saved configuration {:?}", name);
		write_json(&self.configurations_file(), &self.configurations)
	}
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SettingsError> {
	let text = fs::read_to_string(path).map_err(|source| SettingsError::Io { path: path.to_path_buf(), source })?;
	json5::from_str(&text).map_err(|e| SettingsError::Parse { path: path.to_path_buf(), message: e.to_string() })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SettingsError> {
	let mut buf = Vec::new();
	let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
	let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
	value.serialize(&mut ser).map_err(|e| SettingsError::Serialize { message: e.to_string() })?;
	fs::write(path, buf).map_err(|source| SettingsError::Io { path: path.to_path_buf(), source })
}


// vim: ts=4
