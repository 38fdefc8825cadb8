//! Application configuration for Lockstep
//!
//! The configuration follows a priority chain:
//! 1. Built-in defaults (Config::default())
//! 2. Config file (~/.lockstep/config.toml)
//! 3. Environment variables (LOCKSTEP_* prefix)
//! 4. CLI flags (highest priority, applied by the binary)
//!
//! Saved directory pairs and the purge flag are not configuration; they
//! live in the settings store (see `settings`).

use crate::error::ConfigError;
use crate::exclusion::IgnoreList;
use crate::strategies::SyncStrategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the config file inside the Lockstep directory
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the Lockstep directory
pub const ENV_DIR: &str = "LOCKSTEP_DIR";
/// Environment variable overriding the log level
pub const ENV_LOG: &str = "LOCKSTEP_LOG";
/// Environment variable overriding the default strategy
pub const ENV_STRATEGY: &str = "LOCKSTEP_STRATEGY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
	/// Home directory for Lockstep settings (~/.lockstep)
	pub lockstep_dir: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	pub log_level: String,

	/// Strategy used when none is given
	pub default_strategy: SyncStrategy,

	/// Extra glob patterns hidden from diff and sync
	pub ignore_patterns: Vec<String>,

	/// Hide VCS/cache directories (.git, __pycache__, ...)
	pub use_default_ignores: bool,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			lockstep_dir: default_lockstep_dir(),
			log_level: "info".to_string(),
			default_strategy: SyncStrategy::OneWay,
			ignore_patterns: vec![],
			use_default_ignores: true,
		}
	}
}

fn default_lockstep_dir() -> PathBuf {
	std::env::var("HOME")
		.ok()
		.map(|h| PathBuf::from(h).join(".lockstep"))
		.unwrap_or_else(|| PathBuf::from(".lockstep"))
}

impl Config {
	/// Load defaults, then the config file, then the process environment.
	///
	/// `dir` overrides the Lockstep directory (CLI `--dir`).
	pub fn load(dir: Option<&Path>) -> Result<Config, ConfigError> {
		let env: Vec<(String, String)> = std::env::vars().filter(|(k, _)| k.starts_with("LOCKSTEP_")).collect();
		Self::load_with_env(dir, env)
	}

	/// Same as [`load`](Self::load) with an explicit environment
	pub fn load_with_env<I>(dir: Option<&Path>, env: I) -> Result<Config, ConfigError>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let env: Vec<(String, String)> = env.into_iter().collect();

		let lockstep_dir = match dir {
			Some(d) => d.to_path_buf(),
			None => env
				.iter()
				.find(|(k, _)| k == ENV_DIR)
				.map(|(_, v)| PathBuf::from(v))
				.unwrap_or_else(default_lockstep_dir),
		};

		let path = lockstep_dir.join(CONFIG_FILE);
		let mut config = if path.is_file() {
			Self::from_file(&path)?
		} else {
			Config::default()
		};
		config.lockstep_dir = lockstep_dir;
		config.apply_env(env)?;
		Ok(config)
	}

	/// Parse a TOML config file; missing keys keep their defaults
	pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
		let text = fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
		toml::from_str(&text).map_err(|e| ConfigError::Parse { path: path.to_path_buf(), message: e.to_string() })
	}

	/// Apply `LOCKSTEP_*` overrides
	pub fn apply_env<I>(&mut self, env: I) -> Result<(), ConfigError>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		for (key, value) in env {
			match key.as_str() {
				ENV_LOG => self.log_level = value,
				ENV_STRATEGY => {
					self.default_strategy = value
						.parse()
						.map_err(|message| ConfigError::InvalidValue { key: key.clone(), message })?;
				}
				_ => {}
			}
		}
		Ok(())
	}

	/// Ignore list described by this config
	pub fn ignore_list(&self) -> Result<IgnoreList, ConfigError> {
		let built = if self.use_default_ignores {
			IgnoreList::with_defaults(&self.ignore_patterns)
		} else {
			IgnoreList::new(&self.ignore_patterns)
		};
		built.map_err(|message| ConfigError::InvalidValue { key: "ignorePatterns".to_string(), message })
	}
}


// vim: ts=4
