//! Entry-name filtering shared by the diff engine and the sync planner

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fmt;
use std::path::Path;

/// Names hidden from every comparison unless filtering is turned off
pub const DEFAULT_IGNORES: &[&str] = &["RCS", "CVS", "tags", ".git", ".hg", ".bzr", "_darcs", "__pycache__"];

/// Set of glob patterns matched against entry file names
#[derive(Clone)]
pub struct IgnoreList {
	patterns: Vec<String>,
	set: GlobSet,
}

impl IgnoreList {
	/// Build from glob patterns such as `*.tmp` or `node_modules`
	pub fn new<I, S>(patterns: I) -> Result<Self, String>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut builder = GlobSetBuilder::new();
		let mut kept = Vec::new();
		for pattern in patterns {
			let pattern = pattern.as_ref();
			let glob = Glob::new(pattern)
				.map_err(|e| format!("Invalid ignore pattern '{}': {}", pattern, e))?;
			builder.add(glob);
			kept.push(pattern.to_string());
		}
		let set = builder.build().map_err(|e| format!("Failed to build ignore set: {}", e))?;
		Ok(IgnoreList { patterns: kept, set })
	}

	/// No filtering at all
	pub fn none() -> Self {
		IgnoreList { patterns: Vec::new(), set: GlobSet::empty() }
	}

	/// Default VCS/cache names plus `extra` patterns
	pub fn with_defaults<I, S>(extra: I) -> Result<Self, String>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let all = DEFAULT_IGNORES
			.iter()
			.map(|s| s.to_string())
			.chain(extra.into_iter().map(|s| s.as_ref().to_string()));
		Self::new(all)
	}

	/// Whether an entry with this file name is hidden.
	///
	/// Takes the raw OS name so names that are not valid UTF-8 can be tested.
	pub fn is_ignored(&self, name: impl AsRef<Path>) -> bool {
		!self.patterns.is_empty() && self.set.is_match(name.as_ref())
	}

	/// Patterns this list was built from
	pub fn patterns(&self) -> &[String] {
		&self.patterns
	}
}

impl Default for IgnoreList {
	fn default() -> Self {
		// The default names are literal and always compile
		Self::with_defaults(std::iter::empty::<&str>()).unwrap_or_else(|_| Self::none())
	}
}

impl fmt::Debug for IgnoreList {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("IgnoreList").field("patterns", &self.patterns).finish()
	}
}


// vim: ts=4
