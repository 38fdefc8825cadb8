//! Core value types: directory pairs and diff results

use crate::error::PreconditionError;
use crate::util::normalize_path;
use std::fs;
use std::path::{Path, PathBuf};

/// An ordered (left, right) pair of directory roots
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryPair {
	pub left: PathBuf,
	pub right: PathBuf,
}

impl DirectoryPair {
	pub fn new(left: impl Into<PathBuf>, right: impl Into<PathBuf>) -> Self {
		DirectoryPair { left: left.into(), right: right.into() }
	}

	/// Check both roots exist and are directories
	pub fn validate(&self) -> Result<(), PreconditionError> {
		check_directory(&self.left)?;
		check_directory(&self.right)
	}

	/// Same pair with sides exchanged
	pub fn swapped(&self) -> Self {
		DirectoryPair { left: self.right.clone(), right: self.left.clone() }
	}
}

/// Precondition check for a single root
pub fn check_directory(path: &Path) -> Result<(), PreconditionError> {
	match fs::metadata(path) {
		Ok(meta) if meta.is_dir() => Ok(()),
		Ok(_) => Err(PreconditionError::NotADirectory { path: path.to_path_buf() }),
		Err(_) => Err(PreconditionError::Missing { path: path.to_path_buf() }),
	}
}

/// Entries present on one side only.
///
/// `left_only` entries are rooted at the left root and `right_only` at the
/// right root, already normalized to forward slashes. No ordering is
/// guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
	pub left_only: Vec<String>,
	pub right_only: Vec<String>,
}

impl DiffResult {
	pub fn is_empty(&self) -> bool {
		self.left_only.is_empty() && self.right_only.is_empty()
	}

	/// Total number of entries on both sides
	pub fn len(&self) -> usize {
		self.left_only.len() + self.right_only.len()
	}

	/// Copy with both lists sorted, for deterministic presentation
	pub fn sorted(&self) -> DiffResult {
		let mut out = self.clone();
		out.left_only.sort();
		out.right_only.sort();
		out
	}

	/// Entries relative to their own root, sorted.
	///
	/// Entries that do not live under the given root are returned unchanged.
	pub fn strip_roots(&self, left: &Path, right: &Path) -> (Vec<String>, Vec<String>) {
		let strip = |entries: &[String], root: &Path| {
			let root = normalize_path(&root.to_string_lossy());
			let mut out: Vec<String> = entries
				.iter()
				.map(|e| strip_root(e, &root).to_string())
				.collect();
			out.sort();
			out
		};
		(strip(&self.left_only, left), strip(&self.right_only, right))
	}
}

fn strip_root<'a>(entry: &'a str, root: &str) -> &'a str {
	if root == "." {
		return entry;
	}
	let rest = match entry.strip_prefix(root) {
		Some(rest) => rest,
		None => return entry,
	};
	if root.ends_with('/') {
		rest
	} else {
		rest.strip_prefix('/').unwrap_or(entry)
	}
}


// vim: ts=4
