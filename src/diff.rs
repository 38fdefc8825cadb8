//! Presence-only comparison of two directory trees
//!
//! The engine walks both trees in lock-step with an explicit work list of
//! pending `(left, right)` directory pairs. At each pair it partitions the
//! immediate children into left-only, right-only and common names:
//!
//! - a name unique to one side is reported once, at its top, whether it is a
//!   file or a whole subtree;
//! - a name that is a directory on both sides is queued for comparison;
//! - everything else (files on both sides, file/directory mismatches,
//!   entries whose metadata cannot be read) is not reported.
//!
//! File contents are never compared.

use crate::error::DiffError;
use crate::exclusion::IgnoreList;
use crate::logging::*;
use crate::types::DiffResult;
use crate::util::join_normalized;
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Classification of a name present on both sides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommonKind {
	/// Directory on both sides
	Dirs,
	/// Regular file (or other non-directory) on both sides
	Files,
	/// Kinds differ, or metadata could not be read
	Funny,
}

/// Partition of one directory level.
///
/// Names are kept as raw OS strings so that names which are not valid UTF-8
/// still join back onto real paths.
#[derive(Debug, Default)]
pub(crate) struct Level {
	pub left_only: Vec<OsString>,
	pub right_only: Vec<OsString>,
	pub common: Vec<(OsString, CommonKind)>,
}

/// List the names directly under `dir`, minus ignored ones
pub(crate) fn list_names(dir: &Path, ignore: &IgnoreList) -> Result<BTreeSet<OsString>, DiffError> {
	let traversal = |source| DiffError::Traversal { path: dir.to_path_buf(), source };
	let mut names = BTreeSet::new();
	for entry in fs::read_dir(dir).map_err(traversal)? {
		let entry = entry.map_err(traversal)?;
		let name = entry.file_name();
		if !ignore.is_ignored(&name) {
			names.insert(name);
		}
	}
	Ok(names)
}

/// Compare the immediate children of one `(left, right)` pair
pub(crate) fn compare_level(left: &Path, right: &Path, ignore: &IgnoreList) -> Result<Level, DiffError> {
	let left_names = list_names(left, ignore)?;
	let right_names = list_names(right, ignore)?;

	let mut level = Level {
		left_only: left_names.difference(&right_names).cloned().collect(),
		right_only: right_names.difference(&left_names).cloned().collect(),
		common: Vec::new(),
	};
	for name in left_names.intersection(&right_names) {
		let kind = classify(&left.join(name), &right.join(name));
		level.common.push((name.clone(), kind));
	}
	Ok(level)
}

fn classify(left: &Path, right: &Path) -> CommonKind {
	// Follows symlinks, so a link to a directory counts as a directory
	match (fs::metadata(left), fs::metadata(right)) {
		(Ok(l), Ok(r)) if l.is_dir() && r.is_dir() => CommonKind::Dirs,
		(Ok(l), Ok(r)) if !l.is_dir() && !r.is_dir() => CommonKind::Files,
		_ => CommonKind::Funny,
	}
}

/// Recursive directory comparator
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
	ignore: IgnoreList,
}

impl DiffEngine {
	/// Engine hiding the default VCS/cache names.
	///
	/// The defaults are [`DEFAULT_IGNORES`](crate::exclusion::DEFAULT_IGNORES),
	/// which include a plain `tags` entry: a user file or directory named
	/// `tags` is not reported. Use [`with_ignore`](Self::with_ignore) with
	/// [`IgnoreList::none`] to see every child name.
	pub fn new() -> Self {
		Self::default()
	}

	/// Engine with a custom ignore list
	pub fn with_ignore(ignore: IgnoreList) -> Self {
		DiffEngine { ignore }
	}

	pub fn ignore_list(&self) -> &IgnoreList {
		&self.ignore
	}

	/// Compute the entries unique to each side.
	///
	/// Both roots are assumed to be existing directories. Any directory that
	/// cannot be listed aborts the whole diff; no partial result is returned.
	pub fn diff(&self, left: &Path, right: &Path) -> Result<DiffResult, DiffError> {
		debug!("Diffing {} against {}", left.display(), right.display());

		let mut result = DiffResult::default();
		let mut pending: Vec<(PathBuf, PathBuf)> = vec![(left.to_path_buf(), right.to_path_buf())];

		while let Some((l, r)) = pending.pop() {
			let level = compare_level(&l, &r, &self.ignore)?;

			result.left_only.extend(level.left_only.iter().map(|n| join_normalized(&l, n)));
			result.right_only.extend(level.right_only.iter().map(|n| join_normalized(&r, n)));

			for (name, kind) in level.common {
				match kind {
					CommonKind::Dirs => pending.push((l.join(&name), r.join(&name))),
					CommonKind::Files => {}
					CommonKind::Funny => {
						debug!("Skipping {}: kinds differ or metadata unavailable", l.join(&name).display());
					}
				}
			}
		}

		info!(
			"Diff complete: {} left-only, {} right-only",
			result.left_only.len(),
			result.right_only.len()
		);
		Ok(result)
	}
}

/// Convenience wrapper using the default engine
pub fn diff(left: &Path, right: &Path) -> Result<DiffResult, DiffError> {
	DiffEngine::new().diff(left, right)
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	fn touch(root: &Path, rel: &str) {
		let path = root.join(rel);
		fs::create_dir_all(path.parent().unwrap()).unwrap();
		fs::write(path, rel).unwrap();
	}

	#[test]
	fn test_compare_level_partitions() {
		let l = TempDir::new().unwrap();
		let r = TempDir::new().unwrap();
		touch(l.path(), "a.txt");
		touch(l.path(), "b.txt");
		touch(r.path(), "a.txt");
		touch(r.path(), "c.txt");
		fs::create_dir(l.path().join("d")).unwrap();
		fs::create_dir(r.path().join("d")).unwrap();
		fs::create_dir(l.path().join("mixed")).unwrap();
		touch(r.path(), "mixed");

		let level = compare_level(l.path(), r.path(), &IgnoreList::none()).unwrap();
		assert_eq!(level.left_only, vec![OsString::from("b.txt")]);
		assert_eq!(level.right_only, vec![OsString::from("c.txt")]);
		assert!(level.common.contains(&(OsString::from("a.txt"), CommonKind::Files)));
		assert!(level.common.contains(&(OsString::from("d"), CommonKind::Dirs)));
		assert!(level.common.contains(&(OsString::from("mixed"), CommonKind::Funny)));
	}

	#[cfg(target_os = "linux")]
	#[test]
	fn test_non_utf8_names_stay_distinct() {
		use std::os::unix::ffi::OsStringExt;

		let l = TempDir::new().unwrap();
		let r = TempDir::new().unwrap();
		let e9 = OsString::from_vec(b"a\xe9".to_vec());
		let e8 = OsString::from_vec(b"a\xe8".to_vec());
		fs::write(l.path().join(&e9), "1").unwrap();
		fs::write(l.path().join(&e8), "2").unwrap();
		fs::write(r.path().join(&e9), "1").unwrap();

		let level = compare_level(l.path(), r.path(), &IgnoreList::none()).unwrap();
		assert_eq!(level.left_only, vec![e8.clone()]);
		assert_eq!(level.common, vec![(e9, CommonKind::Files)]);
	}

	#[test]
	fn test_mixed_kinds_not_reported() {
		let l = TempDir::new().unwrap();
		let r = TempDir::new().unwrap();
		fs::create_dir(l.path().join("thing")).unwrap();
		touch(l.path(), "thing/inner.txt");
		touch(r.path(), "thing");

		let result = DiffEngine::with_ignore(IgnoreList::none()).diff(l.path(), r.path()).unwrap();
		assert!(result.is_empty());
	}

	#[test]
	fn test_ignored_names_hidden() {
		let l = TempDir::new().unwrap();
		let r = TempDir::new().unwrap();
		touch(l.path(), ".git/HEAD");
		touch(l.path(), "keep.txt");

		let result = DiffEngine::new().diff(l.path(), r.path()).unwrap();
		assert_eq!(result.left_only.len(), 1);
		assert!(result.left_only[0].ends_with("/keep.txt"));

		let result = DiffEngine::with_ignore(IgnoreList::none()).diff(l.path(), r.path()).unwrap();
		assert_eq!(result.left_only.len(), 2);
	}

	#[test]
	fn test_missing_root_is_traversal_error() {
		let l = TempDir::new().unwrap();
		let missing = l.path().join("gone");
		match diff(l.path(), &missing) {
			Err(DiffError::Traversal { path, .. }) => assert_eq!(path, missing),
			other => panic!("unexpected: {:?}", other),
		}
	}

	#[test]
	fn test_deep_tree_does_not_recurse() {
		let l = TempDir::new().unwrap();
		let r = TempDir::new().unwrap();
		let mut rel = String::new();
		for i in 0..200 {
			if !rel.is_empty() {
				rel.push('/');
			}
			rel.push_str(&format!("d{}", i % 10));
		}
		fs::create_dir_all(l.path().join(&rel)).unwrap();
		fs::create_dir_all(r.path().join(&rel)).unwrap();
		touch(l.path(), &format!("{}/leaf.txt", rel));

		let result = diff(l.path(), r.path()).unwrap();
		assert_eq!(result.left_only.len(), 1);
		assert!(result.left_only[0].ends_with("/leaf.txt"));
		assert!(result.right_only.is_empty());
	}
}

// vim: ts=4
