/// Diff engine tests against real directory trees
///
/// Tests verify:
/// 1. Identical trees produce an empty delta
/// 2. Unique entries are reported once, at their top, rooted at their side
/// 3. Shared directories never appear as entries themselves
/// 4. Swapping the sides swaps the delta
/// 5. Listing failures abort the whole diff
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use lockstep::diff::DiffEngine;
use lockstep::error::DiffError;
use lockstep::exclusion::IgnoreList;
use lockstep::types::DirectoryPair;
use lockstep::util::normalize_path;

/// Helper to create a file, with parents
fn create_file(dir: &Path, name: &str) {
	let path = dir.join(name);
	fs::create_dir_all(path.parent().unwrap()).unwrap();
	fs::write(&path, name).unwrap();
}

/// Helper to create an empty directory
fn create_dir(dir: &Path, name: &str) {
	fs::create_dir_all(dir.join(name)).unwrap();
}

/// Normalized `root/rel`, as the engine reports it
fn rooted(root: &Path, rel: &str) -> String {
	normalize_path(&root.join(rel).to_string_lossy())
}

fn setup_two_dirs() -> (TempDir, TempDir) {
	(TempDir::new().unwrap(), TempDir::new().unwrap())
}

fn engine() -> DiffEngine {
	DiffEngine::with_ignore(IgnoreList::none())
}

// ===================================================================
// END-TO-END SCENARIOS
// ===================================================================

#[test]
fn test_single_file_left_only() {
	let (l, r) = setup_two_dirs();
	create_file(l.path(), "x.txt");

	let result = engine().diff(l.path(), r.path()).unwrap();
	assert_eq!(result.left_only, vec![rooted(l.path(), "x.txt")]);
	assert!(result.right_only.is_empty());
}

#[test]
fn test_file_inside_shared_empty_dir() {
	let (l, r) = setup_two_dirs();
	create_file(l.path(), "sub/y.txt");
	create_dir(r.path(), "sub");

	let result = engine().diff(l.path(), r.path()).unwrap();
	assert_eq!(result.left_only, vec![rooted(l.path(), "sub/y.txt")]);
	assert!(result.right_only.is_empty());
}

#[test]
fn test_disjoint_files_both_sides() {
	let (l, r) = setup_two_dirs();
	create_file(l.path(), "a.txt");
	create_file(l.path(), "b.txt");
	create_file(r.path(), "a.txt");
	create_file(r.path(), "c.txt");

	let result = engine().diff(l.path(), r.path()).unwrap();
	assert_eq!(result.left_only, vec![rooted(l.path(), "b.txt")]);
	assert_eq!(result.right_only, vec![rooted(r.path(), "c.txt")]);
}

// ===================================================================
// PROPERTIES
// ===================================================================

#[test]
fn test_identical_trees_empty_delta() {
	let (l, r) = setup_two_dirs();
	for root in [l.path(), r.path()] {
		create_file(root, "one.txt");
		create_file(root, "nested/two.txt");
		create_file(root, "nested/deeper/three.txt");
	}
	// Same names with different content still count as identical
	fs::write(r.path().join("one.txt"), "changed").unwrap();

	let result = engine().diff(l.path(), r.path()).unwrap();
	assert!(result.is_empty(), "unexpected delta: {:?}", result);
}

#[test]
fn test_unique_subtree_reported_at_top() {
	let (l, r) = setup_two_dirs();
	create_file(l.path(), "a/b.txt");
	create_file(l.path(), "a/more/c.txt");
	create_file(r.path(), "other.txt");

	let result = engine().diff(l.path(), r.path()).unwrap();
	assert_eq!(result.left_only, vec![rooted(l.path(), "a")]);
	assert_eq!(result.right_only, vec![rooted(r.path(), "other.txt")]);
	assert!(!result.right_only.iter().any(|p| p.starts_with(&rooted(r.path(), "a"))));
}

#[test]
fn test_shared_dir_never_listed() {
	let (l, r) = setup_two_dirs();
	create_file(l.path(), "shared/left.txt");
	create_file(l.path(), "shared/common.txt");
	create_file(r.path(), "shared/right.txt");
	create_file(r.path(), "shared/common.txt");

	let result = engine().diff(l.path(), r.path()).unwrap();
	let shared_l = rooted(l.path(), "shared");
	let shared_r = rooted(r.path(), "shared");
	assert!(!result.left_only.contains(&shared_l));
	assert!(!result.right_only.contains(&shared_r));
	assert_eq!(result.left_only, vec![rooted(l.path(), "shared/left.txt")]);
	assert_eq!(result.right_only, vec![rooted(r.path(), "shared/right.txt")]);
}

#[test]
fn test_swapping_sides_swaps_delta() {
	let (l, r) = setup_two_dirs();
	create_file(l.path(), "only-left.txt");
	create_file(l.path(), "d/x.txt");
	create_file(r.path(), "d/y.txt");
	create_file(r.path(), "e/z.txt");

	let pair = DirectoryPair::new(l.path(), r.path());
	let forward = engine().diff(&pair.left, &pair.right).unwrap();
	let swapped = pair.swapped();
	let backward = engine().diff(&swapped.left, &swapped.right).unwrap();

	assert_eq!(forward.sorted().left_only, backward.sorted().right_only);
	assert_eq!(forward.sorted().right_only, backward.sorted().left_only);

	let (fl, fr) = forward.strip_roots(l.path(), r.path());
	let (bl, br) = backward.strip_roots(r.path(), l.path());
	assert_eq!(fl, br);
	assert_eq!(fr, bl);
	assert_eq!(fl, vec!["d/x.txt".to_string(), "only-left.txt".to_string()]);
}

#[test]
fn test_results_are_normalized() {
	let (l, r) = setup_two_dirs();
	create_file(l.path(), "deep/er/f.txt");
	create_dir(r.path(), "deep/er");

	// Feed the engine an unnormalized root
	let messy_left = l.path().join(".").join("deep").join("..");
	let result = engine().diff(&messy_left, r.path()).unwrap();
	assert_eq!(result.left_only, vec![rooted(l.path(), "deep/er/f.txt")]);
	for path in &result.left_only {
		assert_eq!(&normalize_path(path), path);
		assert!(!path.contains('\\'));
		assert!(!path.contains("/./"));
	}
}

#[test]
fn test_relative_roots() {
	let base = TempDir::new().unwrap();
	create_file(base.path(), "L/x.txt");
	create_dir(base.path(), "R");

	let l = base.path().join("L");
	let r = base.path().join("R");
	let result = engine().diff(&l, &r).unwrap();
	assert_eq!(result.left_only.len(), 1);
	assert!(result.left_only[0].ends_with("L/x.txt"));
}

#[test]
fn test_default_engine_hides_vcs_dirs() {
	let (l, r) = setup_two_dirs();
	create_file(l.path(), ".git/config");
	create_file(r.path(), "__pycache__/m.pyc");

	let result = DiffEngine::new().diff(l.path(), r.path()).unwrap();
	assert!(result.is_empty());
}

#[test]
fn test_tags_hidden_only_by_default_engine() {
	let (l, r) = setup_two_dirs();
	create_file(l.path(), "tags");

	assert!(DiffEngine::new().diff(l.path(), r.path()).unwrap().is_empty());
	let result = engine().diff(l.path(), r.path()).unwrap();
	assert_eq!(result.left_only, vec![rooted(l.path(), "tags")]);
}

// ===================================================================
// FAILURES
// ===================================================================

#[test]
fn test_missing_right_root_fails() {
	let (l, r) = setup_two_dirs();
	create_file(l.path(), "x.txt");
	let missing = r.path().join("nope");

	let err = engine().diff(l.path(), &missing).unwrap_err();
	match err {
		DiffError::Traversal { path, .. } => assert_eq!(path, missing),
	}
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdir_aborts_whole_diff() {
	use std::os::unix::fs::PermissionsExt;

	let (l, r) = setup_two_dirs();
	create_file(l.path(), "top.txt");
	create_file(l.path(), "locked/inner.txt");
	create_dir(r.path(), "locked");

	let locked = l.path().join("locked");
	fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
	let can_still_read = fs::read_dir(&locked).is_ok();

	let result = engine().diff(l.path(), r.path());

	fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

	if can_still_read {
		// Running as root: permissions are not enforced
		return;
	}
	assert!(matches!(result, Err(DiffError::Traversal { .. })), "no partial result expected");
}

// ===================================================================
// NAMES THAT ARE NOT UTF-8
// ===================================================================

#[cfg(target_os = "linux")]
fn raw_name(bytes: &[u8]) -> std::ffi::OsString {
	use std::os::unix::ffi::OsStringExt;
	std::ffi::OsString::from_vec(bytes.to_vec())
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_names_are_not_merged() {
	let (l, r) = setup_two_dirs();
	fs::write(l.path().join(raw_name(b"a\xe9")), "1").unwrap();
	fs::write(l.path().join(raw_name(b"a\xe8")), "2").unwrap();

	let result = engine().diff(l.path(), r.path()).unwrap();
	assert_eq!(result.left_only.len(), 2, "both names must be reported: {:?}", result);
	assert!(result.right_only.is_empty());
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_shared_dir_is_descended() {
	let (l, r) = setup_two_dirs();
	let dir = raw_name(b"d\xe9");
	fs::create_dir(l.path().join(&dir)).unwrap();
	fs::create_dir(r.path().join(&dir)).unwrap();
	fs::write(l.path().join(&dir).join("inner.txt"), "x").unwrap();

	let result = engine().diff(l.path(), r.path()).unwrap();
	assert_eq!(result.left_only.len(), 1, "unexpected delta: {:?}", result);
	assert!(result.left_only[0].ends_with("/inner.txt"));
	assert!(result.right_only.is_empty());
}

// vim: ts=4
