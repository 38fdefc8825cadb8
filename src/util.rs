//! Path normalization shared by the diff engine and the presentation layer

use std::path::Path;

/// Lexically normalize a path into forward-slash form.
///
/// Backslashes are treated as separators regardless of host OS, so the
/// result can always be split on `/`. Never touches the filesystem.
pub fn normalize_path(path: &str) -> String {
	if path.is_empty() {
		return ".".to_string();
	}
	let path = path.replace('\\', "/");

	// Exactly two leading slashes are kept as-is; three or more collapse to one
	let prefix = if path.starts_with("//") && !path.starts_with("///") {
		"//"
	} else if path.starts_with('/') {
		"/"
	} else {
		""
	};

	let mut parts: Vec<&str> = Vec::new();
	for comp in path.split('/') {
		match comp {
			"" | "." => {}
			".." => {
				if parts.last().is_some_and(|p| *p != "..") {
					parts.pop();
				} else if prefix.is_empty() {
					parts.push("..");
				}
				// ".." directly under an absolute root stays at the root
			}
			_ => parts.push(comp),
		}
	}

	let joined = parts.join("/");
	let out = format!("{}{}", prefix, joined);
	if out.is_empty() { ".".to_string() } else { out }
}

/// Join `name` onto `root` and normalize the result.
///
/// Bytes that are not valid UTF-8 show up as U+FFFD in the output only; the
/// name itself is joined unchanged.
pub fn join_normalized(root: &Path, name: impl AsRef<Path>) -> String {
	normalize_path(&root.join(name).to_string_lossy())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_backslashes_become_slashes() {
		assert_eq!(normalize_path(r"C:\data\left\x.txt"), "C:/data/left/x.txt");
		assert_eq!(normalize_path(r"left\sub/y.txt"), "left/sub/y.txt");
	}

	#[test]
	fn test_redundant_components() {
		assert_eq!(normalize_path("a//b/./c/"), "a/b/c");
		assert_eq!(normalize_path("a/b/../c"), "a/c");
		assert_eq!(normalize_path("./a"), "a");
		assert_eq!(normalize_path("."), ".");
		assert_eq!(normalize_path(""), ".");
		assert_eq!(normalize_path("a/.."), ".");
	}

	#[test]
	fn test_leading_parent_refs() {
		assert_eq!(normalize_path("../a"), "../a");
		assert_eq!(normalize_path("../../a/../b"), "../../b");
		assert_eq!(normalize_path("/../a"), "/a");
	}

	#[test]
	fn test_absolute_roots() {
		assert_eq!(normalize_path("/"), "/");
		assert_eq!(normalize_path("///a//b"), "/a/b");
		assert_eq!(normalize_path("//server/share"), "//server/share");
	}

	#[test]
	fn test_idempotent() {
		let inputs = ["a//b/./c/", r"x\y\..\z", "/tmp/L/sub/y.txt", "../../q", "//host/a/", ""];
		for input in inputs {
			let once = normalize_path(input);
			assert_eq!(normalize_path(&once), once, "input {:?}", input);
		}
	}

	#[test]
	fn test_join_normalized() {
		assert_eq!(join_normalized(Path::new("L/"), "x.txt"), "L/x.txt");
		assert_eq!(join_normalized(Path::new("./L"), "sub"), "L/sub");
	}
}

// vim: ts=4
