//! Folder-tree view of a delta
//!
//! Turns a list of `/`-separated paths into a tree of folders with the
//! delta entries as leaves. Parents are inserted once, in the order they
//! are first met after sorting.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaNode {
	pub name: String,
	pub leaf: bool,
	pub children: Vec<DeltaNode>,
}

impl DeltaNode {
	fn new(name: &str) -> Self {
		DeltaNode { name: name.to_string(), leaf: false, children: Vec::new() }
	}

	fn child_mut(&mut self, name: &str) -> &mut DeltaNode {
		child_of(&mut self.children, name)
	}
}

fn child_of<'a>(nodes: &'a mut Vec<DeltaNode>, name: &str) -> &'a mut DeltaNode {
	let idx = match nodes.iter().position(|n| n.name == name) {
		Some(idx) => idx,
		None => {
			nodes.push(DeltaNode::new(name));
			nodes.len() - 1
		}
	};
	&mut nodes[idx]
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaTree {
	pub roots: Vec<DeltaNode>,
}

impl DeltaTree {
	/// Build a tree from delta paths. Input order does not matter.
	pub fn from_paths<I, S>(paths: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut sorted: Vec<String> = paths.into_iter().map(|p| p.as_ref().to_string()).collect();
		sorted.sort();

		let mut tree = DeltaTree::default();
		for path in &sorted {
			let segments = segments(path);
			let Some((last, parents)) = segments.split_last() else {
				continue;
			};
			let mut node = match parents.first() {
				Some(first) => child_of(&mut tree.roots, first),
				None => {
					child_of(&mut tree.roots, last).leaf = true;
					continue;
				}
			};
			for seg in &parents[1..] {
				node = node.child_mut(seg);
			}
			node.child_mut(last).leaf = true;
		}
		tree
	}

	pub fn is_empty(&self) -> bool {
		self.roots.is_empty()
	}

	/// Number of delta entries in the tree
	pub fn leaf_count(&self) -> usize {
		fn count(nodes: &[DeltaNode]) -> usize {
			nodes.iter().map(|n| usize::from(n.leaf) + count(&n.children)).sum()
		}
		count(&self.roots)
	}

	/// Indented text view; leaves are prefixed with `marker`
	pub fn render(&self, marker: char) -> String {
		let mut lines = Vec::new();
		render_nodes(&self.roots, 0, marker, &mut lines);
		lines.join("\n")
	}
}

fn segments(path: &str) -> Vec<&str> {
	let mut out = Vec::new();
	if path.starts_with('/') {
		out.push("/");
	}
	out.extend(path.split('/').filter(|s| !s.is_empty()));
	out
}

fn render_nodes(nodes: &[DeltaNode], depth: usize, marker: char, lines: &mut Vec<String>) {
	let indent = "  ".repeat(depth);
	for node in nodes {
		if node.leaf {
			lines.push(format!("{}{} {}", indent, marker, node.name));
		} else if node.name == "/" {
			lines.push(format!("{}/", indent));
		} else {
			lines.push(format!("{}{}/", indent, node.name));
		}
		render_nodes(&node.children, depth + 1, marker, lines);
	}
}


// vim: ts=4
