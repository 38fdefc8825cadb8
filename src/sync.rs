//! Directory reconciliation
//!
//! A sync runs in two steps. [`SyncAction::plan`] walks both trees read-only
//! and produces an ordered list of [`SyncOp`]s; [`SyncAction::apply`] runs
//! them. Parents are always created before their children. A failing op
//! stops the run and everything applied before it stays applied.
//!
//! File freshness is decided on modification time alone: the strictly newer
//! side wins, equal times mean nothing to do. Copies carry the source
//! timestamps over so a repeated sync is a no-op.

use crate::diff::{compare_level, list_names, CommonKind};
use crate::error::SyncError;
use crate::exclusion::IgnoreList;
use crate::logging::*;
use crate::strategies::SyncStrategy;
use crate::types::DirectoryPair;
use filetime::FileTime;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A single filesystem mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOp {
	/// Create a directory (parent exists by the time this runs)
	CreateDir { path: PathBuf },

	/// Copy a file, overwriting the target, keeping source timestamps
	CopyFile { from: PathBuf, to: PathBuf },

	/// Delete a file
	RemoveFile { path: PathBuf },

	/// Delete a directory and everything below it
	RemoveDir { path: PathBuf },
}

impl SyncOp {
	/// Path this operation writes to or removes
	pub fn target(&self) -> &Path {
		match self {
			SyncOp::CreateDir { path } => path,
			SyncOp::CopyFile { to, .. } => to,
			SyncOp::RemoveFile { path } => path,
			SyncOp::RemoveDir { path } => path,
		}
	}

	/// Whether the operation deletes data
	pub fn is_removal(&self) -> bool {
		matches!(self, SyncOp::RemoveFile { .. } | SyncOp::RemoveDir { .. })
	}
}

impl fmt::Display for SyncOp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SyncOp::CreateDir { path } => write!(f, "mkdir  {}", path.display()),
			SyncOp::CopyFile { from, to } => {
				write!(f, "copy   {} -> {}", from.display(), to.display())
			}
			SyncOp::RemoveFile { path } => write!(f, "remove {}", path.display()),
			SyncOp::RemoveDir { path } => write!(f, "rmtree {}", path.display()),
		}
	}
}

/// Options for one sync invocation
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
	pub strategy: SyncStrategy,
	pub purge: bool,
	pub ignore: IgnoreList,
}

impl SyncOptions {
	pub fn new(strategy: SyncStrategy, purge: bool) -> Self {
		SyncOptions { strategy, purge, ignore: IgnoreList::default() }
	}

	pub fn ignore(mut self, ignore: IgnoreList) -> Self {
		self.ignore = ignore;
		self
	}

	/// Purge flag after applying the strategy's rules
	pub fn effective_purge(&self) -> bool {
		self.purge && self.strategy.allows_purge()
	}
}

/// Ordered operations computed for a directory pair
#[derive(Debug, Clone)]
pub struct SyncPlan {
	pub pair: DirectoryPair,
	pub strategy: SyncStrategy,
	pub purge: bool,
	pub ops: Vec<SyncOp>,
}

impl SyncPlan {
	pub fn is_empty(&self) -> bool {
		self.ops.is_empty()
	}

	pub fn len(&self) -> usize {
		self.ops.len()
	}

	/// Number of removal operations
	pub fn removals(&self) -> usize {
		self.ops.iter().filter(|op| op.is_removal()).count()
	}
}

/// Counters collected while applying a plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
	pub files_copied: usize,
	pub bytes_copied: u64,
	pub dirs_created: usize,
	pub files_removed: usize,
	pub dirs_removed: usize,
}

impl SyncReport {
	/// Whether nothing was changed
	pub fn is_noop(&self) -> bool {
		*self == SyncReport::default()
	}
}

impl fmt::Display for SyncReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} files copied ({} bytes), {} directories created, {} files removed, {} directories removed",
			self.files_copied, self.bytes_copied, self.dirs_created, self.files_removed, self.dirs_removed
		)
	}
}

/// Plans and applies reconciliation between two trees
#[derive(Debug, Clone, Default)]
pub struct SyncAction {
	ignore: IgnoreList,
}

impl SyncAction {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_ignore(ignore: IgnoreList) -> Self {
		SyncAction { ignore }
	}

	/// Reconcile `right` with `left` under `strategy`
	pub fn sync(
		&self,
		left: &Path,
		right: &Path,
		strategy: SyncStrategy,
		purge: bool,
	) -> Result<SyncReport, SyncError> {
		let options = SyncOptions { strategy, purge, ignore: self.ignore.clone() };
		let plan = self.plan(left, right, &options)?;
		self.apply(&plan)
	}

	/// Same as [`sync`](Self::sync) with the strategy given by its UI label.
	///
	/// An unknown label is logged and nothing is touched.
	pub fn sync_labeled(
		&self,
		left: &Path,
		right: &Path,
		label: &str,
		purge: bool,
	) -> Result<SyncReport, SyncError> {
		match SyncStrategy::from_label(label) {
			Some(strategy) => self.sync(left, right, strategy, purge),
			None => {
				warn!("Received unexpected sync strategy: {:?}; sync skipped", label);
				Err(SyncError::UnknownStrategy { label: label.to_string() })
			}
		}
	}

	/// Compute the operations needed without touching anything
	pub fn plan(&self, left: &Path, right: &Path, options: &SyncOptions) -> Result<SyncPlan, SyncError> {
		let pair = DirectoryPair::new(left, right);
		pair.validate()?;

		let strategy = options.strategy;
		let purge = options.effective_purge();
		if options.purge && !purge {
			debug!("Purge ignored for {} sync", strategy);
		}
		let ignore = &options.ignore;

		let mut ops = Vec::new();
		let mut pending: Vec<(PathBuf, PathBuf)> = vec![(left.to_path_buf(), right.to_path_buf())];

		while let Some((l, r)) = pending.pop() {
			let level = compare_level(&l, &r, ignore)?;

			for name in &level.left_only {
				copy_tree(&l.join(name), &r.join(name), ignore, &mut ops)?;
			}

			for name in &level.right_only {
				let rp = r.join(name);
				match strategy {
					SyncStrategy::Update => {}
					SyncStrategy::OneWay if purge => push_removal(&rp, &mut ops),
					SyncStrategy::OneWay => {}
					SyncStrategy::TwoWay if purge => push_removal(&rp, &mut ops),
					SyncStrategy::TwoWay => copy_tree(&rp, &l.join(name), ignore, &mut ops)?,
				}
			}

			for (name, kind) in level.common {
				let (lp, rp) = (l.join(&name), r.join(&name));
				match kind {
					CommonKind::Dirs => pending.push((lp, rp)),
					CommonKind::Files => match newer_side(&lp, &rp) {
						Some(Side::Left) => ops.push(SyncOp::CopyFile { from: lp, to: rp }),
						Some(Side::Right) if strategy == SyncStrategy::TwoWay => {
							ops.push(SyncOp::CopyFile { from: rp, to: lp })
						}
						_ => {}
					},
					CommonKind::Funny => {
						warn!("Skipping {}: file on one side, directory on the other", lp.display());
					}
				}
			}
		}

		info!(
			"Planned {} sync of {} -> {}: {} operations",
			strategy,
			left.display(),
			right.display(),
			ops.len()
		);
		Ok(SyncPlan { pair, strategy, purge, ops })
	}

	/// Run a plan. Stops at the first failure without rolling back.
	pub fn apply(&self, plan: &SyncPlan) -> Result<SyncReport, SyncError> {
		let mut report = SyncReport::default();
		for op in &plan.ops {
			debug!("{}", op);
			apply_op(op, &mut report).map_err(|source| {
				error!("Sync aborted at {}: {}", op.target().display(), source);
				SyncError::Reconciliation { path: op.target().to_path_buf(), source }
			})?;
		}
		info!("Sync complete: {}", report);
		Ok(report)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
	Left,
	Right,
}

fn newer_side(left: &Path, right: &Path) -> Option<Side> {
	let (l, r) = match (fs::metadata(left), fs::metadata(right)) {
		(Ok(l), Ok(r)) => (l, r),
		_ => return None,
	};
	let lt = FileTime::from_last_modification_time(&l);
	let rt = FileTime::from_last_modification_time(&r);
	match lt.cmp(&rt) {
		std::cmp::Ordering::Greater => Some(Side::Left),
		std::cmp::Ordering::Less => Some(Side::Right),
		std::cmp::Ordering::Equal => None,
	}
}

fn push_removal(path: &Path, ops: &mut Vec<SyncOp>) {
	let is_dir = fs::symlink_metadata(path).map(|m| m.is_dir()).unwrap_or(false);
	if is_dir {
		ops.push(SyncOp::RemoveDir { path: path.to_path_buf() });
	} else {
		ops.push(SyncOp::RemoveFile { path: path.to_path_buf() });
	}
}

/// Queue the creation of `to` as a copy of `from`, file or whole subtree
fn copy_tree(from: &Path, to: &Path, ignore: &IgnoreList, ops: &mut Vec<SyncOp>) -> Result<(), SyncError> {
	if !is_dir(from) {
		ops.push(SyncOp::CopyFile { from: from.to_path_buf(), to: to.to_path_buf() });
		return Ok(());
	}

	ops.push(SyncOp::CreateDir { path: to.to_path_buf() });
	let mut pending = vec![(from.to_path_buf(), to.to_path_buf())];
	while let Some((src, dst)) = pending.pop() {
		for name in list_names(&src, ignore)? {
			let (s, d) = (src.join(&name), dst.join(&name));
			if is_dir(&s) {
				ops.push(SyncOp::CreateDir { path: d.clone() });
				pending.push((s, d));
			} else {
				ops.push(SyncOp::CopyFile { from: s, to: d });
			}
		}
	}
	Ok(())
}

fn is_dir(path: &Path) -> bool {
	fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

fn apply_op(op: &SyncOp, report: &mut SyncReport) -> io::Result<()> {
	match op {
		SyncOp::CreateDir { path } => {
			if !path.is_dir() {
				fs::create_dir(path)?;
				report.dirs_created += 1;
			}
		}
		SyncOp::CopyFile { from, to } => {
			let meta = fs::metadata(from)?;
			let bytes = fs::copy(from, to)?;
			filetime::set_file_times(
				to,
				FileTime::from_last_access_time(&meta),
				FileTime::from_last_modification_time(&meta),
			)?;
			report.files_copied += 1;
			report.bytes_copied += bytes;
		}
		SyncOp::RemoveFile { path } => {
			fs::remove_file(path)?;
			report.files_removed += 1;
		}
		SyncOp::RemoveDir { path } => {
			fs::remove_dir_all(path)?;
			report.dirs_removed += 1;
		}
	}
	Ok(())
}


// vim: ts=4
