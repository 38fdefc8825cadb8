//! Background execution of diff and sync operations
//!
//! Both operations block on filesystem I/O, so they never run on the thread
//! that consumes events. [`OperationRunner`] runs each one on the blocking
//! pool and posts a [`Completion`] onto a single channel; whoever holds the
//! [`CompletionReceiver`] is the only consumer and the only writer of any
//! UI-visible state.
//!
//! At most one operation per directory root is in flight. A submit whose
//! left or right root is already held by a running operation is refused,
//! whichever side it was on. Roots are compared after resolving them with
//! `fs::canonicalize` (falling back to lexical normalization for paths that
//! do not exist), so `/tmp/R`, `/tmp/R/` and a symlink to it are the same
//! root. There is no cancellation.

use crate::diff::DiffEngine;
use crate::error::{DiffError, SyncError, WorkerError};
use crate::exclusion::IgnoreList;
use crate::logging::*;
use crate::strategies::Event;
use crate::sync::{SyncAction, SyncReport};
use crate::types::{DiffResult, DirectoryPair};
use crate::util::normalize_path;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Identifier of a submitted operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationId(Uuid);

impl OperationId {
	fn new() -> Self {
		OperationId(Uuid::new_v4())
	}
}

impl fmt::Display for OperationId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Result of a finished operation
#[derive(Debug)]
pub enum Outcome {
	Diff(Result<DiffResult, DiffError>),
	Sync(Result<SyncReport, SyncError>),
}

/// Message posted when an operation finishes
#[derive(Debug)]
pub struct Completion {
	pub id: OperationId,
	pub pair: DirectoryPair,
	pub strategy_label: String,
	pub outcome: Outcome,
}

impl Completion {
	/// Event the consumer dispatches this completion as
	pub fn event(&self) -> Event {
		match self.outcome {
			Outcome::Diff(_) => Event::EvaluationComplete,
			Outcome::Sync(_) => Event::SynchronizationComplete,
		}
	}
}

pub type CompletionReceiver = mpsc::UnboundedReceiver<Completion>;

type InFlight = Arc<Mutex<HashSet<String>>>;

/// Key identifying a directory root in the in-flight set
fn root_key(path: &Path) -> String {
	let resolved = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
	normalize_path(&resolved.to_string_lossy())
}

/// Both root keys of a pair; a pair whose sides resolve alike holds one
fn pair_keys(pair: &DirectoryPair) -> Vec<String> {
	let mut keys = vec![root_key(&pair.left), root_key(&pair.right)];
	keys.dedup();
	keys
}

/// Releases a pair's roots when dropped
struct InFlightGuard {
	set: InFlight,
	keys: Vec<String>,
}

impl Drop for InFlightGuard {
	fn drop(&mut self) {
		let mut set = self.set.lock().unwrap_or_else(|e| e.into_inner());
		for key in &self.keys {
			set.remove(key);
		}
	}
}

/// Launches diff and sync operations off the event thread
pub struct OperationRunner {
	handle: Handle,
	tx: mpsc::UnboundedSender<Completion>,
	in_flight: InFlight,
	engine: DiffEngine,
	action: SyncAction,
}

impl OperationRunner {
	/// Runner with the default ignore list, plus the receiving end of its
	/// completion channel
	pub fn new(handle: Handle) -> (Self, CompletionReceiver) {
		Self::with_ignore(handle, IgnoreList::default())
	}

	pub fn with_ignore(handle: Handle, ignore: IgnoreList) -> (Self, CompletionReceiver) {
		let (tx, rx) = mpsc::unbounded_channel();
		let runner = OperationRunner {
			handle,
			tx,
			in_flight: Arc::new(Mutex::new(HashSet::new())),
			engine: DiffEngine::with_ignore(ignore.clone()),
			action: SyncAction::with_ignore(ignore),
		};
		(runner, rx)
	}

	/// Whether a running operation holds either root of `pair`
	pub fn is_busy(&self, pair: &DirectoryPair) -> bool {
		let set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
		pair_keys(pair).iter().any(|key| set.contains(key))
	}

	/// Start a diff. The label is only logged.
	pub fn submit_diff(&self, pair: DirectoryPair, strategy_label: &str) -> Result<OperationId, WorkerError> {
		info!(
			"Received diff request: src={}, dst={}, sync={}",
			pair.left.display(),
			pair.right.display(),
			strategy_label
		);
		let engine = self.engine.clone();
		self.spawn(pair, strategy_label, move |pair| Outcome::Diff(engine.diff(&pair.left, &pair.right)))
	}

	/// Start a sync with the strategy named by its UI label
	pub fn submit_sync(
		&self,
		pair: DirectoryPair,
		strategy_label: &str,
		purge: bool,
	) -> Result<OperationId, WorkerError> {
		info!(
			"Received sync request: src={}, dst={}, sync={}, purge={}",
			pair.left.display(),
			pair.right.display(),
			strategy_label,
			purge
		);
		let action = self.action.clone();
		let label = strategy_label.to_string();
		self.spawn(pair, strategy_label, move |pair| {
			Outcome::Sync(action.sync_labeled(&pair.left, &pair.right, &label, purge))
		})
	}

	fn spawn<F>(&self, pair: DirectoryPair, strategy_label: &str, op: F) -> Result<OperationId, WorkerError>
	where
		F: FnOnce(&DirectoryPair) -> Outcome + Send + 'static,
	{
		if self.tx.is_closed() {
			return Err(WorkerError::Disconnected);
		}

		let keys = pair_keys(&pair);
		let guard = {
			let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
			if keys.iter().any(|key| set.contains(key)) {
				warn!("Refusing operation on {} <-> {}: already running", pair.left.display(), pair.right.display());
				return Err(WorkerError::Busy { left: pair.left, right: pair.right });
			}
			set.extend(keys.iter().cloned());
			InFlightGuard { set: Arc::clone(&self.in_flight), keys }
		};

		let id = OperationId::new();
		let tx = self.tx.clone();
		let strategy_label = strategy_label.to_string();
		self.handle.spawn_blocking(move || {
			let outcome = op(&pair);
			// Release before posting so the consumer may resubmit right away
			drop(guard);
			let completion = Completion { id, pair, strategy_label, outcome };
			if tx.send(completion).is_err() {
				debug!("Operation {} finished with no consumer listening", id);
			}
		});
		debug!("Operation {} started", id);
		Ok(id)
	}
}


// vim: ts=4
