//! Error types for Lockstep operations

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// A root of a directory pair is unusable before any work starts
#[derive(Debug)]
pub enum PreconditionError {
	/// Root does not exist
	Missing { path: PathBuf },

	/// Root exists but is not a directory
	NotADirectory { path: PathBuf },
}

impl fmt::Display for PreconditionError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PreconditionError::Missing { path } => {
				write!(f, "Directory does not exist: {}", path.display())
			}
			PreconditionError::NotADirectory { path } => {
				write!(f, "Not a directory: {}", path.display())
			}
		}
	}
}

impl Error for PreconditionError {}

/// Errors raised while comparing two trees
#[derive(Debug)]
pub enum DiffError {
	/// A directory could not be listed; the whole diff is abandoned
	Traversal { path: PathBuf, source: io::Error },
}

impl fmt::Display for DiffError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DiffError::Traversal { path, source } => {
				write!(f, "Cannot list directory {}: {}", path.display(), source)
			}
		}
	}
}

impl Error for DiffError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			DiffError::Traversal { source, .. } => Some(source),
		}
	}
}

/// Errors raised while planning or applying a synchronization
#[derive(Debug)]
pub enum SyncError {
	/// A root failed the existence check
	Precondition(PreconditionError),

	/// A directory could not be listed while planning
	Traversal { path: PathBuf, source: io::Error },

	/// A filesystem mutation failed; earlier operations stay applied
	Reconciliation { path: PathBuf, source: io::Error },

	/// The strategy label did not name a known strategy
	UnknownStrategy { label: String },
}

impl fmt::Display for SyncError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SyncError::Precondition(e) => write!(f, "Precondition failed: {}", e),
			SyncError::Traversal { path, source } => {
				write!(f, "Cannot list directory {}: {}", path.display(), source)
			}
			SyncError::Reconciliation { path, source } => {
				write!(f, "Sync failed at {}: {}", path.display(), source)
			}
			SyncError::UnknownStrategy { label } => {
				write!(f, "Unknown sync strategy: {:?}", label)
			}
		}
	}
}

impl Error for SyncError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			SyncError::Precondition(e) => Some(e),
			SyncError::Traversal { source, .. } => Some(source),
			SyncError::Reconciliation { source, .. } => Some(source),
			SyncError::UnknownStrategy { .. } => None,
		}
	}
}

impl From<PreconditionError> for SyncError {
	fn from(e: PreconditionError) -> Self {
		SyncError::Precondition(e)
	}
}

impl From<DiffError> for SyncError {
	fn from(e: DiffError) -> Self {
		match e {
			DiffError::Traversal { path, source } => SyncError::Traversal { path, source },
		}
	}
}

/// Settings storage errors
#[derive(Debug)]
pub enum SettingsError {
	/// Reading or writing a settings file failed
	Io { path: PathBuf, source: io::Error },

	/// A settings file could not be parsed
	Parse { path: PathBuf, message: String },

	/// Serializing settings failed
	Serialize { message: String },
}

impl fmt::Display for SettingsError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SettingsError::Io { path, source } => {
				write!(f, "Settings I/O error on {}: {}", path.display(), source)
			}
			SettingsError::Parse { path, message } => {
				write!(f, "Cannot parse {}: {}", path.display(), message)
			}
			SettingsError::Serialize { message } => {
				write!(f, "Cannot serialize settings: {}", message)
			}
		}
	}
}

impl Error for SettingsError {}

/// Application configuration errors
#[derive(Debug)]
pub enum ConfigError {
	/// Config file could not be read
	Io { path: PathBuf, source: io::Error },

	/// Config file could not be parsed
	Parse { path: PathBuf, message: String },

	/// An environment override held an invalid value
	InvalidValue { key: String, message: String },
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::Io { path, source } => {
				write!(f, "Cannot read config {}: {}", path.display(), source)
			}
			ConfigError::Parse { path, message } => {
				write!(f, "Invalid config {}: {}", path.display(), message)
			}
			ConfigError::InvalidValue { key, message } => {
				write!(f, "Invalid value for {}: {}", key, message)
			}
		}
	}
}

impl Error for ConfigError {}

/// Errors from the background operation runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
	/// An operation on the same directory pair is still running
	Busy { left: PathBuf, right: PathBuf },

	/// The completion channel has no consumer left
	Disconnected,
}

impl fmt::Display for WorkerError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			WorkerError::Busy { left, right } => write!(
				f,
				"An operation on {} <-> {} is already in progress",
				left.display(),
				right.display()
			),
			WorkerError::Disconnected => write!(f, "Completion channel disconnected"),
		}
	}
}

impl Error for WorkerError {}


// vim: ts=4
