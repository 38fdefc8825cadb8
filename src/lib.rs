//! # Lockstep - compare two directory trees and keep them in step
//!
//! Lockstep finds the entries present under one directory tree but not the
//! other, and reconciles the two trees with a one-way, two-way or
//! update-only strategy. Only local filesystems are supported.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lockstep::diff::DiffEngine;
//! use lockstep::strategies::SyncStrategy;
//! use lockstep::sync::SyncAction;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (left, right) = (Path::new("./photos"), Path::new("/mnt/backup/photos"));
//!     let delta = DiffEngine::new().diff(left, right)?.sorted();
//!     println!("{} only on the left", delta.left_only.len());
//!
//!     let report = SyncAction::new().sync(left, right, SyncStrategy::Update, false)?;
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```
//!
//! ## Running off the event thread
//!
//! ```rust,ignore
//! use lockstep::types::DirectoryPair;
//! use lockstep::worker::OperationRunner;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (runner, mut completions) = OperationRunner::new(tokio::runtime::Handle::current());
//!     runner.submit_diff(DirectoryPair::new("a", "b"), "One-way").unwrap();
//!     let done = completions.recv().await.unwrap();
//!     println!("{:?}", done.outcome);
//! }
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod exclusion;
pub mod logging;
pub mod settings;
pub mod strategies;
pub mod sync;
pub mod tree;
pub mod types;
pub mod util;
pub mod worker;

// Re-export commonly used types and functions
pub use diff::DiffEngine;
pub use error::{DiffError, PreconditionError, SyncError, WorkerError};
pub use strategies::SyncStrategy;
pub use sync::{SyncAction, SyncReport};
pub use types::{DiffResult, DirectoryPair};

// vim: ts=4
