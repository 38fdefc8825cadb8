//! Logging prelude module for convenient access to tracing macros.
//!
//! # Usage
//!
//! ```ignore
//! use crate::logging::*;
//!
//! info!("Diff complete");
//! warn!("Received unexpected sync strategy");
//! ```

pub use tracing::{debug, error, info, warn};

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` is used:
///
/// ```bash
/// RUST_LOG=debug lockstep diff a b
/// RUST_LOG=lockstep::sync=debug lockstep sync a b --strategy Update
/// ```
pub fn init_tracing(default_level: &str) {
	let filter = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(default_level))
		.unwrap_or_else(|_| EnvFilter::new("info"));

	// A second init (e.g. from tests) is harmless
	let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

// vim: ts=4
