//! Error types for the synchronizer and its configuration.

use std::path::PathBuf;

use modelsync_primitives::ViewId;
use thiserror::Error;

use crate::state::Tab;

/// Host requests the synchronizer refused.
///
/// Adapter failures never surface here; they become notifications.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyncError {
	/// The synchronizer was shut down.
	#[error("synchronizer has been shut down")]
	Destroyed,

	/// The requested tab is disabled.
	#[error("{0} tab is disabled")]
	TabDisabled(Tab),

	/// The structured engine exposes no view with this id.
	#[error("unknown view: {0}")]
	UnknownView(ViewId),

	/// The view being left could not be saved, so it stays active.
	#[error("could not save the {0} view before leaving it")]
	FlushFailed(Tab),

	/// Neither tab can be activated.
	#[error("no view can be activated")]
	NoActiveView,
}

/// Result type for host-facing synchronizer operations.
pub type Result<T, E = SyncError> = std::result::Result<T, E>;

/// Errors loading [`SyncOptions`](crate::SyncOptions).
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or an unknown key.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),
}
