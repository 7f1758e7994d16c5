//! Adapter error types.

use modelsync_primitives::ViewId;
use thiserror::Error;

/// Opaque failure reported by a wrapped engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineError {
	message: String,
}

impl EngineError {
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}

/// Content could not be loaded. The engine keeps its previous state.
#[derive(Debug, Clone, Error)]
pub enum ImportError {
	/// The engine rejected the content (malformed or incompatible).
	#[error("content rejected: {0}")]
	Rejected(#[source] EngineError),
	/// The adapter has released its engine.
	#[error("adapter released")]
	Released,
}

/// Current engine state could not be serialized.
#[derive(Debug, Clone, Error)]
pub enum ExportError {
	#[error("export failed: {0}")]
	Engine(#[from] EngineError),
	#[error("adapter released")]
	Released,
}

/// Rendering the optional artifact failed. Never fails an export.
#[derive(Debug, Clone, Error)]
#[error("could not render artifact: {0}")]
pub struct RenderArtifactError(#[from] pub EngineError);

/// A sub-view could not be opened.
#[derive(Debug, Clone, Error)]
pub enum OpenError {
	#[error("unknown view: {0}")]
	UnknownView(ViewId),
	#[error("open failed: {0}")]
	Engine(#[source] EngineError),
	#[error("adapter released")]
	Released,
}
