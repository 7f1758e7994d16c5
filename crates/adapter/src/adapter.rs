use async_trait::async_trait;
use modelsync_events::AdapterKind;
use modelsync_primitives::{Document, HistoryState, View, ViewId};

use crate::error::{ExportError, ImportError, OpenError};
use crate::tap::RawEventHandler;

/// Result of a successful [`ViewAdapter::import`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
	/// Non-fatal problems found while loading.
	pub warnings: Vec<String>,
	/// True when the engine already held the content and nothing was reloaded.
	pub skipped: bool,
}

impl ImportOutcome {
	pub fn loaded(warnings: Vec<String>) -> Self {
		Self { warnings, skipped: false }
	}

	pub fn skipped() -> Self {
		Self {
			warnings: Vec::new(),
			skipped: true,
		}
	}
}

/// Capability interface over one editor engine.
#[async_trait]
pub trait ViewAdapter: Send + Sync {
	fn kind(&self) -> AdapterKind;

	/// Loads `content` into the engine.
	///
	/// Implementations skip the reload when the engine's current export is
	/// byte-identical, preserving selection, undo history and zoom.
	async fn import(&self, content: &str, open_as_active: bool) -> Result<ImportOutcome, ImportError>;

	/// Serializes the current engine state.
	async fn export(&self) -> Result<Document, ExportError>;

	/// Registers a raw event listener. Returns false on duplicate registration.
	fn subscribe(&self, handler: &RawEventHandler) -> bool;

	/// Removes a raw event listener. Returns false if it was not registered.
	fn unsubscribe(&self, handler: &RawEventHandler) -> bool;

	/// Called when the owning tab becomes active.
	fn bind_input(&self);

	/// Called when the owning tab becomes inactive.
	fn unbind_input(&self);

	/// Drops every subscription and releases the engine. Idempotent.
	fn release(&self);
}

/// Extra capabilities of diagram engines with sub-views.
pub trait StructuredAdapter: ViewAdapter {
	/// Sub-views in engine order.
	fn views(&self) -> Vec<View>;

	fn active_view(&self) -> Option<ViewId>;

	/// Makes `view` the engine's active sub-view.
	fn open(&self, view: &ViewId) -> Result<(), OpenError>;

	fn history(&self) -> HistoryState;

	fn undo(&self);

	fn redo(&self);
}
