//! Surfaces of the wrapped third-party engines.
//!
//! These are the lowest seams in the stack. Real hosts implement them over
//! their widget bindings; [`crate::memory`] implements them in memory.

use std::sync::Arc;

use async_trait::async_trait;
use modelsync_primitives::{HistoryState, View, ViewId};
use serde_json::Value as JsonValue;

use crate::error::EngineError;

/// Tap on an engine's private event bus. Called with `(name, payload)` for
/// every fired event, before and regardless of the engine's own handling.
pub type EngineListener = Arc<dyn Fn(&str, &JsonValue) + Send + Sync>;

/// A graphical diagram modeler.
#[async_trait]
pub trait DiagramEngine: Send + Sync {
	/// Parses and loads `content`, returning non-fatal warnings.
	///
	/// On error the previously loaded diagram must stay intact.
	async fn import(&self, content: &str, open: bool) -> Result<Vec<String>, EngineError>;

	/// Serializes the loaded diagram. Fails when nothing has been loaded.
	async fn save(&self, format: bool) -> Result<String, EngineError>;

	/// Renders the loaded diagram as SVG.
	async fn render_svg(&self) -> Result<String, EngineError>;

	fn views(&self) -> Vec<View>;

	fn active_view(&self) -> Option<ViewId>;

	fn open(&self, view: &ViewId) -> Result<(), EngineError>;

	/// Routes document-level keyboard shortcuts to the active viewer.
	fn bind_keyboard(&self);

	fn unbind_keyboard(&self);

	fn history(&self) -> HistoryState;

	fn undo(&self);

	fn redo(&self);

	/// Installs or removes the event bus tap.
	fn set_listener(&self, listener: Option<EngineListener>);

	/// Releases every engine resource.
	fn destroy(&self);
}

/// A plain-text source editor.
pub trait TextEngine: Send + Sync {
	fn value(&self) -> String;

	/// Replaces the whole buffer programmatically.
	fn set_value(&self, value: &str);

	fn bind_keyboard(&self);

	fn unbind_keyboard(&self);

	fn set_listener(&self, listener: Option<EngineListener>);

	fn dispose(&self);
}
