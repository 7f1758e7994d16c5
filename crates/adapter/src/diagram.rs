use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use modelsync_events::{AdapterKind, RawEvent, StructuredKind};
use modelsync_primitives::{Document, HistoryState, View, ViewId};
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

use crate::adapter::{ImportOutcome, StructuredAdapter, ViewAdapter};
use crate::engine::{DiagramEngine, EngineListener};
use crate::error::{ExportError, ImportError, OpenError, RenderArtifactError};
use crate::tap::{EventTap, RawEventHandler};

/// Export behavior of a [`DiagramAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramOptions {
	/// Pretty-print on save.
	pub format: bool,
	/// Attempt an SVG rendering on every export.
	pub render_artifact: bool,
}

impl Default for DiagramOptions {
	fn default() -> Self {
		Self {
			format: true,
			render_artifact: true,
		}
	}
}

/// Structured adapter over a [`DiagramEngine`].
pub struct DiagramAdapter<E> {
	engine: Arc<E>,
	kind: StructuredKind,
	options: DiagramOptions,
	tap: Arc<EventTap>,
	input_bound: AtomicBool,
	released: AtomicBool,
}

impl<E: DiagramEngine> DiagramAdapter<E> {
	/// Wraps `engine` and taps its event bus.
	pub fn new(engine: Arc<E>, kind: StructuredKind, options: DiagramOptions) -> Self {
		let tap = Arc::new(EventTap::new());
		let forward = Arc::clone(&tap);
		let listener: EngineListener = Arc::new(move |name: &str, payload: &JsonValue| {
			forward.fire(&RawEvent::new(name, payload.clone()));
		});
		engine.set_listener(Some(listener));

		Self {
			engine,
			kind,
			options,
			tap,
			input_bound: AtomicBool::new(false),
			released: AtomicBool::new(false),
		}
	}

	pub fn engine(&self) -> &Arc<E> {
		&self.engine
	}

	pub fn options(&self) -> DiagramOptions {
		self.options
	}

	/// Number of raw event subscribers.
	pub fn subscriber_count(&self) -> usize {
		self.tap.len()
	}

	fn is_released(&self) -> bool {
		self.released.load(Ordering::Acquire)
	}
}

#[async_trait]
impl<E: DiagramEngine> ViewAdapter for DiagramAdapter<E> {
	fn kind(&self) -> AdapterKind {
		self.kind.into()
	}

	async fn import(&self, content: &str, open_as_active: bool) -> Result<ImportOutcome, ImportError> {
		if self.is_released() {
			return Err(ImportError::Released);
		}

		match self.engine.save(self.options.format).await {
			Ok(current) if current == content => {
				trace!(kind = ?self.kind, "diagram unchanged, import skipped");
				return Ok(ImportOutcome::skipped());
			}
			Ok(_) => {}
			// Nothing loaded yet.
			Err(error) => trace!(%error, "no current diagram to compare against"),
		}

		let warnings = self.engine.import(content, open_as_active).await.map_err(ImportError::Rejected)?;
		if !warnings.is_empty() {
			debug!(kind = ?self.kind, count = warnings.len(), ?warnings, "diagram imported with warnings");
		}
		Ok(ImportOutcome::loaded(warnings))
	}

	async fn export(&self) -> Result<Document, ExportError> {
		if self.is_released() {
			return Err(ExportError::Released);
		}

		let content = self.engine.save(self.options.format).await?;
		let mut document = Document::new(content);
		if self.options.render_artifact {
			match self.engine.render_svg().await.map_err(RenderArtifactError::from) {
				Ok(svg) => document.rendered_artifact = Some(svg),
				Err(error) => debug!(%error, "exporting without rendered artifact"),
			}
		}
		Ok(document)
	}

	fn subscribe(&self, handler: &RawEventHandler) -> bool {
		!self.is_released() && self.tap.subscribe(handler)
	}

	fn unsubscribe(&self, handler: &RawEventHandler) -> bool {
		self.tap.unsubscribe(handler)
	}

	fn bind_input(&self) {
		if self.is_released() {
			return;
		}
		self.input_bound.store(true, Ordering::Release);
		self.engine.bind_keyboard();
	}

	fn unbind_input(&self) {
		if self.input_bound.swap(false, Ordering::AcqRel) {
			self.engine.unbind_keyboard();
		}
	}

	fn release(&self) {
		if self.released.swap(true, Ordering::AcqRel) {
			return;
		}
		self.engine.set_listener(None);
		self.tap.clear();
		self.unbind_input();
		self.engine.destroy();
		debug!(kind = ?self.kind, "diagram adapter released");
	}
}

impl<E: DiagramEngine> StructuredAdapter for DiagramAdapter<E> {
	fn views(&self) -> Vec<View> {
		self.engine.views()
	}

	fn active_view(&self) -> Option<ViewId> {
		self.engine.active_view()
	}

	fn open(&self, view: &ViewId) -> Result<(), OpenError> {
		if self.is_released() {
			return Err(OpenError::Released);
		}
		if !self.engine.views().iter().any(|candidate| &candidate.id == view) {
			return Err(OpenError::UnknownView(view.clone()));
		}
		self.engine.open(view).map_err(OpenError::Engine)?;
		// Keyboard routing follows the active viewer.
		if self.input_bound.load(Ordering::Acquire) {
			self.engine.bind_keyboard();
		}
		Ok(())
	}

	fn history(&self) -> HistoryState {
		self.engine.history()
	}

	fn undo(&self) {
		self.engine.undo();
	}

	fn redo(&self) {
		self.engine.redo();
	}
}
