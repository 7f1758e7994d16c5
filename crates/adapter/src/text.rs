use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use modelsync_events::{AdapterKind, RawEvent};
use modelsync_primitives::Document;
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

use crate::adapter::{ImportOutcome, ViewAdapter};
use crate::engine::{EngineListener, TextEngine};
use crate::error::{ExportError, ImportError};
use crate::tap::{EventTap, RawEventHandler};

/// Adapter over a plain-text editor. Text imports never produce warnings.
pub struct TextAdapter<E> {
	engine: Arc<E>,
	tap: Arc<EventTap>,
	input_bound: AtomicBool,
	released: AtomicBool,
}

impl<E: TextEngine> TextAdapter<E> {
	pub fn new(engine: Arc<E>) -> Self {
		let tap = Arc::new(EventTap::new());
		let forward = Arc::clone(&tap);
		let listener: EngineListener = Arc::new(move |name: &str, payload: &JsonValue| {
			forward.fire(&RawEvent::new(name, payload.clone()));
		});
		engine.set_listener(Some(listener));

		Self {
			engine,
			tap,
			input_bound: AtomicBool::new(false),
			released: AtomicBool::new(false),
		}
	}

	pub fn engine(&self) -> &Arc<E> {
		&self.engine
	}

	pub fn subscriber_count(&self) -> usize {
		self.tap.len()
	}

	fn is_released(&self) -> bool {
		self.released.load(Ordering::Acquire)
	}
}

#[async_trait]
impl<E: TextEngine> ViewAdapter for TextAdapter<E> {
	fn kind(&self) -> AdapterKind {
		AdapterKind::Text
	}

	async fn import(&self, content: &str, _open_as_active: bool) -> Result<ImportOutcome, ImportError> {
		if self.is_released() {
			return Err(ImportError::Released);
		}
		if self.engine.value() == content {
			trace!("text unchanged, import skipped");
			return Ok(ImportOutcome::skipped());
		}
		self.engine.set_value(content);
		Ok(ImportOutcome::loaded(Vec::new()))
	}

	async fn export(&self) -> Result<Document, ExportError> {
		if self.is_released() {
			return Err(ExportError::Released);
		}
		Ok(Document::new(self.engine.value()))
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
		self.engine.dispose();
		debug!("text adapter released");
	}
}
