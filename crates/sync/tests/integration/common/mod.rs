//! Common utilities for synchronizer integration tests.

use std::sync::Arc;

use modelsync::{StructuredTabOptions, SyncOptions, Synchronizer};
use modelsync_adapter::memory::{MemoryDiagramEngine, MemoryTextEngine};
use modelsync_adapter::{DiagramAdapter, TextAdapter};
use modelsync_events::{ContentSavedReason, HostEvent, SharedHostHandler, StructuredKind, SyncEvent};
use modelsync_primitives::Severity;
use parking_lot::Mutex;

pub const MODEL_A: &str = "<model A/>";
pub const MODEL_B: &str = "<model B/>";
pub const DISH: &str = r#"<definitions id="dish"><decision id="d1" name="Season"/><decision id="d2" name="Guests"/></definitions>"#;

/// A synchronizer over in-memory engines, recording every host event.
pub struct Harness {
	pub sync: Arc<Synchronizer>,
	pub diagram: Arc<MemoryDiagramEngine>,
	pub text: Arc<MemoryTextEngine>,
	events: Arc<Mutex<Vec<HostEvent>>>,
}

/// Wires engines and adapters around `handler`.
pub fn build(options: &SyncOptions, handler: SharedHostHandler) -> (Synchronizer, Arc<MemoryDiagramEngine>, Arc<MemoryTextEngine>) {
	let _ = tracing_subscriber::fmt::try_init();
	let kind = options.structured.kind;
	let diagram = Arc::new(MemoryDiagramEngine::new(kind));
	let text = Arc::new(MemoryTextEngine::new());
	let structured = Arc::new(DiagramAdapter::new(Arc::clone(&diagram), kind, options.structured.diagram_options()));
	let text_adapter = Arc::new(TextAdapter::new(Arc::clone(&text)));
	let sync = Synchronizer::new(structured, text_adapter, options, handler);
	(sync, diagram, text)
}

pub fn harness(options: SyncOptions) -> Harness {
	let events = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&events);
	let handler: SharedHostHandler = Arc::new(move |event: HostEvent| sink.lock().push(event));
	let (sync, diagram, text) = build(&options, handler);
	Harness {
		sync: Arc::new(sync),
		diagram,
		text,
		events,
	}
}

pub fn process() -> Harness {
	harness(SyncOptions::default())
}

pub fn decision() -> Harness {
	harness(SyncOptions {
		structured: StructuredTabOptions {
			kind: StructuredKind::Decision,
			..Default::default()
		},
		..Default::default()
	})
}

impl Harness {
	/// Loads `content`, drains the queue and forgets the resulting events.
	pub async fn loaded(self, content: &str) -> Self {
		self.sync.set_document(content).await.unwrap();
		self.sync.pump().await;
		self.take();
		self
	}

	/// Removes and returns every recorded event.
	pub fn take(&self) -> Vec<HostEvent> {
		std::mem::take(&mut *self.events.lock())
	}
}

pub fn normalized(events: &[HostEvent]) -> Vec<SyncEvent> {
	events.iter().filter_map(HostEvent::as_normalized).cloned().collect()
}

pub fn raw_names(events: &[HostEvent]) -> Vec<&str> {
	events.iter().filter(|event| event.is_raw()).map(HostEvent::name).collect()
}

pub fn saved(events: &[HostEvent]) -> Vec<(String, ContentSavedReason)> {
	normalized(events)
		.into_iter()
		.filter_map(|event| match event {
			SyncEvent::ContentSaved { content, reason, .. } => Some((content, reason)),
			_ => None,
		})
		.collect()
}

pub fn notifications(events: &[HostEvent]) -> Vec<(String, Severity)> {
	normalized(events)
		.into_iter()
		.filter_map(|event| match event {
			SyncEvent::Notification { message, severity } => Some((message, severity)),
			_ => None,
		})
		.collect()
}

pub fn ui_refreshes(events: &[HostEvent]) -> Vec<bool> {
	normalized(events)
		.into_iter()
		.filter_map(|event| match event {
			SyncEvent::UiRefreshNeeded { is_active } => Some(is_active),
			_ => None,
		})
		.collect()
}
