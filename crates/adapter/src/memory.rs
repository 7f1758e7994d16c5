//! In-memory engines for headless use and tests.
//!
//! They follow the engine contracts closely enough to drive a synchronizer
//! end to end: events fire through the installed listener with the names
//! the real widgets use, failed imports leave prior state untouched, and
//! saving returns exactly what was loaded.
//!
//! Content must look like markup (`<` .. `>` after trimming) or the import
//! is rejected. Every `unsupported=` attribute produces one import warning.
//! Decision engines derive one `drd` view plus one decision table per
//! `<decision id=".." name="..">` element.

use async_trait::async_trait;
use modelsync_events::StructuredKind;
use modelsync_primitives::{HistoryState, View, ViewId, ViewKind};
use parking_lot::Mutex;
use serde_json::{Value as JsonValue, json};

use crate::engine::{DiagramEngine, EngineListener, TextEngine};
use crate::error::EngineError;

#[derive(Default)]
struct DiagramModel {
	content: Option<String>,
	views: Vec<View>,
	active: Option<ViewId>,
	undo: Vec<String>,
	redo: Vec<String>,
	selection: usize,
	imports: Vec<String>,
	opens: Vec<ViewId>,
	keyboard_bound: bool,
	keyboard_binds: usize,
	fail_save: bool,
	fail_render: bool,
	destroyed: bool,
}

/// Diagram engine holding its document in memory.
pub struct MemoryDiagramEngine {
	kind: StructuredKind,
	model: Mutex<DiagramModel>,
	listener: Mutex<Option<EngineListener>>,
}

impl MemoryDiagramEngine {
	pub fn new(kind: StructuredKind) -> Self {
		Self {
			kind,
			model: Mutex::new(DiagramModel::default()),
			listener: Mutex::new(None),
		}
	}

	/// Every content passed to `import`, including rejected ones.
	pub fn imports(&self) -> Vec<String> {
		self.model.lock().imports.clone()
	}

	pub fn content(&self) -> Option<String> {
		self.model.lock().content.clone()
	}

	/// Views passed to `open`, in call order.
	pub fn opens(&self) -> Vec<ViewId> {
		self.model.lock().opens.clone()
	}

	pub fn is_keyboard_bound(&self) -> bool {
		self.model.lock().keyboard_bound
	}

	pub fn keyboard_binds(&self) -> usize {
		self.model.lock().keyboard_binds
	}

	pub fn is_destroyed(&self) -> bool {
		self.model.lock().destroyed
	}

	pub fn has_listener(&self) -> bool {
		self.listener.lock().is_some()
	}

	pub fn set_save_failure(&self, fail: bool) {
		self.model.lock().fail_save = fail;
	}

	pub fn set_render_failure(&self, fail: bool) {
		self.model.lock().fail_render = fail;
	}

	pub fn set_selection(&self, size: usize) {
		self.model.lock().selection = size;
		self.fire("selection.changed", json!({ "size": size }));
	}

	/// Simulates a user command that rewrites the diagram.
	pub fn apply_edit(&self, content: impl Into<String>) {
		{
			let mut model = self.model.lock();
			let previous = model.content.replace(content.into());
			if let Some(previous) = previous {
				model.undo.push(previous);
			}
			model.redo.clear();
		}
		self.fire_content_changed();
	}

	/// Simulates the user picking another sub-view inside the engine.
	///
	/// Returns false if no such view exists.
	pub fn select_view(&self, view: &ViewId) -> bool {
		{
			let mut model = self.model.lock();
			if !model.views.iter().any(|candidate| &candidate.id == view) {
				return false;
			}
			model.active = Some(view.clone());
		}
		self.fire_views_changed();
		true
	}

	/// Fires an arbitrary event on the engine bus.
	pub fn fire(&self, name: &str, payload: JsonValue) {
		let listener = self.listener.lock().clone();
		if let Some(listener) = listener {
			listener(name, &payload);
		}
	}

	fn fire_content_changed(&self) {
		match self.kind {
			StructuredKind::Process => self.fire("commandStack.changed", JsonValue::Null),
			StructuredKind::Decision => self.fire("view.contentChanged", JsonValue::Null),
		}
	}

	fn fire_views_changed(&self) {
		if self.kind != StructuredKind::Decision {
			return;
		}
		let payload = {
			let model = self.model.lock();
			json!({ "views": model.views, "activeView": model.active })
		};
		self.fire("views.changed", payload);
	}

	fn derive_views(&self, content: &str) -> Vec<View> {
		match self.kind {
			StructuredKind::Process => vec![View::new("process", "Process", ViewKind::Primary)],
			StructuredKind::Decision => {
				let drd_id = content
					.split("<definitions")
					.nth(1)
					.and_then(|tag| attribute(tag, "id"))
					.unwrap_or_else(|| "drd".to_string());
				let mut views = vec![View::new(drd_id, "", ViewKind::Drd)];
				for tag in content.split("<decision ").skip(1) {
					if let Some(id) = attribute(tag, "id") {
						let name = attribute(tag, "name").unwrap_or_default();
						views.push(View::new(id, name, ViewKind::DecisionTable));
					}
				}
				views
			}
		}
	}
}

#[async_trait]
impl DiagramEngine for MemoryDiagramEngine {
	async fn import(&self, content: &str, open: bool) -> Result<Vec<String>, EngineError> {
		self.model.lock().imports.push(content.to_string());
		check_markup(content)?;

		let warnings = (1..=content.matches("unsupported=").count())
			.map(|n| format!("unsupported attribute #{n} ignored"))
			.collect::<Vec<_>>();
		let views = self.derive_views(content);
		{
			let mut model = self.model.lock();
			model.content = Some(content.to_string());
			model.undo.clear();
			model.redo.clear();
			model.selection = 0;
			let keep_active = !open && model.active.as_ref().is_some_and(|id| views.iter().any(|view| &view.id == id));
			if !keep_active {
				model.active = views.first().map(|view| view.id.clone());
			}
			model.views = views;
		}

		self.fire("import.done", json!({ "warnings": warnings }));
		self.fire_views_changed();
		Ok(warnings)
	}

	async fn save(&self, _format: bool) -> Result<String, EngineError> {
		let content = {
			let model = self.model.lock();
			if model.destroyed {
				return Err(EngineError::new("engine destroyed"));
			}
			if model.fail_save {
				return Err(EngineError::new("serializer failed"));
			}
			model.content.clone().ok_or_else(|| EngineError::new("no definitions loaded"))?
		};
		self.fire("saveXML.done", json!({ "xml": content }));
		Ok(content)
	}

	async fn render_svg(&self) -> Result<String, EngineError> {
		let model = self.model.lock();
		if self.kind == StructuredKind::Decision {
			return Err(EngineError::new("rendering not supported"));
		}
		if model.fail_render {
			return Err(EngineError::new("canvas not attached"));
		}
		let content = model.content.as_deref().ok_or_else(|| EngineError::new("no definitions loaded"))?;
		Ok(format!("<svg data-source-len=\"{}\"/>", content.len()))
	}

	fn views(&self) -> Vec<View> {
		self.model.lock().views.clone()
	}

	fn active_view(&self) -> Option<ViewId> {
		self.model.lock().active.clone()
	}

	fn open(&self, view: &ViewId) -> Result<(), EngineError> {
		{
			let mut model = self.model.lock();
			if !model.views.iter().any(|candidate| &candidate.id == view) {
				return Err(EngineError::new(format!("no view {view}")));
			}
			model.active = Some(view.clone());
			model.opens.push(view.clone());
		}
		self.fire_views_changed();
		Ok(())
	}

	fn bind_keyboard(&self) {
		let mut model = self.model.lock();
		model.keyboard_bound = true;
		model.keyboard_binds += 1;
	}

	fn unbind_keyboard(&self) {
		self.model.lock().keyboard_bound = false;
	}

	fn history(&self) -> HistoryState {
		let model = self.model.lock();
		HistoryState {
			can_undo: !model.undo.is_empty(),
			can_redo: !model.redo.is_empty(),
			stack_index: model.undo.len().checked_sub(1),
			selection_size: model.selection,
		}
	}

	fn undo(&self) {
		let changed = {
			let mut model = self.model.lock();
			match model.undo.pop() {
				Some(previous) => {
					if let Some(current) = model.content.replace(previous) {
						model.redo.push(current);
					}
					true
				}
				None => false,
			}
		};
		if changed {
			self.fire_content_changed();
		}
	}

	fn redo(&self) {
		let changed = {
			let mut model = self.model.lock();
			match model.redo.pop() {
				Some(next) => {
					if let Some(current) = model.content.replace(next) {
						model.undo.push(current);
					}
					true
				}
				None => false,
			}
		};
		if changed {
			self.fire_content_changed();
		}
	}

	fn set_listener(&self, listener: Option<EngineListener>) {
		*self.listener.lock() = listener;
	}

	fn destroy(&self) {
		self.model.lock().destroyed = true;
		*self.listener.lock() = None;
	}
}

#[derive(Default)]
struct TextModel {
	value: String,
	replacements: Vec<String>,
	keyboard_bound: bool,
	disposed: bool,
}

/// Text editor holding its buffer in memory.
#[derive(Default)]
pub struct MemoryTextEngine {
	model: Mutex<TextModel>,
	listener: Mutex<Option<EngineListener>>,
}

impl MemoryTextEngine {
	pub fn new() -> Self {
		Self::default()
	}

	/// Simulates the user replacing the buffer by typing.
	pub fn type_text(&self, value: impl Into<String>) {
		let value = value.into();
		let length = value.len();
		self.model.lock().value = value;
		let listener = self.listener.lock().clone();
		if let Some(listener) = listener {
			listener("content.changed", &json!({ "length": length }));
		}
	}

	/// Every value passed to `set_value`.
	pub fn replacements(&self) -> Vec<String> {
		self.model.lock().replacements.clone()
	}

	pub fn is_keyboard_bound(&self) -> bool {
		self.model.lock().keyboard_bound
	}

	pub fn is_disposed(&self) -> bool {
		self.model.lock().disposed
	}

	pub fn has_listener(&self) -> bool {
		self.listener.lock().is_some()
	}
}

impl TextEngine for MemoryTextEngine {
	fn value(&self) -> String {
		self.model.lock().value.clone()
	}

	fn set_value(&self, value: &str) {
		let mut model = self.model.lock();
		model.value = value.to_string();
		model.replacements.push(value.to_string());
	}

	fn bind_keyboard(&self) {
		self.model.lock().keyboard_bound = true;
	}

	fn unbind_keyboard(&self) {
		self.model.lock().keyboard_bound = false;
	}

	fn set_listener(&self, listener: Option<EngineListener>) {
		*self.listener.lock() = listener;
	}

	fn dispose(&self) {
		self.model.lock().disposed = true;
		*self.listener.lock() = None;
	}
}

fn check_markup(content: &str) -> Result<(), EngineError> {
	let trimmed = content.trim();
	if trimmed.starts_with('<') && trimmed.ends_with('>') {
		Ok(())
	} else {
		Err(EngineError::new("unparsable content: expected markup"))
	}
}

/// Value of `key="..."` inside the first tag of `tag`.
fn attribute(tag: &str, key: &str) -> Option<String> {
	let tag = tag.split('>').next()?;
	let needle = format!(" {key}=\"");
	let padded = format!(" {tag}");
	let start = padded.find(&needle)? + needle.len();
	let len = padded[start..].find('"')?;
	Some(padded[start..start + len].to_string())
}
