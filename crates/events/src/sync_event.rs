use modelsync_primitives::{Severity, View, ViewId};
use serde::Serialize;

/// Why a [`SyncEvent::ContentSaved`] was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContentSavedReason {
	/// The user edited the diagram in the structured engine.
	#[serde(rename = "diagram.changed")]
	DiagramEdited,
	/// The user edited the text in the text editor.
	#[serde(rename = "text.changed")]
	TextEdited,
	/// The user left a view; its latest content is flushed before the switch.
	#[serde(rename = "view.changed")]
	ViewSwitched,
}

/// Normalized notification delivered to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all_fields = "camelCase")]
pub enum SyncEvent {
	/// The document content changed.
	#[serde(rename = "content.saved")]
	ContentSaved {
		content: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		rendered_artifact: Option<String>,
		reason: ContentSavedReason,
	},
	/// The structured engine's view list or active view changed.
	#[serde(rename = "views.changed")]
	ViewsChanged { views: Vec<View>, active_view: Option<ViewId> },
	/// Host UI depending on structured engine state must refresh.
	#[serde(rename = "ui.update.required")]
	UiRefreshNeeded {
		/// Whether the structured tab is the active one.
		is_active: bool,
	},
	/// Message the host may show to the user.
	#[serde(rename = "notification")]
	Notification { message: String, severity: Severity },
	/// Properties panel width in pixels.
	#[serde(rename = "properties.panel.resized")]
	PanelResized { width: u32 },
}

impl SyncEvent {
	pub fn notification(message: impl Into<String>, severity: Severity) -> Self {
		Self::Notification {
			message: message.into(),
			severity,
		}
	}

	/// Wire name of this event.
	pub const fn name(&self) -> &'static str {
		match self {
			Self::ContentSaved { .. } => "content.saved",
			Self::ViewsChanged { .. } => "views.changed",
			Self::UiRefreshNeeded { .. } => "ui.update.required",
			Self::Notification { .. } => "notification",
			Self::PanelResized { .. } => "properties.panel.resized",
		}
	}
}
