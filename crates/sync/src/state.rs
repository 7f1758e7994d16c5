use std::fmt;

use modelsync_primitives::{ActiveView, ViewId};

/// One of the two editor slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
	/// The diagram engine.
	Structured,
	/// The plain text editor.
	Text,
}

impl Tab {
	pub const fn other(self) -> Self {
		match self {
			Self::Structured => Self::Text,
			Self::Text => Self::Structured,
		}
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Structured => "structured",
			Self::Text => "text",
		}
	}
}

impl fmt::Display for Tab {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Active-view state machine.
///
/// ```text
///                 setDocument
/// Uninitialized ─────────────┬──────────────► StructuredActive(view)
///                            └──────────────► TextActive
///
/// TextActive ◄──── switch_to ────► StructuredActive(a) ◄── switch_to ──► StructuredActive(b)
/// ```
///
/// Disabling both tabs returns the machine to `Uninitialized`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SyncPhase {
	/// No document has been activated yet.
	#[default]
	Uninitialized,
	/// The text editor owns input.
	TextActive,
	/// The diagram engine owns input, showing this sub-view.
	StructuredActive(ViewId),
}

impl SyncPhase {
	/// Tab owning input in this phase.
	pub fn tab(&self) -> Option<Tab> {
		match self {
			Self::Uninitialized => None,
			Self::TextActive => Some(Tab::Text),
			Self::StructuredActive(_) => Some(Tab::Structured),
		}
	}

	pub fn active_view(&self) -> Option<ActiveView> {
		match self {
			Self::Uninitialized => None,
			Self::TextActive => Some(ActiveView::Text),
			Self::StructuredActive(id) => Some(ActiveView::Structured(id.clone())),
		}
	}
}

impl From<ActiveView> for SyncPhase {
	fn from(view: ActiveView) -> Self {
		match view {
			ActiveView::Text => Self::TextActive,
			ActiveView::Structured(id) => Self::StructuredActive(id),
		}
	}
}
