use serde::{Deserialize, Serialize};

/// Snapshot of a structured engine's command stack and selection.
///
/// Hosts read this after a UI refresh notification to enable or disable
/// toolbar affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
	pub can_undo: bool,
	pub can_redo: bool,
	/// Index of the last executed command, `None` on an empty stack.
	pub stack_index: Option<usize>,
	pub selection_size: usize,
}
