//! Value types shared across the model synchronizer crates.
//!
//! Nothing in here talks to an editor engine. These are the plain facts that
//! adapters report and the synchronizer folds into its own state.

/// The canonical document and its derived artifact.
pub mod document;
/// Undo/redo and selection summary reported by structured engines.
pub mod history;
/// Notification severities.
pub mod severity;
/// Sub-views exposed by structured engines and the active-view selector.
pub mod view;

pub use document::Document;
pub use history::HistoryState;
pub use severity::Severity;
pub use view::{ActiveView, TEXT_VIEW, View, ViewId, ViewKind};
