//! Synchronizer configuration.
//!
//! ```toml
//! [structured]
//! disabled = false
//! kind = "decision"
//! format_on_export = true
//! render_artifact = true
//!
//! [text]
//! disabled = false
//! ```
//!
//! Every key is optional. Unknown keys are rejected.

use std::path::Path;

use modelsync_adapter::DiagramOptions;
use modelsync_events::StructuredKind;
use serde::Deserialize;

use crate::error::ConfigError;

/// Options for one synchronizer instance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncOptions {
	pub structured: StructuredTabOptions,
	pub text: TextTabOptions,
}

/// The diagram tab.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StructuredTabOptions {
	/// Start with the tab disabled.
	pub disabled: bool,
	/// Engine family of the structured adapter. Decides whether a rendered
	/// artifact is attempted; events are classified by the adapter's own kind.
	pub kind: StructuredKind,
	/// Pretty-print on export.
	pub format_on_export: bool,
	/// Attempt a rendered artifact on export. Only process engines can render.
	pub render_artifact: bool,
}

impl Default for StructuredTabOptions {
	fn default() -> Self {
		Self {
			disabled: false,
			kind: StructuredKind::Process,
			format_on_export: true,
			render_artifact: true,
		}
	}
}

impl StructuredTabOptions {
	/// Export options for the diagram adapter.
	pub fn diagram_options(&self) -> DiagramOptions {
		DiagramOptions {
			format: self.format_on_export,
			render_artifact: self.render_artifact && self.kind == StructuredKind::Process,
		}
	}
}

/// The text tab.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextTabOptions {
	/// Start with the tab disabled.
	pub disabled: bool,
}

impl SyncOptions {
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// Reads and parses a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}
}
