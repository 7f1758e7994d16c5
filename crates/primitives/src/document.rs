use serde::{Deserialize, Serialize};

/// One logical document as seen by every editor view.
///
/// `content` is the single source of truth. `rendered_artifact` is a
/// best-effort byproduct (an SVG rendering) that only structured engines
/// produce, and only when rendering succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
	/// Canonical text serialization.
	pub content: String,
	/// Optional rendering derived from `content`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rendered_artifact: Option<String>,
}

impl Document {
	/// Creates a document without a rendered artifact.
	pub fn new(content: impl Into<String>) -> Self {
		Self {
			content: content.into(),
			rendered_artifact: None,
		}
	}

	/// Attaches a rendered artifact.
	pub fn with_artifact(mut self, artifact: impl Into<String>) -> Self {
		self.rendered_artifact = Some(artifact.into());
		self
	}

	/// Returns true when the document carries no content at all.
	pub fn is_empty(&self) -> bool {
		self.content.is_empty()
	}
}
