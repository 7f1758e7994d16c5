use std::fmt;

use serde::{Deserialize, Serialize};

/// Which structured engine a structured adapter wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuredKind {
	/// Process-flow modeler: one canvas, supports SVG rendering.
	#[default]
	Process,
	/// Decision modeler: several named views, no rendering.
	Decision,
}

/// Kind of engine behind an adapter. Selects the classification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterKind {
	Process,
	Decision,
	Text,
}

impl AdapterKind {
	pub const fn is_structured(self) -> bool {
		!matches!(self, Self::Text)
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Process => "process",
			Self::Decision => "decision",
			Self::Text => "text",
		}
	}
}

impl From<StructuredKind> for AdapterKind {
	fn from(kind: StructuredKind) -> Self {
		match kind {
			StructuredKind::Process => Self::Process,
			StructuredKind::Decision => Self::Decision,
		}
	}
}

impl fmt::Display for AdapterKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
