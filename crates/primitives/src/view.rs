use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Selector string naming the text view in host requests.
pub const TEXT_VIEW: &str = "text";

/// Identifier of a sub-view inside a structured engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(String);

impl ViewId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ViewId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ViewId {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

impl From<String> for ViewId {
	fn from(value: String) -> Self {
		Self(value)
	}
}

/// What a structured sub-view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewKind {
	/// The single canvas of a process diagram.
	Primary,
	/// Decision requirements graph.
	Drd,
	DecisionTable,
	LiteralExpression,
}

/// One sub-view exposed by a structured engine.
///
/// Views are created and destroyed by the engine as the document changes;
/// the synchronizer only mirrors the current list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
	pub id: ViewId,
	/// Name as written in the document. May be empty.
	pub name: String,
	#[serde(rename = "type")]
	pub kind: ViewKind,
}

impl View {
	pub fn new(id: impl Into<ViewId>, name: impl Into<String>, kind: ViewKind) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			kind,
		}
	}

	/// Name suitable for a tab label, falling back to `"Unnamed"`.
	pub fn display_name(&self) -> &str {
		if self.name.is_empty() { "Unnamed" } else { &self.name }
	}
}

/// The view a user is currently looking at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActiveView {
	/// The plain-text source editor.
	Text,
	/// A sub-view of the structured engine.
	Structured(ViewId),
}

impl ActiveView {
	pub fn is_text(&self) -> bool {
		matches!(self, Self::Text)
	}

	/// Structured view id, if any.
	pub fn view_id(&self) -> Option<&ViewId> {
		match self {
			Self::Text => None,
			Self::Structured(id) => Some(id),
		}
	}
}

impl fmt::Display for ActiveView {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text => f.write_str(TEXT_VIEW),
			Self::Structured(id) => write!(f, "{id}"),
		}
	}
}

impl FromStr for ActiveView {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(s.into())
	}
}

impl From<&str> for ActiveView {
	fn from(value: &str) -> Self {
		if value == TEXT_VIEW {
			Self::Text
		} else {
			Self::Structured(ViewId::from(value))
		}
	}
}

impl From<ViewId> for ActiveView {
	fn from(value: ViewId) -> Self {
		Self::Structured(value)
	}
}
