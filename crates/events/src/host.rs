use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::sync_event::SyncEvent;

/// An engine event forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawEvent {
	#[serde(rename = "event")]
	pub name: String,
	#[serde(rename = "data")]
	pub payload: JsonValue,
}

impl RawEvent {
	pub fn new(name: impl Into<String>, payload: JsonValue) -> Self {
		Self {
			name: name.into(),
			payload,
		}
	}

	/// Event without payload.
	pub fn named(name: impl Into<String>) -> Self {
		Self::new(name, JsonValue::Null)
	}
}

/// Everything a host receives, tagged by source.
///
/// Serializes to `{"source": "modeler" | "engine", "event": .., "data": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source")]
pub enum HostEvent {
	#[serde(rename = "modeler")]
	Normalized(SyncEvent),
	#[serde(rename = "engine")]
	Raw(RawEvent),
}

impl HostEvent {
	pub fn is_raw(&self) -> bool {
		matches!(self, Self::Raw(_))
	}

	pub fn name(&self) -> &str {
		match self {
			Self::Normalized(event) => event.name(),
			Self::Raw(event) => &event.name,
		}
	}

	pub fn as_normalized(&self) -> Option<&SyncEvent> {
		match self {
			Self::Normalized(event) => Some(event),
			Self::Raw(_) => None,
		}
	}
}

impl From<SyncEvent> for HostEvent {
	fn from(event: SyncEvent) -> Self {
		Self::Normalized(event)
	}
}

impl From<RawEvent> for HostEvent {
	fn from(event: RawEvent) -> Self {
		Self::Raw(event)
	}
}
