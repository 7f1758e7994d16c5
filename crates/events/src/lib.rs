//! Event vocabulary for the model synchronizer.
//!
//! Editor engines fire events under free-form string names. This crate turns
//! those names into a closed [`EngineEvent`] enumeration, classifies them per
//! [`AdapterKind`] into a [`Classification`] bit set, and defines the typed
//! [`SyncEvent`]s a host receives.
//!
//! ```text
//! engine "commandStack.changed" ──▶ EngineEvent::CommandStackChanged
//!                                        │ classify(Process, ..)
//!                                        ▼
//!                        REFRESH_UI | TRIGGER_EXPORT
//! ```
//!
//! Names no table knows land in [`EngineEvent::Unclassified`] and classify
//! to the empty set. They still reach the host verbatim as [`RawEvent`]s.

mod classify;
mod engine;
mod handler;
mod host;
mod kind;
mod sync_event;

pub use classify::{Classification, classify, classify_name};
pub use engine::EngineEvent;
pub use handler::{HostEventHandler, NoOpHandler, SharedHostHandler};
pub use host::{HostEvent, RawEvent};
pub use kind::{AdapterKind, StructuredKind};
pub use serde_json::Value as JsonValue;
pub use sync_event::{ContentSavedReason, SyncEvent};
