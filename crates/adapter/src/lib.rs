//! View adapters: the only way the synchronizer talks to an editor engine.
//!
//! An adapter wraps one third-party engine (a diagram modeler or a text
//! editor) behind the [`ViewAdapter`] capability interface. Diagram adapters
//! additionally implement [`StructuredAdapter`] for their sub-views.
//!
//! ```text
//! Synchronizer ──import/export──▶ DiagramAdapter<E> ──set_listener──▶ DiagramEngine
//!      ▲                          TextAdapter<E>                      TextEngine
//!      └────── RawEvent ◀── EventTap ◀──────── every fired event ─────────┘
//! ```
//!
//! Engines expose their private event bus through a single listener slot.
//! The adapter installs a pass-through there that replays every fired event,
//! unaltered, to its own [`EventTap`] subscribers.

mod adapter;
mod diagram;
mod engine;
mod error;
pub mod memory;
mod tap;
mod text;

pub use adapter::{ImportOutcome, StructuredAdapter, ViewAdapter};
pub use diagram::{DiagramAdapter, DiagramOptions};
pub use engine::{DiagramEngine, EngineListener, TextEngine};
pub use error::{EngineError, ExportError, ImportError, OpenError, RenderArtifactError};
pub use tap::{EventTap, RawEventHandler};
pub use text::TextAdapter;
