#![cfg_attr(test, allow(unused_crate_dependencies))]

//! Multi-view document synchronization.
//!
//! A [`Synchronizer`] keeps a diagram engine and a text editor in agreement
//! over one canonical document:
//!
//! ```text
//! host ──set_document / switch_to──► Synchronizer ──import/export──► adapters
//!  ▲                                      │  ▲                          │
//!  └──────── HostEvent (normalized+raw) ──┘  └──── raw engine events ───┘
//! ```
//!
//! Only the active adapter accepts input, so only its edits are exported.
//! Leaving a view always flushes it first, and the host sees that flush
//! before anything else about the switch.

mod config;
mod error;
mod ledger;
mod state;
mod synchronizer;
mod token;

pub use config::{StructuredTabOptions, SyncOptions, TextTabOptions};
pub use error::{ConfigError, Result, SyncError};
pub use state::{SyncPhase, Tab};
pub use synchronizer::Synchronizer;
