use std::sync::Arc;

use crate::host::HostEvent;

/// Receiver of every event the synchronizer emits.
///
/// Called synchronously from whichever task drives the synchronizer. Closures
/// of type `Fn(HostEvent)` implement this trait.
pub trait HostEventHandler: Send + Sync {
	fn on_event(&self, event: HostEvent);
}

impl<F> HostEventHandler for F
where
	F: Fn(HostEvent) + Send + Sync,
{
	fn on_event(&self, event: HostEvent) {
		self(event)
	}
}

/// Handler that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpHandler;

impl HostEventHandler for NoOpHandler {
	fn on_event(&self, _event: HostEvent) {}
}

/// Shared, type-erased handler.
pub type SharedHostHandler = Arc<dyn HostEventHandler>;
