use std::fmt;
use std::sync::Arc;

use modelsync_events::RawEvent;
use parking_lot::RwLock;

/// External listener for raw engine events.
///
/// Identity is the `Arc` allocation: registering the same handle twice is a
/// no-op, and unregistering needs the handle that was registered.
pub type RawEventHandler = Arc<dyn Fn(&RawEvent) + Send + Sync>;

/// Adapter-owned subscriber list with set semantics.
#[derive(Default)]
pub struct EventTap {
	subscribers: RwLock<Vec<RawEventHandler>>,
}

impl EventTap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `handler`. Returns false if it was already registered.
	pub fn subscribe(&self, handler: &RawEventHandler) -> bool {
		let mut subscribers = self.subscribers.write();
		if subscribers.iter().any(|existing| Arc::ptr_eq(existing, handler)) {
			return false;
		}
		subscribers.push(Arc::clone(handler));
		true
	}

	/// Unregisters `handler`. Returns false if it was not registered.
	pub fn unsubscribe(&self, handler: &RawEventHandler) -> bool {
		let mut subscribers = self.subscribers.write();
		let before = subscribers.len();
		subscribers.retain(|existing| !Arc::ptr_eq(existing, handler));
		subscribers.len() != before
	}

	/// Replays `event` to every subscriber, in registration order.
	///
	/// The list is snapshotted first so handlers may (un)subscribe while
	/// being called.
	pub fn fire(&self, event: &RawEvent) {
		let subscribers = self.subscribers.read().clone();
		for subscriber in &subscribers {
			subscriber(event);
		}
	}

	pub fn len(&self) -> usize {
		self.subscribers.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.subscribers.read().is_empty()
	}

	pub fn clear(&self) {
		self.subscribers.write().clear();
	}
}

impl fmt::Debug for EventTap {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventTap").field("subscribers", &self.len()).finish()
	}
}
