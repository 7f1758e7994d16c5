use std::sync::atomic::{AtomicU64, Ordering};

use crate::state::Tab;

/// Identifies one import or export issued to an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OpTicket {
	tab: Tab,
	id: u64,
}

impl OpTicket {
	pub const fn tab(&self) -> Tab {
		self.tab
	}

	pub const fn id(&self) -> u64 {
		self.id
	}
}

/// Monotonic operation clock, one counter per adapter slot.
///
/// Import and export share a slot's counter: only the latest operation
/// issued to an adapter may fold its result into synchronizer state.
#[derive(Debug, Default)]
pub(crate) struct OpClock {
	structured: AtomicU64,
	text: AtomicU64,
}

impl OpClock {
	fn counter(&self, tab: Tab) -> &AtomicU64 {
		match tab {
			Tab::Structured => &self.structured,
			Tab::Text => &self.text,
		}
	}

	/// Issues the next ticket for `tab`, superseding every earlier one.
	pub fn issue(&self, tab: Tab) -> OpTicket {
		let id = self.counter(tab).fetch_add(1, Ordering::AcqRel).wrapping_add(1);
		OpTicket { tab, id }
	}

	pub fn is_current(&self, ticket: OpTicket) -> bool {
		self.counter(ticket.tab).load(Ordering::Acquire) == ticket.id
	}
}
