//! Per-engine classification tables.
//!
//! The structured tables are exhaustive matches over [`EngineEvent`], so
//! adding a vocabulary entry forces a decision for both diagram engines.

use crate::engine::EngineEvent;
use crate::kind::AdapterKind;

bitflags::bitflags! {
	/// What the synchronizer should do in response to one engine event.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct Classification: u8 {
		/// Host UI that mirrors engine state (toolbars, menus) must refresh.
		const REFRESH_UI = 1 << 0;
		/// The document changed inside the engine; export it.
		const TRIGGER_EXPORT = 1 << 1;
		/// The engine's view list or active view changed.
		const VIEWS_CHANGED = 1 << 2;
		/// The engine reported a failure the user should see.
		const NOTIFY_ERROR = 1 << 3;
	}
}

/// Classifies `event` for an engine of the given kind.
pub fn classify(kind: AdapterKind, event: &EngineEvent) -> Classification {
	match kind {
		AdapterKind::Process => process(event),
		AdapterKind::Decision => decision(event),
		AdapterKind::Text => text(event),
	}
}

/// Parses and classifies a raw engine event name.
pub fn classify_name(kind: AdapterKind, name: &str) -> (EngineEvent, Classification) {
	let event = EngineEvent::parse(name);
	let class = classify(kind, &event);
	(event, class)
}

fn process(event: &EngineEvent) -> Classification {
	use EngineEvent::*;
	match event {
		ImportDone | CommandStackChanged => Classification::REFRESH_UI | Classification::TRIGGER_EXPORT,
		SaveDone
		| SelectionChanged
		| Attach
		| ElementsCopied
		| PropertiesPanelFocusIn
		| PropertiesPanelFocusOut
		| DirectEditingActivate
		| DirectEditingDeactivate
		| SearchPadClosed
		| SearchPadOpened => Classification::REFRESH_UI,
		ElementTemplatesErrors => Classification::NOTIFY_ERROR,
		ViewsChanged | ViewContentChanged | ViewSelectionChanged | ViewDirectEditingChanged | ContentChanged | Unclassified(_) => {
			Classification::empty()
		}
	}
}

fn decision(event: &EngineEvent) -> Classification {
	use EngineEvent::*;
	match event {
		ImportDone | ViewContentChanged => Classification::REFRESH_UI | Classification::TRIGGER_EXPORT,
		ViewsChanged => Classification::REFRESH_UI | Classification::VIEWS_CHANGED,
		SaveDone | Attach | ViewSelectionChanged | ViewDirectEditingChanged | PropertiesPanelFocusIn | PropertiesPanelFocusOut => {
			Classification::REFRESH_UI
		}
		CommandStackChanged
		| SelectionChanged
		| ElementsCopied
		| DirectEditingActivate
		| DirectEditingDeactivate
		| SearchPadOpened
		| SearchPadClosed
		| ElementTemplatesErrors
		| ContentChanged
		| Unclassified(_) => Classification::empty(),
	}
}

fn text(event: &EngineEvent) -> Classification {
	match event {
		EngineEvent::ContentChanged => Classification::TRIGGER_EXPORT,
		_ => Classification::empty(),
	}
}
