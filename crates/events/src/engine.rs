use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Every lifecycle event name the wrapped engines document, plus a catch-all.
///
/// Parsing never fails: an unknown name becomes [`EngineEvent::Unclassified`]
/// carrying the original string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, EnumIter, IntoStaticStr)]
pub enum EngineEvent {
	#[strum(serialize = "import.done")]
	ImportDone,
	#[strum(serialize = "saveXML.done")]
	SaveDone,
	#[strum(serialize = "attach")]
	Attach,
	#[strum(serialize = "commandStack.changed")]
	CommandStackChanged,
	#[strum(serialize = "selection.changed")]
	SelectionChanged,
	#[strum(serialize = "elements.copied")]
	ElementsCopied,
	#[strum(serialize = "propertiesPanel.focusin")]
	PropertiesPanelFocusIn,
	#[strum(serialize = "propertiesPanel.focusout")]
	PropertiesPanelFocusOut,
	#[strum(serialize = "directEditing.activate")]
	DirectEditingActivate,
	#[strum(serialize = "directEditing.deactivate")]
	DirectEditingDeactivate,
	#[strum(serialize = "searchPad.opened")]
	SearchPadOpened,
	#[strum(serialize = "searchPad.closed")]
	SearchPadClosed,
	#[strum(serialize = "elementTemplates.errors")]
	ElementTemplatesErrors,
	#[strum(serialize = "views.changed")]
	ViewsChanged,
	#[strum(serialize = "view.contentChanged")]
	ViewContentChanged,
	#[strum(serialize = "view.selectionChanged")]
	ViewSelectionChanged,
	#[strum(serialize = "view.directEditingChanged")]
	ViewDirectEditingChanged,
	/// Text editor content changed through user input.
	#[strum(serialize = "content.changed")]
	ContentChanged,
	/// Any name no table knows.
	#[strum(default)]
	Unclassified(String),
}

impl EngineEvent {
	/// Parses an engine event name.
	pub fn parse(name: &str) -> Self {
		match name.parse() {
			Ok(event) => event,
			Err(_) => Self::Unclassified(name.to_string()),
		}
	}

	/// The engine-side name of this event.
	pub fn name(&self) -> &str {
		match self {
			Self::Unclassified(name) => name.as_str(),
			known => <&'static str>::from(known),
		}
	}

	pub fn is_unclassified(&self) -> bool {
		matches!(self, Self::Unclassified(_))
	}
}
