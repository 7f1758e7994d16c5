/// What an adapter is known to hold.
///
/// `imported` is the content last loaded into the engine. It stays an alias
/// of the engine state only until the engine produces content of its own; an
/// export that merely echoes an import keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ContentLedger {
	imported: Option<String>,
	exported: Option<String>,
}

impl ContentLedger {
	/// Whether importing `content` would be a no-op.
	pub fn matches(&self, content: &str) -> bool {
		self.imported.as_deref() == Some(content) || self.exported.as_deref() == Some(content)
	}

	pub fn record_import(&mut self, content: String) {
		self.imported = Some(content);
		self.exported = None;
	}

	pub fn record_export(&mut self, content: String, echoes_import: bool) {
		if !echoes_import {
			self.imported = None;
		}
		self.exported = Some(content);
	}
}
