//! The active-view state machine.
//!
//! The synchronizer owns the live [`Document`], the mirrored view list and
//! the [`SyncPhase`]. Adapters only report facts: raw engine events are
//! queued by the subscribers installed in [`Synchronizer::new`] and folded
//! in by [`Synchronizer::pump`] or [`Synchronizer::run`], so no adapter
//! callback ever re-enters the state machine.
//!
//! Every import and export carries an operation ticket. A completion whose
//! ticket has been superseded is discarded instead of overwriting newer
//! state.

use std::sync::Arc;

use modelsync_adapter::{RawEventHandler, StructuredAdapter, ViewAdapter};
use modelsync_events::{
	AdapterKind, Classification, ContentSavedReason, EngineEvent, HostEvent, RawEvent, SharedHostHandler, SyncEvent, classify_name,
};
use modelsync_primitives::{ActiveView, Document, HistoryState, Severity, View, ViewId};
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use crate::config::SyncOptions;
use crate::error::{Result, SyncError};
use crate::ledger::ContentLedger;
use crate::state::{SyncPhase, Tab};
use crate::token::{OpClock, OpTicket};


const IMPORT_FAILED: &str = "Could not import changed XML. Is it invalid? See console for details.";
const EXPORT_FAILED: &str = "Could not save document. See console for details.";
const TEMPLATES_FAILED: &str = "Importing element templates failed. Check console for details.";

const MAX_FLUSH_ATTEMPTS: u32 = 3;

fn import_warning_message(count: usize) -> String {
	let noun = if count == 1 { "warning" } else { "warnings" };
	format!("Imported with {count} {noun}. See console for details.")
}

/// Leading integer of a split-pane size such as `"312px"`.
fn parse_panel_width(size: &str) -> Option<u32> {
	let size = size.trim_start();
	let end = size.find(|c: char| !c.is_ascii_digit()).unwrap_or(size.len());
	size[..end].parse().ok()
}

/// A raw event tagged with the slot of the adapter that fired it.
struct Inbound {
	tab: Tab,
	event: RawEvent,
}

#[derive(Default)]
struct SyncState {
	phase: SyncPhase,
	document: Option<Document>,
	views: Vec<View>,
	structured_enabled: bool,
	text_enabled: bool,
	structured_ledger: ContentLedger,
	text_ledger: ContentLedger,
	destroyed: bool,
}

impl SyncState {
	fn ledger_mut(&mut self, tab: Tab) -> &mut ContentLedger {
		match tab {
			Tab::Structured => &mut self.structured_ledger,
			Tab::Text => &mut self.text_ledger,
		}
	}

	fn ledger(&self, tab: Tab) -> &ContentLedger {
		match tab {
			Tab::Structured => &self.structured_ledger,
			Tab::Text => &self.text_ledger,
		}
	}

	fn is_enabled(&self, tab: Tab) -> bool {
		match tab {
			Tab::Structured => self.structured_enabled,
			Tab::Text => self.text_enabled,
		}
	}

	fn set_enabled(&mut self, tab: Tab, enabled: bool) {
		match tab {
			Tab::Structured => self.structured_enabled = enabled,
			Tab::Text => self.text_enabled = enabled,
		}
	}
}

/// Reconciles one structured adapter and one text adapter over a single
/// canonical document.
///
/// All methods take `&self`; share it behind an `Arc` to drive
/// [`run`](Self::run) on a separate task.
pub struct Synchronizer {
	structured: Arc<dyn StructuredAdapter>,
	text: Arc<dyn ViewAdapter>,
	structured_kind: AdapterKind,
	handler: SharedHostHandler,
	state: Mutex<SyncState>,
	ops: OpClock,
	inbox: AsyncMutex<mpsc::UnboundedReceiver<Inbound>>,
	subscriptions: Mutex<Vec<(Tab, RawEventHandler)>>,
	shutdown: CancellationToken,
}

impl Synchronizer {
	/// Subscribes to both adapters. Nothing is imported until the first
	/// [`set_document`](Self::set_document).
	pub fn new(structured: Arc<dyn StructuredAdapter>, text: Arc<dyn ViewAdapter>, options: &SyncOptions, handler: SharedHostHandler) -> Self {
		let (tx, rx) = mpsc::unbounded_channel();
		let mut subscriptions = Vec::with_capacity(2);
		for tab in [Tab::Structured, Tab::Text] {
			let tx = tx.clone();
			let subscriber: RawEventHandler = Arc::new(move |event: &RawEvent| {
				let _ = tx.send(Inbound { tab, event: event.clone() });
			});
			let subscribed = match tab {
				Tab::Structured => structured.subscribe(&subscriber),
				Tab::Text => text.subscribe(&subscriber),
			};
			if !subscribed {
				warn!(%tab, "adapter refused subscriber");
			}
			subscriptions.push((tab, subscriber));
		}

		let structured_kind = structured.kind();
		if AdapterKind::from(options.structured.kind) != structured_kind {
			warn!(configured = %AdapterKind::from(options.structured.kind), adapter = %structured_kind, "configured structured kind differs from the adapter");
		}
		let state = SyncState {
			structured_enabled: !options.structured.disabled,
			text_enabled: !options.text.disabled,
			..SyncState::default()
		};
		debug!(kind = %structured_kind, structured = state.structured_enabled, text = state.text_enabled, "synchronizer created");

		Self {
			structured,
			text,
			structured_kind,
			handler,
			state: Mutex::new(state),
			ops: OpClock::default(),
			inbox: AsyncMutex::new(rx),
			subscriptions: Mutex::new(subscriptions),
			shutdown: CancellationToken::new(),
		}
	}

	pub fn phase(&self) -> SyncPhase {
		self.state.lock().phase.clone()
	}

	pub fn active_view(&self) -> Option<ActiveView> {
		self.state.lock().phase.active_view()
	}

	/// Mirrored structured views, in engine order.
	pub fn views(&self) -> Vec<View> {
		self.state.lock().views.clone()
	}

	/// The live document, if any.
	pub fn document(&self) -> Option<Document> {
		self.state.lock().document.clone()
	}

	pub fn is_enabled(&self, tab: Tab) -> bool {
		self.state.lock().is_enabled(tab)
	}

	pub fn is_shut_down(&self) -> bool {
		self.state.lock().destroyed
	}

	/// Undo/redo availability of the structured engine.
	pub fn history(&self) -> HistoryState {
		self.structured.history()
	}

	/// Undoes the last structured command while the diagram is active.
	pub fn undo(&self) {
		if self.phase().tab() == Some(Tab::Structured) {
			self.structured.undo();
		}
	}

	/// Redoes the last undone structured command while the diagram is active.
	pub fn redo(&self) {
		if self.phase().tab() == Some(Tab::Structured) {
			self.structured.redo();
		}
	}

	/// Replaces the live document with host-supplied content.
	///
	/// Only the active adapter is imported, and only when it does not
	/// already hold `content`. Empty content is ignored.
	pub async fn set_document(&self, content: impl Into<String>) -> Result<()> {
		let content = content.into();
		let active = {
			let mut state = self.state.lock();
			if state.destroyed {
				return Err(SyncError::Destroyed);
			}
			if content.is_empty() {
				debug!("empty document ignored");
				return Ok(());
			}
			state.document = Some(Document::new(content));
			state.phase.tab()
		};

		match active {
			Some(tab) => {
				self.reconcile(tab).await;
			}
			None => self.activate_initial().await,
		}
		Ok(())
	}

	/// Makes `target` the active view, flushing the view being left first.
	pub async fn request_view_switch(&self, target: impl Into<ActiveView>) -> Result<()> {
		self.switch_to(target.into()).await
	}

	pub async fn switch_to(&self, target: ActiveView) -> Result<()> {
		let known_view = match &target {
			ActiveView::Text => true,
			ActiveView::Structured(id) => self.structured.views().iter().any(|view| &view.id == id),
		};
		let target_tab = match &target {
			ActiveView::Text => Tab::Text,
			ActiveView::Structured(_) => Tab::Structured,
		};
		let target = SyncPhase::from(target);

		let from = {
			let state = self.state.lock();
			if state.destroyed {
				return Err(SyncError::Destroyed);
			}
			if !state.is_enabled(target_tab) {
				return Err(SyncError::TabDisabled(target_tab));
			}
			if let SyncPhase::StructuredActive(id) = &target
				&& !known_view && !state.views.iter().any(|view| &view.id == id)
			{
				return Err(SyncError::UnknownView(id.clone()));
			}
			if state.phase == target {
				trace!(?target, "view already active");
				return Ok(());
			}
			if state.phase == SyncPhase::Uninitialized && state.document.is_none() {
				return Err(SyncError::NoActiveView);
			}
			state.phase.clone()
		};

		self.transition(from, target).await
	}

	/// Enables or disables the diagram tab.
	pub async fn set_structured_enabled(&self, enabled: bool) -> Result<()> {
		self.set_tab_enabled(Tab::Structured, enabled).await
	}

	/// Enables or disables the text tab.
	pub async fn set_text_enabled(&self, enabled: bool) -> Result<()> {
		self.set_tab_enabled(Tab::Text, enabled).await
	}

	async fn set_tab_enabled(&self, tab: Tab, enabled: bool) -> Result<()> {
		let phase = {
			let mut state = self.state.lock();
			if state.destroyed {
				return Err(SyncError::Destroyed);
			}
			if state.is_enabled(tab) == enabled {
				return Ok(());
			}
			state.set_enabled(tab, enabled);
			state.phase.clone()
		};
		debug!(%tab, enabled, "tab availability changed");

		if enabled {
			let has_document = self.state.lock().document.is_some();
			if phase == SyncPhase::Uninitialized && has_document {
				self.activate_initial().await;
			}
			return Ok(());
		}
		if phase.tab() != Some(tab) {
			return Ok(());
		}

		// The active tab went away: hand input to the other one if possible.
		let handover = match tab.other() {
			Tab::Text if self.is_enabled(Tab::Text) => self.transition(phase.clone(), SyncPhase::TextActive).await,
			Tab::Structured if self.is_enabled(Tab::Structured) => match self.default_structured_view() {
				Some(view) => self.transition(phase.clone(), SyncPhase::StructuredActive(view)).await,
				None => self.reactivate(phase.clone()).await,
			},
			Tab::Text | Tab::Structured => {
				{
					let mut state = self.state.lock();
					if state.phase != phase {
						return Ok(());
					}
					state.phase = SyncPhase::Uninitialized;
				}
				debug!(%tab, "no enabled tab left, deactivated");
				self.deactivate_tab(tab);
				Ok(())
			}
		};

		if let Err(error) = handover {
			// The tab could not be left, so it stays available.
			let mut state = self.state.lock();
			if !state.destroyed && state.phase.tab() == Some(tab) {
				state.set_enabled(tab, true);
			}
			return Err(error);
		}
		Ok(())
	}

	/// Reports the properties panel width from a split-pane size string.
	pub fn panel_resized(&self, size: &str) {
		if self.is_shut_down() {
			return;
		}
		match parse_panel_width(size) {
			Some(width) => self.emit(SyncEvent::PanelResized { width }),
			None => debug!(size, "unparsable panel size ignored"),
		}
	}

	/// Handles every queued raw event, including events fired while doing so.
	///
	/// Returns the number of events handled. Waits while [`run`](Self::run)
	/// owns the queue.
	pub async fn pump(&self) -> usize {
		let mut handled = 0;
		loop {
			let batch: Vec<Inbound> = {
				let mut inbox = self.inbox.lock().await;
				std::iter::from_fn(|| inbox.try_recv().ok()).collect()
			};
			if batch.is_empty() {
				return handled;
			}
			for inbound in batch {
				self.handle(inbound).await;
				handled += 1;
			}
		}
	}

	/// Handles raw events as they arrive until [`shutdown`](Self::shutdown).
	pub async fn run(&self) {
		loop {
			let next = {
				let mut inbox = self.inbox.lock().await;
				tokio::select! {
					() = self.shutdown.cancelled() => None,
					inbound = inbox.recv() => inbound,
				}
			};
			match next {
				Some(inbound) => self.handle(inbound).await,
				None => break,
			}
		}
		debug!("synchronizer event loop stopped");
	}

	/// Unsubscribes from both adapters and releases their engines.
	///
	/// Queued raw events are dropped. Idempotent; also runs on drop.
	pub fn shutdown(&self) {
		let active = {
			let mut state = self.state.lock();
			if state.destroyed {
				return;
			}
			state.destroyed = true;
			state.phase.tab()
		};
		if let Some(tab) = active {
			self.adapter(tab).unbind_input();
		}

		let subscriptions = std::mem::take(&mut *self.subscriptions.lock());
		for (tab, subscriber) in &subscriptions {
			if !self.adapter(*tab).unsubscribe(subscriber) {
				trace!(%tab, "subscriber already removed");
			}
		}
		self.structured.release();
		self.text.release();
		self.shutdown.cancel();

		if let Ok(mut inbox) = self.inbox.try_lock() {
			inbox.close();
			let dropped = std::iter::from_fn(|| inbox.try_recv().ok()).count();
			if dropped > 0 {
				debug!(dropped, "queued raw events dropped on shutdown");
			}
		}
		debug!("synchronizer shut down");
	}

	fn adapter(&self, tab: Tab) -> &dyn ViewAdapter {
		match tab {
			Tab::Structured => self.structured.as_ref(),
			Tab::Text => self.text.as_ref(),
		}
	}

	fn kind_of(&self, tab: Tab) -> AdapterKind {
		match tab {
			Tab::Structured => self.structured_kind,
			Tab::Text => AdapterKind::Text,
		}
	}

	fn emit(&self, event: impl Into<HostEvent>) {
		self.handler.on_event(event.into());
	}

	fn notify(&self, message: impl Into<String>, severity: Severity) {
		self.emit(SyncEvent::notification(message, severity));
	}

	/// Whether a completion for `ticket` may still change state.
	fn is_live(&self, ticket: OpTicket) -> bool {
		if !self.ops.is_current(ticket) {
			debug!(tab = %ticket.tab(), ticket = ticket.id(), "stale completion discarded");
			return false;
		}
		!self.state.lock().destroyed
	}

	fn default_structured_view(&self) -> Option<ViewId> {
		self.structured.active_view().or_else(|| self.structured.views().first().map(|view| view.id.clone()))
	}

	/// Imports the live document into `tab` unless it already holds it.
	///
	/// Returns true when the adapter holds the live document afterwards.
	async fn reconcile(&self, tab: Tab) -> bool {
		let content = {
			let state = self.state.lock();
			let Some(document) = state.document.as_ref() else {
				return false;
			};
			if state.ledger(tab).matches(&document.content) {
				trace!(%tab, "adapter already holds the document");
				return true;
			}
			document.content.clone()
		};

		let ticket = self.ops.issue(tab);
		let result = self.adapter(tab).import(&content, true).await;
		if !self.is_live(ticket) {
			return false;
		}
		match result {
			Ok(outcome) => {
				trace!(%tab, skipped = outcome.skipped, "document imported");
				self.state.lock().ledger_mut(tab).record_import(content);
				if !outcome.warnings.is_empty() {
					warn!(%tab, warnings = ?outcome.warnings, "imported with warnings");
					self.notify(import_warning_message(outcome.warnings.len()), Severity::Warning);
				}
				true
			}
			Err(error) => {
				error!(%tab, %error, "could not import document");
				self.notify(IMPORT_FAILED, Severity::Error);
				false
			}
		}
	}

	/// First activation after a document arrives or a tab is re-enabled.
	async fn activate_initial(&self) {
		let (structured_enabled, text_enabled) = {
			let state = self.state.lock();
			(state.structured_enabled, state.text_enabled)
		};

		if structured_enabled {
			let imported = self.reconcile(Tab::Structured).await;
			let views = self.structured.views();
			let view = self.default_structured_view();
			self.state.lock().views = views;
			match view {
				Some(view) if imported || !text_enabled => {
					self.enter(SyncPhase::StructuredActive(view));
					return;
				}
				Some(_) => debug!("structured import failed, falling back to text"),
				None => debug!("structured engine exposes no view"),
			}
		}

		if text_enabled {
			self.reconcile(Tab::Text).await;
			self.enter(SyncPhase::TextActive);
		}
	}

	/// Leaves `Uninitialized`; there is no prior view to flush.
	fn enter(&self, phase: SyncPhase) {
		{
			let mut state = self.state.lock();
			if state.destroyed || state.phase != SyncPhase::Uninitialized {
				debug!(?phase, "initial activation superseded");
				return;
			}
			state.phase = phase.clone();
		}
		debug!(?phase, "view activated");
		if let Some(tab) = phase.tab() {
			self.activate_tab(tab);
		}
	}

	fn activate_tab(&self, tab: Tab) {
		self.adapter(tab).bind_input();
		if tab == Tab::Structured {
			self.emit(SyncEvent::UiRefreshNeeded { is_active: true });
		}
	}

	fn deactivate_tab(&self, tab: Tab) {
		self.adapter(tab).unbind_input();
		if tab == Tab::Structured {
			self.emit(SyncEvent::UiRefreshNeeded { is_active: false });
		}
	}

	fn open_view(&self, view: &ViewId) {
		if let Err(error) = self.structured.open(view) {
			warn!(%view, %error, "could not open view");
		}
	}

	/// Exports the view being left and reports it to the host.
	///
	/// An export overtaken by a newer one on the same adapter is issued again,
	/// since the adapter still holds the latest content. Returns false if
	/// another transition moved the phase away from `from` meanwhile.
	async fn flush(&self, from: &SyncPhase) -> Result<bool> {
		let Some(tab) = from.tab() else {
			return Ok(true);
		};

		let mut attempts = 0;
		let document = loop {
			attempts += 1;
			let ticket = self.ops.issue(tab);
			let exported = self.adapter(tab).export().await;
			if self.is_shut_down() {
				return Err(SyncError::Destroyed);
			}
			if !self.ops.is_current(ticket) {
				if attempts < MAX_FLUSH_ATTEMPTS {
					debug!(%tab, ticket = ticket.id(), attempts, "flush overtaken by a newer export, retrying");
					continue;
				}
				warn!(%tab, attempts, "flush kept being overtaken");
				return Err(SyncError::FlushFailed(tab));
			}
			match exported {
				Ok(document) => break document,
				Err(error) => {
					error!(%tab, %error, "could not flush view before switching");
					self.notify(EXPORT_FAILED, Severity::Error);
					return Err(SyncError::FlushFailed(tab));
				}
			}
		};

		{
			let mut state = self.state.lock();
			if state.phase != *from {
				debug!(?from, "view switch superseded");
				return Ok(false);
			}
			state.ledger_mut(tab).record_export(document.content.clone(), false);
			state.document = Some(document.clone());
		}
		self.emit(SyncEvent::ContentSaved {
			content: document.content,
			rendered_artifact: document.rendered_artifact,
			reason: ContentSavedReason::ViewSwitched,
		});
		Ok(true)
	}

	/// Flush, flip, open. In that order.
	async fn transition(&self, from: SyncPhase, to: SyncPhase) -> Result<()> {
		let Some(to_tab) = to.tab() else {
			return Ok(());
		};
		let Some(from_tab) = from.tab() else {
			self.reconcile(to_tab).await;
			self.enter(to.clone());
			if let SyncPhase::StructuredActive(view) = &to {
				self.open_view(view);
			}
			return Ok(());
		};

		if !self.flush(&from).await? {
			return Ok(());
		}
		{
			let mut state = self.state.lock();
			if state.destroyed {
				return Err(SyncError::Destroyed);
			}
			if state.phase != from {
				return Ok(());
			}
			state.phase = to.clone();
		}
		debug!(?from, ?to, "active view switched");

		if from_tab != to_tab {
			self.deactivate_tab(from_tab);
			self.reconcile(to_tab).await;
			self.activate_tab(to_tab);
		}
		if let SyncPhase::StructuredActive(view) = &to {
			self.open_view(view);
		}
		Ok(())
	}

	/// Leaves `from` for nothing, then lets first activation pick a view.
	///
	/// Used when the diagram tab is the only one left but has never loaded,
	/// so it has no view to switch to yet.
	async fn reactivate(&self, from: SyncPhase) -> Result<()> {
		if !self.flush(&from).await? {
			return Ok(());
		}
		{
			let mut state = self.state.lock();
			if state.phase != from {
				return Ok(());
			}
			state.phase = SyncPhase::Uninitialized;
		}
		if let Some(tab) = from.tab() {
			self.deactivate_tab(tab);
		}
		self.activate_initial().await;
		Ok(())
	}

	async fn handle(&self, inbound: Inbound) {
		let Inbound { tab, event } = inbound;
		if self.is_shut_down() {
			return;
		}
		let (engine_event, class) = classify_name(self.kind_of(tab), &event.name);
		self.emit(HostEvent::Raw(event.clone()));
		if class.is_empty() {
			trace!(%tab, name = %event.name, "raw event passed through");
			return;
		}

		if tab == Tab::Structured && class.contains(Classification::VIEWS_CHANGED) {
			self.mirror_views();
		}

		if self.state.lock().phase.tab() != Some(tab) {
			trace!(%tab, name = %event.name, "event from inactive adapter");
			return;
		}
		if class.contains(Classification::NOTIFY_ERROR) {
			error!(name = %event.name, payload = %event.payload, "engine reported errors");
			self.notify(TEMPLATES_FAILED, Severity::Error);
		}
		if class.contains(Classification::REFRESH_UI) {
			self.emit(SyncEvent::UiRefreshNeeded { is_active: true });
		}
		if class.contains(Classification::TRIGGER_EXPORT) {
			self.export_active(tab, engine_event == EngineEvent::ImportDone).await;
		}
	}

	/// Folds an engine-initiated view list change into local state.
	fn mirror_views(&self) {
		let views = self.structured.views();
		let reported = self.structured.active_view();
		{
			let mut state = self.state.lock();
			state.views = views.clone();
			let adopt = match (&state.phase, &reported) {
				(SyncPhase::StructuredActive(current), Some(reported)) if current != reported => Some(reported.clone()),
				_ => None,
			};
			if let Some(view) = adopt {
				debug!(%view, "adopting view selected in the engine");
				state.phase = SyncPhase::StructuredActive(view);
			}
		}
		self.emit(SyncEvent::ViewsChanged { views, active_view: reported });
	}

	async fn export_active(&self, tab: Tab, echoes_import: bool) {
		let ticket = self.ops.issue(tab);
		let result = self.adapter(tab).export().await;
		if !self.is_live(ticket) {
			return;
		}
		let document = match result {
			Ok(document) => document,
			Err(error) => {
				error!(%tab, %error, "could not save document");
				self.notify(EXPORT_FAILED, Severity::Error);
				return;
			}
		};
		{
			let mut state = self.state.lock();
			if state.phase.tab() != Some(tab) {
				debug!(%tab, "export finished after the tab was left, discarded");
				return;
			}
			state.ledger_mut(tab).record_export(document.content.clone(), echoes_import);
			state.document = Some(document.clone());
		}

		let reason = match tab {
			Tab::Structured => ContentSavedReason::DiagramEdited,
			Tab::Text => ContentSavedReason::TextEdited,
		};
		self.emit(SyncEvent::ContentSaved {
			content: document.content,
			rendered_artifact: document.rendered_artifact,
			reason,
		});
	}
}

impl Drop for Synchronizer {
	fn drop(&mut self) {
		self.shutdown();
	}
}
