use std::sync::{Arc, OnceLock, Weak};
use std::time::Duration;

use modelsync::{SyncError, SyncOptions, SyncPhase, Synchronizer, Tab};
use modelsync_events::{ContentSavedReason, HostEvent, SharedHostHandler, SyncEvent};
use modelsync_primitives::{ActiveView, Severity, ViewId};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use crate::common::{MODEL_A, MODEL_B, build, harness, notifications, process, saved, ui_refreshes};

#[tokio::test]
async fn flush_is_seen_before_the_phase_flips() {
	let phases = Arc::new(Mutex::new(Vec::new()));
	let slot: Arc<OnceLock<Weak<Synchronizer>>> = Arc::new(OnceLock::new());
	let handler: SharedHostHandler = {
		let phases = Arc::clone(&phases);
		let slot = Arc::clone(&slot);
		Arc::new(move |event: HostEvent| {
			if let Some(SyncEvent::ContentSaved {
				reason: ContentSavedReason::ViewSwitched,
				..
			}) = event.as_normalized()
				&& let Some(sync) = slot.get().and_then(Weak::upgrade)
			{
				phases.lock().push(sync.phase());
			}
		})
	};
	let (sync, _diagram, _text) = build(&SyncOptions::default(), handler);
	let sync = Arc::new(sync);
	let _ = slot.set(Arc::downgrade(&sync));

	sync.set_document(MODEL_A).await.unwrap();
	sync.switch_to(ActiveView::Text).await.unwrap();

	assert_eq!(*phases.lock(), vec![SyncPhase::StructuredActive(ViewId::new("process"))]);
	assert_eq!(sync.phase(), SyncPhase::TextActive);
}

#[tokio::test]
async fn disabling_the_active_diagram_moves_to_text() {
	let h = process().loaded(MODEL_A).await;
	h.sync.set_structured_enabled(false).await.unwrap();

	let events = h.take();
	assert_eq!(saved(&events), vec![(MODEL_A.to_string(), ContentSavedReason::ViewSwitched)]);
	assert_eq!(ui_refreshes(&events), vec![false]);
	assert_eq!(h.sync.phase(), SyncPhase::TextActive);
	assert!(!h.sync.is_enabled(Tab::Structured));

	h.sync.set_structured_enabled(true).await.unwrap();
	assert_eq!(h.sync.phase(), SyncPhase::TextActive);
}

#[tokio::test]
async fn disabling_both_tabs_deactivates_until_one_returns() {
	let h = process().loaded(MODEL_A).await;
	h.sync.set_text_enabled(false).await.unwrap();
	h.sync.set_structured_enabled(false).await.unwrap();

	assert_eq!(h.sync.phase(), SyncPhase::Uninitialized);
	assert!(!h.diagram.is_keyboard_bound());
	assert_eq!(ui_refreshes(&h.take()), vec![false]);

	h.sync.set_structured_enabled(true).await.unwrap();
	assert_eq!(h.sync.phase(), SyncPhase::StructuredActive(ViewId::new("process")));
	assert_eq!(h.diagram.imports().len(), 1);
	assert_eq!(h.sync.switch_to(ActiveView::Text).await, Err(SyncError::TabDisabled(Tab::Text)));
}

#[tokio::test]
async fn diagram_takes_over_when_text_is_disabled_before_first_load() {
	let mut options = SyncOptions::default();
	options.structured.disabled = true;
	let h = harness(options);
	h.sync.set_document(MODEL_A).await.unwrap();
	h.sync.set_structured_enabled(true).await.unwrap();
	assert_eq!(h.sync.phase(), SyncPhase::TextActive);
	h.take();

	h.sync.set_text_enabled(false).await.unwrap();

	assert_eq!(saved(&h.take()), vec![(MODEL_A.to_string(), ContentSavedReason::ViewSwitched)]);
	assert_eq!(h.sync.phase(), SyncPhase::StructuredActive(ViewId::new("process")));
	assert_eq!(h.diagram.imports(), vec![MODEL_A.to_string()]);
	assert!(h.diagram.is_keyboard_bound());
	assert!(!h.text.is_keyboard_bound());
	h.sync.switch_to(ActiveView::Structured(ViewId::new("process"))).await.unwrap();
}

#[tokio::test]
async fn failed_flush_keeps_the_tab_enabled() {
	let h = process().loaded(MODEL_A).await;
	h.diagram.set_save_failure(true);

	assert_eq!(h.sync.set_structured_enabled(false).await, Err(SyncError::FlushFailed(Tab::Structured)));

	assert!(h.sync.is_enabled(Tab::Structured));
	assert_eq!(h.sync.phase(), SyncPhase::StructuredActive(ViewId::new("process")));
	assert!(h.diagram.is_keyboard_bound());
	assert_eq!(
		notifications(&h.take()),
		vec![("Could not save document. See console for details.".to_string(), Severity::Error)]
	);

	h.diagram.set_save_failure(false);
	h.sync.set_structured_enabled(false).await.unwrap();
	assert_eq!(h.sync.phase(), SyncPhase::TextActive);
	assert!(!h.sync.is_enabled(Tab::Structured));
}

#[tokio::test]
async fn history_follows_the_diagram() {
	let h = process().loaded(MODEL_A).await;
	assert!(!h.sync.history().can_undo);

	h.diagram.apply_edit(MODEL_B);
	h.sync.pump().await;
	assert!(h.sync.history().can_undo);

	h.sync.undo();
	h.sync.pump().await;
	assert_eq!(h.diagram.content().as_deref(), Some(MODEL_A));
	assert!(h.sync.history().can_redo);
	assert_eq!(
		saved(&h.take()),
		vec![
			(MODEL_B.to_string(), ContentSavedReason::DiagramEdited),
			(MODEL_A.to_string(), ContentSavedReason::DiagramEdited),
		]
	);

	h.sync.switch_to(ActiveView::Text).await.unwrap();
	h.sync.redo();
	assert_eq!(h.diagram.content().as_deref(), Some(MODEL_A));
}

#[tokio::test]
async fn shutdown_releases_both_engines() {
	let h = process().loaded(MODEL_A).await;
	h.sync.shutdown();

	assert!(h.sync.is_shut_down());
	assert!(h.diagram.is_destroyed());
	assert!(!h.diagram.has_listener());
	assert!(h.text.is_disposed());
	assert!(!h.text.has_listener());
	assert!(!h.diagram.is_keyboard_bound());

	assert_eq!(h.sync.set_document(MODEL_B).await, Err(SyncError::Destroyed));
	assert_eq!(h.sync.switch_to(ActiveView::Text).await, Err(SyncError::Destroyed));
	assert_eq!(h.sync.set_text_enabled(false).await, Err(SyncError::Destroyed));
	h.sync.panel_resized("100px");
	assert_eq!(h.take(), Vec::new());
}

#[tokio::test]
async fn dropping_the_synchronizer_releases_engines() {
	let h = process().loaded(MODEL_A).await;
	let diagram = Arc::clone(&h.diagram);
	let text = Arc::clone(&h.text);
	drop(h);

	assert!(diagram.is_destroyed());
	assert!(text.is_disposed());
}

#[tokio::test]
async fn run_loop_handles_events_until_shutdown() {
	let h = process();
	let runner = tokio::spawn({
		let sync = Arc::clone(&h.sync);
		async move { sync.run().await }
	});

	h.sync.set_document(MODEL_A).await.unwrap();
	h.diagram.apply_edit(MODEL_B);

	let mut events = Vec::new();
	for _ in 0..200 {
		events.extend(h.take());
		if saved(&events).contains(&(MODEL_B.to_string(), ContentSavedReason::DiagramEdited)) {
			break;
		}
		tokio::time::sleep(Duration::from_millis(5)).await;
	}
	assert!(saved(&events).contains(&(MODEL_B.to_string(), ContentSavedReason::DiagramEdited)));

	h.sync.shutdown();
	runner.await.unwrap();
}
