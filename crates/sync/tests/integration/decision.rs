use modelsync::{SyncError, SyncPhase};
use modelsync_events::{ContentSavedReason, SyncEvent};
use modelsync_primitives::{ActiveView, ViewId, ViewKind};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{DISH, decision, normalized, notifications, raw_names, saved, ui_refreshes};

fn view(id: &str) -> ActiveView {
	ActiveView::Structured(ViewId::new(id))
}

#[tokio::test]
async fn views_are_mirrored_after_import() {
	let h = decision();
	h.sync.set_document(DISH).await.unwrap();
	h.sync.pump().await;

	let views = h.sync.views();
	let ids: Vec<&str> = views.iter().map(|view| view.id.as_str()).collect();
	assert_eq!(ids, vec!["dish", "d1", "d2"]);
	assert_eq!(views[0].kind, ViewKind::Drd);
	assert_eq!(views[0].display_name(), "Unnamed");
	assert_eq!(views[2].display_name(), "Guests");
	assert_eq!(h.sync.phase(), SyncPhase::StructuredActive(ViewId::new("dish")));

	let mirrored = normalized(&h.take())
		.into_iter()
		.filter(|event| matches!(event, SyncEvent::ViewsChanged { .. }))
		.collect::<Vec<_>>();
	assert_eq!(
		mirrored,
		vec![SyncEvent::ViewsChanged {
			views,
			active_view: Some(ViewId::new("dish")),
		}]
	);
}

#[tokio::test]
async fn switching_between_views_stays_on_the_diagram() {
	let h = decision().loaded(DISH).await;
	let binds = h.diagram.keyboard_binds();
	h.sync.switch_to(view("d1")).await.unwrap();

	assert_eq!(
		normalized(&h.take()),
		vec![SyncEvent::ContentSaved {
			content: DISH.to_string(),
			rendered_artifact: None,
			reason: ContentSavedReason::ViewSwitched,
		}]
	);
	assert_eq!(h.sync.phase(), SyncPhase::StructuredActive(ViewId::new("d1")));
	assert_eq!(h.diagram.opens(), vec![ViewId::new("d1")]);
	assert_eq!(h.diagram.keyboard_binds(), binds + 1);

	h.sync.pump().await;
	assert_eq!(h.sync.phase(), SyncPhase::StructuredActive(ViewId::new("d1")));
}

#[tokio::test]
async fn engine_selected_view_is_adopted_without_open() {
	let h = decision().loaded(DISH).await;
	assert!(h.diagram.select_view(&ViewId::new("d2")));
	h.sync.pump().await;

	assert_eq!(h.sync.phase(), SyncPhase::StructuredActive(ViewId::new("d2")));
	assert_eq!(h.diagram.opens(), Vec::new());
	let events = h.take();
	assert_eq!(raw_names(&events), vec!["views.changed"]);
	assert_eq!(ui_refreshes(&events), vec![true]);
}

#[tokio::test]
async fn view_changes_while_text_is_active_are_only_mirrored() {
	let h = decision().loaded(DISH).await;
	h.sync.switch_to(ActiveView::Text).await.unwrap();
	h.sync.pump().await;
	h.take();

	h.diagram.select_view(&ViewId::new("d1"));
	h.sync.pump().await;

	assert_eq!(h.sync.phase(), SyncPhase::TextActive);
	assert_eq!(
		normalized(&h.take()),
		vec![SyncEvent::ViewsChanged {
			views: h.sync.views(),
			active_view: Some(ViewId::new("d1")),
		}]
	);
}

#[tokio::test]
async fn returning_from_text_opens_the_requested_view() {
	let h = decision().loaded(DISH).await;
	h.sync.switch_to(ActiveView::Text).await.unwrap();
	h.take();
	h.sync.switch_to(view("d2")).await.unwrap();

	let events = h.take();
	assert_eq!(saved(&events), vec![(DISH.to_string(), ContentSavedReason::ViewSwitched)]);
	assert_eq!(ui_refreshes(&events), vec![true]);
	assert_eq!(h.diagram.imports().len(), 1);
	assert_eq!(h.diagram.opens(), vec![ViewId::new("d2")]);
	assert_eq!(h.sync.phase(), SyncPhase::StructuredActive(ViewId::new("d2")));
}

#[tokio::test]
async fn unknown_view_is_rejected() {
	let h = decision().loaded(DISH).await;
	assert_eq!(h.sync.switch_to(view("d9")).await, Err(SyncError::UnknownView(ViewId::new("d9"))));
	assert_eq!(h.take(), Vec::new());
}

#[tokio::test]
async fn template_errors_are_not_a_decision_concern() {
	let h = decision().loaded(DISH).await;
	h.diagram.fire("elementTemplates.errors", json!(null));
	h.sync.pump().await;

	let events = h.take();
	assert_eq!(raw_names(&events), vec!["elementTemplates.errors"]);
	assert_eq!(notifications(&events), Vec::new());
}
