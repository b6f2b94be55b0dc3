//! Scenario: the kill signal is a unilateral, fail-open escape hatch — it
//! completes every continue button, clears every gated lock, and keeps the
//! unit unlocked for the rest of the session.

use crate::support::{build_tree, gated, id, row};
use serde_json::json;
use sluice_content::{NodeKind, DEFAULT_COMPLETION_ATTRIBUTE};
use sluice_engine::{
    ChildAdmission, GatingEvent, RecordingHost, SessionController,
};
use std::sync::Arc;
use tokio::sync::RwLock;

async fn entered_controller() -> Arc<SessionController> {
    let tree = build_tree(vec![
        row(NodeKind::Course, "m05"),
        row(NodeKind::Page, "co-05"),
        gated(NodeKind::Article, "a-05", json!({ "isEnabled": true })),
        row(NodeKind::Block, "b-05"),
        row(NodeKind::Block, "b-10"),
        row(NodeKind::Block, "b-15"),
    ]);
    let controller = Arc::new(SessionController::new(
        Arc::new(RwLock::new(tree)),
        Arc::new(RecordingHost::new()),
    ));
    controller.on_data_ready().await.unwrap();
    controller.on_unit_enter(id("co-05")).await.unwrap();
    controller
}

#[tokio::test]
async fn kill_unlocks_every_gated_node() {
    let controller = entered_controller().await;
    let mut events = controller.subscribe();
    controller.kill().await.unwrap();

    let session = controller.session().await.unwrap();
    assert!(session.is_killed());
    assert!(session.is_finished());

    let tree = controller.tree();
    let tree = tree.read().await;
    for node_id in tree.descendants(&id("co-05"), false) {
        let node = tree.get(&node_id).unwrap();
        if node.is_gated {
            assert!(!node.is_locked, "{node_id} must be unlocked after kill");
        }
    }
    // Every injected button reads complete.
    for node_id in tree.descendants(&id("co-05"), false) {
        let node = tree.get(&node_id).unwrap();
        if node.component.as_deref() == Some(sluice_engine::CONTINUE_BUTTON_COMPONENT) {
            assert!(node.is_complete(DEFAULT_COMPLETION_ATTRIBUTE));
        }
    }
    drop(tree);
    assert_eq!(
        events.try_recv().unwrap().event,
        GatingEvent::Killed { unit: id("co-05") }
    );
}

#[tokio::test]
async fn a_killed_unit_stays_unlocked_across_later_passes() {
    let controller = entered_controller().await;
    controller.kill().await.unwrap();
    // New completion activity would normally re-lock the tail of the group.
    controller.apply_locks_now().await.unwrap();
    let tree = controller.tree();
    let tree = tree.read().await;
    assert!(!tree.get(&id("b-10")).unwrap().is_locked);
    assert!(!tree.get(&id("b-15")).unwrap().is_locked);
}

#[tokio::test]
async fn a_killed_unit_admits_everything() {
    let controller = entered_controller().await;
    assert_eq!(
        controller.admit_child(&id("b-10"), false).await.unwrap(),
        ChildAdmission::Stop
    );
    controller.kill().await.unwrap();
    assert_eq!(
        controller.admit_child(&id("b-10"), false).await.unwrap(),
        ChildAdmission::Render
    );
}
