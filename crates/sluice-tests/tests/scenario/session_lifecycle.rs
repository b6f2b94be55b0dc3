//! Scenario: the full unit lifecycle — enter, gate, acknowledge steps,
//! finish — driven through the controller with the reactor loop running.

use crate::support::{build_tree, gated, id, row};
use serde_json::json;
use sluice_content::{NodeKind, DEFAULT_COMPLETION_ATTRIBUTE};
use sluice_engine::{GatingEvent, RecordingHost, SessionController};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};

#[tokio::test]
async fn a_unit_starts_gated_and_finishes_when_everything_unlocks() {
    let mut tree = build_tree(vec![
        row(NodeKind::Course, "m05"),
        row(NodeKind::Page, "co-05"),
        gated(NodeKind::Article, "a-05", json!({ "isEnabled": true })),
        row(NodeKind::Block, "b-05"),
        row(NodeKind::Component, "c-05"),
        row(NodeKind::Block, "b-10"),
        row(NodeKind::Component, "c-10"),
    ]);
    let (tx, rx) = mpsc::unbounded_channel();
    tree.observe(tx);
    let controller = Arc::new(SessionController::new(
        Arc::new(RwLock::new(tree)),
        Arc::new(RecordingHost::new()),
    ));
    controller.on_data_ready().await.unwrap();

    let mut events = controller.subscribe();
    controller.on_unit_enter(id("co-05")).await.unwrap();
    assert_eq!(
        events.try_recv().unwrap().event,
        GatingEvent::Started { unit: id("co-05") }
    );

    let reactor = tokio::spawn(controller.clone().run(rx));

    // Work through both steps, acknowledging each button.
    {
        let tree = controller.tree();
        let mut tree = tree.write().await;
        for node in ["c-05", "b-05"] {
            tree.set_completion(&id(node), DEFAULT_COMPLETION_ATTRIBUTE, true)
                .unwrap();
        }
    }
    controller.acknowledge(&id("continue-0")).await.unwrap();
    {
        let tree = controller.tree();
        let mut tree = tree.write().await;
        for node in ["c-10", "b-10"] {
            tree.set_completion(&id(node), DEFAULT_COMPLETION_ATTRIBUTE, true)
                .unwrap();
        }
    }
    controller.acknowledge(&id("continue-1")).await.unwrap();

    let finished = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if let Ok(envelope) = events.recv().await {
                if matches!(envelope.event, GatingEvent::Finished { .. }) {
                    break envelope;
                }
            }
        }
    })
    .await
    .expect("the unit should finish once nothing is locked");
    assert_eq!(finished.unit(), &id("co-05"));

    let session = controller.session().await.unwrap();
    assert!(session.is_started());
    assert!(session.is_finished());
    assert!(!session.is_killed());
    reactor.abort();
}

#[tokio::test]
async fn an_ungated_unit_never_starts() {
    let tree = build_tree(vec![
        row(NodeKind::Course, "m05"),
        row(NodeKind::Page, "co-05"),
        row(NodeKind::Article, "a-05"),
        row(NodeKind::Block, "b-05"),
    ]);
    let controller = Arc::new(SessionController::new(
        Arc::new(RwLock::new(tree)),
        Arc::new(RecordingHost::new()),
    ));
    controller.on_data_ready().await.unwrap();
    let mut events = controller.subscribe();
    controller.on_unit_enter(id("co-05")).await.unwrap();
    let session = controller.session().await.unwrap();
    assert!(!session.is_started());
    // Never-started reads as finished and killed: nothing to wait for.
    assert!(session.is_finished());
    assert!(session.is_killed());
    assert!(events.try_recv().is_err());
}
