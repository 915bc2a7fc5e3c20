//! Integration tests for non-blocking session dispatch.

mod common;

use std::sync::Arc;

use common::{GatedTransport, ScriptedTransport, verdict};
use pishai_analysis_contract::ClassifierResponse;
use pishai_app::{CheckOutcome, Dispatch, Session, Settlement};
use pishai_client::{ClassifierTransport, TransportError};
use pishai_core::{CheckKind, ErrorKind};
use pishai_lifecycle::RequestState;
use pishai_ui::{CheckerView, Theme};
use tokio::sync::{mpsc, oneshot};

type Release = oneshot::Sender<Result<ClassifierResponse, TransportError>>;

fn gated_session() -> (Arc<Session>, Arc<GatedTransport>, Release) {
    let (transport, release) = GatedTransport::new();
    let transport = Arc::new(transport);
    let session = Arc::new(Session::new(
        Arc::clone(&transport) as Arc<dyn ClassifierTransport>
    ));
    (session, transport, release)
}

#[tokio::test]
async fn session_dispatch_tests_pending_panel_is_visible_before_reply() {
    let (session, transport, release) = gated_session();
    let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<Settlement>();

    let dispatched = session.dispatch(CheckKind::Url, "https://slow.example", &settled_tx);

    assert!(matches!(dispatched, Dispatch::InFlight(_)));
    let panel = session.checker(CheckKind::Url).panel(Theme::Light);
    assert!(!panel.submit_enabled);
    assert!(matches!(panel.view, CheckerView::Busy { .. }));

    transport.wait_started().await;
    release
        .send(Ok(verdict("Safe", 90.0)))
        .expect("dispatched task should still be waiting");
    let (kind, outcome) = settled_rx.recv().await.expect("task should report");

    assert_eq!(kind, CheckKind::Url);
    assert!(matches!(
        outcome,
        CheckOutcome::Settled(RequestState::Succeeded(_))
    ));
}

#[tokio::test]
async fn session_dispatch_tests_clear_while_pending_discards_reply() {
    let (session, transport, release) = gated_session();
    let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<Settlement>();

    let Dispatch::InFlight(task) =
        session.dispatch(CheckKind::Url, "https://slow.example", &settled_tx)
    else {
        panic!("valid url should go out");
    };
    transport.wait_started().await;

    session.checker(CheckKind::Url).clear();
    assert_eq!(session.checker(CheckKind::Url).state(), RequestState::Idle);

    release
        .send(Ok(verdict("Phishing/Malicious", 99.0)))
        .expect("dispatched task should still be waiting");
    task.await.expect("dispatched task should not panic");

    assert_eq!(
        settled_rx.recv().await,
        Some((CheckKind::Url, CheckOutcome::Discarded))
    );
    assert_eq!(session.checker(CheckKind::Url).state(), RequestState::Idle);
}

#[tokio::test]
async fn session_dispatch_tests_resubmit_while_pending_is_busy() {
    let (session, transport, release) = gated_session();
    let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<Settlement>();

    let _ = session.dispatch(CheckKind::Email, "first email", &settled_tx);
    transport.wait_started().await;

    assert!(matches!(
        session.dispatch(CheckKind::Email, "second email", &settled_tx),
        Dispatch::Busy
    ));
    assert_eq!(transport.calls(), 1);

    release
        .send(Ok(verdict("Safe", 60.0)))
        .expect("dispatched task should still be waiting");
    assert!(settled_rx.recv().await.is_some());
}

#[tokio::test]
async fn session_dispatch_tests_rejected_input_settles_without_task() {
    let transport = Arc::new(ScriptedTransport::new(Vec::new()));
    let session = Arc::new(Session::new(
        Arc::clone(&transport) as Arc<dyn ClassifierTransport>
    ));
    let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<Settlement>();

    let dispatched = session.dispatch(CheckKind::Url, "example.com", &settled_tx);

    assert!(matches!(
        dispatched,
        Dispatch::Settled(RequestState::Failed(ErrorKind::InvalidUrl))
    ));
    assert_eq!(transport.calls(), 0);
    drop(settled_tx);
    assert_eq!(settled_rx.recv().await, None);
}
