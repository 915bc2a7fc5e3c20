//! Shared fixtures for app integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pishai_analysis_contract::ClassifierResponse;
use pishai_client::{ClassifierTransport, TransportError};
use pishai_core::CheckRequest;
use tokio::sync::{Notify, oneshot};

/// Builds a classifier verdict fixture.
#[allow(dead_code)]
pub fn verdict(label: &str, confidence: f64) -> ClassifierResponse {
    ClassifierResponse {
        status: Some("success".to_string()),
        label: label.to_string(),
        confidence,
    }
}

/// Transport answering from a fixed script and counting calls.
#[allow(dead_code)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<ClassifierResponse, TransportError>>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new(replies: Vec<Result<ClassifierResponse, TransportError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_payloads(&self) -> Vec<String> {
        self.seen.lock().expect("seen lock should work").clone()
    }
}

#[async_trait]
impl ClassifierTransport for ScriptedTransport {
    async fn classify(&self, request: &CheckRequest) -> Result<ClassifierResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .expect("seen lock should work")
            .push(request.payload().to_string());
        self.replies
            .lock()
            .expect("reply lock should work")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("script exhausted".to_string())))
    }
}

/// Transport that holds each call until the test releases it.
#[allow(dead_code)]
pub struct GatedTransport {
    started: Notify,
    release: Mutex<Option<oneshot::Receiver<Result<ClassifierResponse, TransportError>>>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl GatedTransport {
    /// Returns the transport and the sender that releases its single reply.
    pub fn new() -> (Self, oneshot::Sender<Result<ClassifierResponse, TransportError>>) {
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                started: Notify::new(),
                release: Mutex::new(Some(receiver)),
                calls: AtomicUsize::new(0),
            },
            sender,
        )
    }

    /// Waits until a call is in flight.
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassifierTransport for GatedTransport {
    async fn classify(&self, _request: &CheckRequest) -> Result<ClassifierResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let receiver = self.release.lock().expect("release lock should work").take();
        self.started.notify_one();
        match receiver {
            Some(receiver) => receiver
                .await
                .unwrap_or_else(|_| Err(TransportError::Network("gate dropped".to_string()))),
            None => Err(TransportError::Network("gate already used".to_string())),
        }
    }
}
