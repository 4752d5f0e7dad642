use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use armory_events::{callback, Callback, Envelope, EventError, EventHandler};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Collects "tag:payload" lines from every callback it hands out
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A string-payload callback recording under `tag`
    pub fn listener(&self, tag: &str) -> Callback<String> {
        let calls = self.calls.clone();
        let tag = tag.to_string();
        callback(move |payload: &String| calls.lock().push(format!("{}:{}", tag, payload)))
    }

    /// A payload-less callback recording under `tag`
    pub fn signal_listener(&self, tag: &str) -> Callback<()> {
        let calls = self.calls.clone();
        let tag = tag.to_string();
        callback(move |_: &()| calls.lock().push(tag.clone()))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }
}

/// Async handler that records payloads and can fail a set number of times
pub struct RecordingHandler {
    received: RwLock<Vec<String>>,
    attempts: AtomicU32,
    failures_before_success: u32,
}

#[allow(dead_code)]
impl RecordingHandler {
    pub fn new() -> Arc<Self> {
        Self::failing(0)
    }

    pub fn failing(failures_before_success: u32) -> Arc<Self> {
        Arc::new(Self {
            received: RwLock::new(Vec::new()),
            attempts: AtomicU32::new(0),
            failures_before_success,
        })
    }

    pub async fn received(&self) -> Vec<String> {
        self.received.read().await.clone()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventHandler<String> for RecordingHandler {
    async fn handle(&self, envelope: &Envelope<String>) -> Result<(), EventError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures_before_success {
            return Err(EventError::retryable("not yet"));
        }

        self.received.write().await.push(envelope.payload.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "RecordingHandler"
    }
}
