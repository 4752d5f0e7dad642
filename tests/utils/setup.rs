use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use armory_events::{
    ArmoryJournal, ChannelRelay, EventHandler, EventHub, HandlerSubscription, HubConfig,
    ARMOR_CHANGED,
};

use super::mocks::RecordingHandler;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub hub: EventHub,
    pub relay: ChannelRelay<String>,
    pub journal: Arc<ArmoryJournal>,
    pub recorder: Arc<RecordingHandler>,
    pub handles: Vec<JoinHandle<()>>,
}

#[allow(dead_code)]
impl TestSetup {
    /// Drops the relay and waits for every handler task to drain
    pub async fn shutdown(self) -> (Arc<ArmoryJournal>, Arc<RecordingHandler>) {
        let TestSetup {
            hub: _hub,
            relay,
            journal,
            recorder,
            handles,
        } = self;

        drop(relay);
        for handle in handles {
            handle.await.expect("handler task should not panic");
        }
        (journal, recorder)
    }
}

pub struct TestSetupBuilder {
    config: HubConfig,
    recorder_failures: u32,
}

#[allow(dead_code)]
impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            config: HubConfig::default()
                .with_handler_timeout(Duration::from_millis(200))
                .with_max_retries(3),
            recorder_failures: 0,
        }
    }

    pub fn with_config(mut self, config: HubConfig) -> Self {
        self.config = config;
        self
    }

    /// Make the recording handler fail this many times before succeeding
    pub fn with_recorder_failures(mut self, failures: u32) -> Self {
        self.recorder_failures = failures;
        self
    }

    pub fn build(self) -> TestSetup {
        let hub = EventHub::with_config(self.config.clone());
        let relay = ChannelRelay::attach(&hub, ARMOR_CHANGED);

        let journal = Arc::new(ArmoryJournal::new());
        let recorder = RecordingHandler::failing(self.recorder_failures);

        let handlers = vec![
            journal.clone() as Arc<dyn EventHandler<String>>,
            recorder.clone() as Arc<dyn EventHandler<String>>,
        ];
        let handles = handlers
            .into_iter()
            .map(|handler| {
                HandlerSubscription::new(handler, relay.subscribe())
                    .with_config(&self.config)
                    .start()
            })
            .collect();

        TestSetup {
            hub,
            relay,
            journal,
            recorder,
            handles,
        }
    }
}
