use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use super::parts::PartType;
use crate::event::{Envelope, EventError, EventHandler};

/// One recorded armor change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    pub part: PartType,
    pub equipped_at: DateTime<Utc>,
}

/// Async handler keeping a timestamped history of relayed armor changes
#[derive(Default)]
pub struct ArmoryJournal {
    entries: RwLock<Vec<JournalEntry>>,
}

impl ArmoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<JournalEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl EventHandler<String> for ArmoryJournal {
    #[instrument(skip(self, envelope))]
    async fn handle(&self, envelope: &Envelope<String>) -> Result<(), EventError> {
        let part = envelope.payload.parse::<PartType>().map_err(|_| {
            EventError::non_retryable(format!("Unknown armor part: {}", envelope.payload))
        })?;

        info!(part = %part, channel = %envelope.channel, "Recording armor change");

        self.entries.write().await.push(JournalEntry {
            part,
            equipped_at: envelope.raised_at,
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ArmoryJournal"
    }
}
