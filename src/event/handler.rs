use async_trait::async_trait;
use thiserror::Error;

use super::events::Envelope;

/// Errors that can occur when handling relayed events
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Handler timed out")]
    Timeout,

    #[error("Retryable error: {0}")]
    Retryable(String),

    #[error("Non-retryable error: {0}")]
    NonRetryable(String),
}

impl EventError {
    /// Whether this error indicates the operation should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, EventError::Retryable(_) | EventError::Timeout)
    }

    /// Create a retryable error
    pub fn retryable(msg: impl Into<String>) -> Self {
        EventError::Retryable(msg.into())
    }

    /// Create a non-retryable error
    pub fn non_retryable(msg: impl Into<String>) -> Self {
        EventError::NonRetryable(msg.into())
    }
}

/// Async consumer of a relayed channel
///
/// Unlike hub listeners, handlers run on a tokio task, may await, and report
/// failures as values so they can be retried.
#[async_trait]
pub trait EventHandler<P>: Send + Sync {
    /// Handle one relayed event
    ///
    /// Handlers may see the same envelope more than once when a retryable
    /// error is returned, so they should be idempotent where possible.
    async fn handle(&self, envelope: &Envelope<P>) -> Result<(), EventError>;

    /// Get a human-readable name for this handler (for logging/debugging)
    fn name(&self) -> &'static str;
}

/// A handler that accepts everything and does nothing
pub struct NoOpEventHandler;

#[async_trait]
impl<P: Send + Sync + 'static> EventHandler<P> for NoOpEventHandler {
    async fn handle(&self, _envelope: &Envelope<P>) -> Result<(), EventError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "NoOpEventHandler"
    }
}
