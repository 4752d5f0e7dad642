use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

use super::{
    events::Envelope,
    handler::{EventError, EventHandler},
};
use crate::config::HubConfig;

/// Feeds envelopes from a relay receiver to one async handler
///
/// Each envelope is handled to completion (including retries) before the
/// next one is taken, so a handler sees envelopes in raise order.
pub struct HandlerSubscription<P> {
    handler: Arc<dyn EventHandler<P>>,
    receiver: broadcast::Receiver<Envelope<P>>,
    handler_timeout: Duration,
    max_retries: u32,
}

impl<P: Clone + Send + Sync + 'static> HandlerSubscription<P> {
    pub fn new(handler: Arc<dyn EventHandler<P>>, receiver: broadcast::Receiver<Envelope<P>>) -> Self {
        Self {
            handler,
            receiver,
            handler_timeout: Duration::from_secs(5),
            max_retries: 3,
        }
    }

    /// Takes timeout and retry settings from the hub config
    pub fn with_config(self, config: &HubConfig) -> Self {
        self.with_handler_timeout(config.handler_timeout)
            .with_max_retries(config.max_retries)
    }

    /// Set the timeout for individual handler execution
    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = timeout;
        self
    }

    /// Set the maximum number of retries for failed handlers
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Spawns the task routing envelopes to the handler
    ///
    /// The task ends once the relay feeding the receiver is dropped.
    pub fn start(self) -> JoinHandle<()> {
        let Self {
            handler,
            mut receiver,
            handler_timeout,
            max_retries,
        } = self;
        let handler_name = handler.name();

        info!(
            handler = handler_name,
            timeout_ms = handler_timeout.as_millis() as u64,
            max_retries = max_retries,
            "Starting handler subscription"
        );

        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(envelope) => {
                        debug!(
                            handler = handler_name,
                            channel = %envelope.channel,
                            "Received relayed event"
                        );

                        if let Err(e) = Self::handle_with_retry(
                            handler.as_ref(),
                            &envelope,
                            handler_timeout,
                            max_retries,
                        )
                        .await
                        {
                            error!(
                                handler = handler_name,
                                channel = %envelope.channel,
                                error = %e,
                                "Handler failed permanently"
                            );
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(
                            handler = handler_name,
                            skipped = skipped,
                            "Handler fell behind, skipped relayed events"
                        );
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            info!(handler = handler_name, "Handler subscription ended - relay closed");
        })
    }

    /// Handle an envelope with retry logic and timeout
    #[instrument(skip(handler, envelope), fields(handler = handler.name(), channel = %envelope.channel))]
    async fn handle_with_retry(
        handler: &dyn EventHandler<P>,
        envelope: &Envelope<P>,
        handler_timeout: Duration,
        max_retries: u32,
    ) -> Result<(), EventError> {
        let mut attempt = 0;

        loop {
            let error = match timeout(handler_timeout, handler.handle(envelope)).await {
                Ok(Ok(())) => {
                    if attempt > 0 {
                        info!(attempt = attempt + 1, "Handler succeeded after retry");
                    }
                    return Ok(());
                }
                Ok(Err(e)) => e,
                Err(_elapsed) => EventError::Timeout,
            };

            if !error.is_retryable() || attempt >= max_retries {
                return Err(error);
            }

            warn!(attempt = attempt + 1, error = %error, "Handler failed, will retry");

            // Exponential backoff
            let delay = Duration::from_millis(100 * 2_u64.pow(attempt));
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
