use tokio::sync::broadcast;
use tracing::{debug, info};

use super::channel::Channel;
use super::events::Envelope;
use super::hub::{callback, EventHub};
use super::subscription::Subscription;

/// Forwards every raise of one hub channel into a broadcast channel
///
/// This is how async tasks observe hub events without blocking the raising
/// thread: the hub listener only clones the payload into the broadcast
/// buffer. Receivers that fall more than `capacity` events behind lag and
/// skip the oldest envelopes. Dropping the relay detaches it from the hub.
#[derive(Debug)]
pub struct ChannelRelay<P> {
    channel: &'static str,
    sender: broadcast::Sender<Envelope<P>>,
    _subscription: Subscription,
}

impl<P: Clone + Send + Sync + 'static> ChannelRelay<P> {
    /// Attaches a relay to `channel` with the capacity from the hub config
    pub fn attach(hub: &EventHub, channel: Channel<P>) -> Self {
        Self::with_capacity(hub, channel, hub.config().relay_capacity)
    }

    pub fn with_capacity(hub: &EventHub, channel: Channel<P>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        let forward = sender.clone();
        let name = channel.name();

        let subscription = hub.subscribe_scoped(
            &channel,
            callback(move |payload: &P| {
                match forward.send(Envelope::new(name, payload.clone())) {
                    Ok(receiver_count) => {
                        debug!(
                            channel = %name,
                            receivers = receiver_count,
                            "Relayed event"
                        );
                    }
                    Err(_) => {
                        debug!(channel = %name, "Relayed event with no receivers");
                    }
                }
            }),
        );

        info!(channel = %name, capacity = capacity, "Channel relay attached");

        Self {
            channel: name,
            sender,
            _subscription: subscription,
        }
    }

    /// A receiver for envelopes raised after this call
    pub fn subscribe(&self) -> broadcast::Receiver<Envelope<P>> {
        self.sender.subscribe()
    }

    pub fn channel_name(&self) -> &'static str {
        self.channel
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
