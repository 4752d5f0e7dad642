use std::fmt;
use std::sync::Weak;

use tracing::debug;

use super::channel::ChannelKey;
use super::hub::{HubInner, ListenerId};

/// Guard for a listener registered with
/// [`EventHub::subscribe_scoped`](super::EventHub::subscribe_scoped)
///
/// The listener is removed when the guard is dropped. The guard only holds a
/// weak reference, so it never keeps the hub alive.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    hub: Weak<HubInner>,
    key: ChannelKey,
    id: ListenerId,
    active: bool,
}

impl Subscription {
    pub(crate) fn new(hub: Weak<HubInner>, key: ChannelKey, id: ListenerId) -> Self {
        Self {
            hub,
            key,
            id,
            active: true,
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn channel_name(&self) -> &'static str {
        self.key.name
    }

    /// Unsubscribes now
    pub fn cancel(self) {
        drop(self);
    }

    /// Leaves the listener registered for the lifetime of the hub
    pub fn detach(mut self) -> ListenerId {
        self.active = false;
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.active {
            return;
        }

        match self.hub.upgrade() {
            Some(hub) => {
                hub.remove(self.key, self.id);
            }
            None => {
                debug!(
                    channel = %self.key.name,
                    listener = %self.id,
                    "Hub already dropped, nothing to unsubscribe"
                );
            }
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.key.name)
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}
