use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::channel::{BuiltinChannel, Channel, ChannelKey};
use super::subscription::Subscription;
use crate::config::HubConfig;

/// A listener callback for a channel carrying `P`
///
/// Unsubscribing by callback compares the `Arc` pointer, so keep a clone of
/// the exact `Callback` you subscribed with.
pub type Callback<P> = Arc<dyn Fn(&P) + Send + Sync>;

/// Wraps a closure into a [`Callback`]
pub fn callback<P, F>(f: F) -> Callback<P>
where
    F: Fn(&P) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Identifies one registration on the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(Uuid);

impl ListenerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A listener that panicked while the hub was isolating listeners
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("listener {listener} on channel '{channel}' panicked: {message}")]
pub struct ListenerFailure {
    pub channel: &'static str,
    pub listener: ListenerId,
    pub message: String,
}

/// Outcome of a single raise
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Listeners that returned normally
    pub delivered: usize,
    /// Listeners that panicked (only populated in isolating mode)
    pub failures: Vec<ListenerFailure>,
}

impl Delivery {
    /// Number of listeners that were invoked
    pub fn invoked(&self) -> usize {
        self.delivered + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Listener count for one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelStats {
    pub name: &'static str,
    pub payload: &'static str,
    pub listeners: usize,
}

/// Snapshot of every channel the hub knows about, sorted by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HubStats {
    pub channels: Vec<ChannelStats>,
    pub total_listeners: usize,
}

struct Registration {
    id: ListenerId,
    // Always a `Callback<P>` for the payload type in the channel key
    callback: Arc<dyn Any + Send + Sync>,
}

impl Registration {
    fn callback<P: 'static>(&self) -> Option<&Callback<P>> {
        self.callback.downcast_ref::<Callback<P>>()
    }
}

struct ListenerList {
    name: &'static str,
    payload: &'static str,
    registrations: Vec<Registration>,
}

impl ListenerList {
    fn new(name: &'static str, payload: &'static str) -> Self {
        Self {
            name,
            payload,
            registrations: Vec::new(),
        }
    }

    fn position_of<P: 'static>(&self, callback: &Callback<P>) -> Option<usize> {
        self.registrations.iter().position(|registration| {
            registration
                .callback::<P>()
                .is_some_and(|registered| Arc::ptr_eq(registered, callback))
        })
    }
}

pub(crate) struct HubInner {
    channels: Mutex<HashMap<ChannelKey, ListenerList>>,
    config: HubConfig,
}

impl HubInner {
    /// Removes the registration `id` from the channel at `key`
    pub(crate) fn remove(&self, key: ChannelKey, id: ListenerId) -> bool {
        // Dropped after the lock is released, the callback may own guards
        let removed = {
            let mut channels = self.channels.lock();
            let Some(list) = channels.get_mut(&key) else {
                return false;
            };
            let Some(index) = list.registrations.iter().position(|r| r.id == id) else {
                return false;
            };

            let removed = list.registrations.remove(index);
            debug!(
                channel = %key.name,
                listener = %id,
                listeners = list.registrations.len(),
                "Listener removed"
            );
            removed
        };

        drop(removed);
        true
    }
}

/// In-process publish/subscribe hub
///
/// Authors raise a [`Channel`] and every listener registered on it is invoked
/// synchronously, in registration order, before `raise` returns. Cloning the
/// hub clones the handle; all clones share the same listeners.
#[derive(Clone)]
pub struct EventHub {
    inner: Arc<HubInner>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    pub fn with_config(config: HubConfig) -> Self {
        let channels = BuiltinChannel::iter()
            .map(|builtin| {
                let (key, payload) = builtin.descriptor();
                (key, ListenerList::new(key.name, payload))
            })
            .collect();

        debug!(
            isolate_listeners = config.isolate_listeners,
            warn_on_duplicate = config.warn_on_duplicate,
            "Event hub created"
        );

        Self {
            inner: Arc::new(HubInner {
                channels: Mutex::new(channels),
                config,
            }),
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }

    /// Whether both handles point at the same hub
    pub fn same_hub(&self, other: &EventHub) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Appends `callback` to the channel's listener list
    ///
    /// Registering the same callback twice makes it fire twice per raise.
    pub fn subscribe<P: 'static>(&self, channel: &Channel<P>, callback: Callback<P>) -> ListenerId {
        let id = ListenerId::new();
        let mut channels = self.inner.channels.lock();
        let list = channels
            .entry(channel.key())
            .or_insert_with(|| ListenerList::new(channel.name(), channel.payload_type_name()));

        if self.inner.config.warn_on_duplicate && list.position_of(&callback).is_some() {
            warn!(
                channel = %channel,
                "Callback is already subscribed to this channel and will fire once per registration"
            );
        }

        list.registrations.push(Registration {
            id,
            callback: Arc::new(callback),
        });

        debug!(
            channel = %channel,
            listener = %id,
            listeners = list.registrations.len(),
            "Listener subscribed"
        );
        id
    }

    /// Like [`subscribe`](Self::subscribe), but the registration lives only as
    /// long as the returned guard
    pub fn subscribe_scoped<P: 'static>(
        &self,
        channel: &Channel<P>,
        callback: Callback<P>,
    ) -> Subscription {
        let id = self.subscribe(channel, callback);
        Subscription::new(Arc::downgrade(&self.inner), channel.key(), id)
    }

    /// Removes the first registration of `callback` on the channel
    ///
    /// Returns false, leaving every other listener untouched, when the
    /// callback is not registered.
    pub fn unsubscribe<P: 'static>(&self, channel: &Channel<P>, callback: &Callback<P>) -> bool {
        let removed = {
            let mut channels = self.inner.channels.lock();
            channels.get_mut(&channel.key()).and_then(|list| {
                let index = list.position_of(callback)?;
                let removed = list.registrations.remove(index);
                debug!(
                    channel = %channel,
                    listener = %removed.id,
                    listeners = list.registrations.len(),
                    "Listener unsubscribed"
                );
                Some(removed)
            })
        };

        match removed {
            Some(registration) => {
                drop(registration);
                true
            }
            None => {
                debug!(channel = %channel, "Unsubscribe of unregistered callback ignored");
                false
            }
        }
    }

    /// Removes a registration by id, whichever channel it is on
    pub fn unsubscribe_id(&self, id: ListenerId) -> bool {
        let key = {
            let channels = self.inner.channels.lock();
            channels
                .iter()
                .find(|(_, list)| list.registrations.iter().any(|r| r.id == id))
                .map(|(key, _)| *key)
        };

        match key {
            Some(key) => self.inner.remove(key, id),
            None => false,
        }
    }

    /// Invokes every listener on the channel with `payload`, in order
    ///
    /// The listener list is snapshotted before the first call, so listeners
    /// may subscribe, unsubscribe or raise from inside a callback; such
    /// changes apply from the next raise. A panicking listener propagates to
    /// the caller and skips the rest, unless the hub isolates listeners.
    pub fn raise<P: 'static>(&self, channel: &Channel<P>, payload: &P) -> Delivery {
        let snapshot: Vec<(ListenerId, Callback<P>)> = {
            let channels = self.inner.channels.lock();
            match channels.get(&channel.key()) {
                Some(list) => list
                    .registrations
                    .iter()
                    .filter_map(|r| r.callback::<P>().map(|cb| (r.id, Arc::clone(cb))))
                    .collect(),
                None => Vec::new(),
            }
        };

        let mut delivery = Delivery::default();
        if snapshot.is_empty() {
            debug!(channel = %channel, "Event raised with no listeners");
            return delivery;
        }

        debug!(channel = %channel, listeners = snapshot.len(), "Raising event");

        for (id, callback) in snapshot {
            if !self.inner.config.isolate_listeners {
                callback(payload);
                delivery.delivered += 1;
                continue;
            }

            match panic::catch_unwind(AssertUnwindSafe(|| callback(payload))) {
                Ok(()) => delivery.delivered += 1,
                Err(panic) => {
                    let failure = ListenerFailure {
                        channel: channel.name(),
                        listener: id,
                        message: panic_message(panic.as_ref()),
                    };
                    error!(
                        channel = %channel,
                        listener = %id,
                        error = %failure.message,
                        "Listener panicked, continuing with remaining listeners"
                    );
                    delivery.failures.push(failure);
                }
            }
        }

        delivery
    }

    /// Raises a payload-less channel
    pub fn signal(&self, channel: &Channel<()>) -> Delivery {
        self.raise(channel, &())
    }

    pub fn listener_count<P: 'static>(&self, channel: &Channel<P>) -> usize {
        let channels = self.inner.channels.lock();
        channels
            .get(&channel.key())
            .map_or(0, |list| list.registrations.len())
    }

    pub fn total_listener_count(&self) -> usize {
        let channels = self.inner.channels.lock();
        channels.values().map(|list| list.registrations.len()).sum()
    }

    pub fn stats(&self) -> HubStats {
        let mut channels: Vec<ChannelStats> = {
            let channels = self.inner.channels.lock();
            channels
                .values()
                .map(|list| ChannelStats {
                    name: list.name,
                    payload: list.payload,
                    listeners: list.registrations.len(),
                })
                .collect()
        };
        channels.sort_by(|a, b| a.name.cmp(b.name).then(a.payload.cmp(b.payload)));

        let total_listeners = channels.iter().map(|c| c.listeners).sum();
        HubStats {
            channels,
            total_listeners,
        }
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("config", &self.inner.config)
            .field("listeners", &self.total_listener_count())
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
