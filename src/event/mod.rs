// Event hub and the async relay built on top of it
//
// Listeners registered on the hub run synchronously on the raising thread.
// Async consumers attach a ChannelRelay and read envelopes from a broadcast
// receiver, optionally through a HandlerSubscription.

// Public API - what other modules can use
pub use bus::ChannelRelay;
pub use channel::{BuiltinChannel, Channel, ARMOR_CHANGED, BUTTON_PRESSED, NO_INFORMATION};
pub use dispatcher::HandlerSubscription;
pub use events::Envelope;
pub use handler::{EventError, EventHandler, NoOpEventHandler};
pub use hub::{
    callback, Callback, ChannelStats, Delivery, EventHub, HubStats, ListenerFailure, ListenerId,
};
pub use subscription::Subscription;

pub mod global;

// Internal modules
mod bus;
mod channel;
mod dispatcher;
mod events;
mod handler;
mod hub;
mod subscription;
