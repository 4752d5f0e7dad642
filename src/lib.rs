// Library crate for the armory event hub
// This file exposes the public API for the demo binary and integration tests

pub mod armory;
pub mod config;
pub mod event;

// Re-export commonly used types for easier access in tests
pub use armory::{ArmorSelector, ArmoryJournal, PartType, PrinceStats};
pub use config::HubConfig;
pub use event::{
    callback, global, Callback, Channel, ChannelRelay, Delivery, Envelope, EventError,
    EventHandler, EventHub, HandlerSubscription, ListenerId, Subscription, ARMOR_CHANGED,
    BUTTON_PRESSED, NO_INFORMATION,
};
