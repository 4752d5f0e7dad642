use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::parts::PartType;
use crate::event::{callback, EventHub, Subscription, ARMOR_CHANGED, NO_INFORMATION};

#[derive(Debug, Default)]
struct StatsState {
    refreshes: usize,
    equipped: Vec<PartType>,
}

/// Subscriber side of the armory: tracks what the prince has equipped
///
/// Listening starts with [`enable`](Self::enable) and stops with
/// [`disable`](Self::disable) or when the stats are dropped.
#[derive(Debug, Default)]
pub struct PrinceStats {
    state: Arc<Mutex<StatsState>>,
    subscriptions: Vec<Subscription>,
}

impl PrinceStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self, hub: &EventHub) {
        if self.is_enabled() {
            debug!("Prince stats already listening");
            return;
        }

        let state = self.state.clone();
        self.subscriptions.push(hub.subscribe_scoped(
            &NO_INFORMATION,
            callback(move |_: &()| state.lock().refreshes += 1),
        ));

        let state = self.state.clone();
        self.subscriptions.push(hub.subscribe_scoped(
            &ARMOR_CHANGED,
            callback(move |payload: &String| match payload.parse::<PartType>() {
                Ok(part) => {
                    debug!(part = %part, "Prince equipped armor");
                    state.lock().equipped.push(part);
                }
                Err(_) => warn!(payload = %payload, "Ignoring unknown armor part"),
            }),
        ));

        info!("Prince stats listening for armor changes");
    }

    pub fn disable(&mut self) {
        if !self.subscriptions.is_empty() {
            info!("Prince stats stopped listening");
        }
        self.subscriptions.clear();
    }

    pub fn is_enabled(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    pub fn refresh_count(&self) -> usize {
        self.state.lock().refreshes
    }

    /// Every part equipped so far, oldest first
    pub fn equipped(&self) -> Vec<PartType> {
        self.state.lock().equipped.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_twice_registers_once() {
        let hub = EventHub::new();
        let mut stats = PrinceStats::new();

        stats.enable(&hub);
        stats.enable(&hub);

        assert_eq!(hub.listener_count(&ARMOR_CHANGED), 1);
        assert_eq!(hub.listener_count(&NO_INFORMATION), 1);
    }

    #[test]
    fn test_unknown_part_is_ignored() {
        let hub = EventHub::new();
        let mut stats = PrinceStats::new();
        stats.enable(&hub);

        hub.raise(&ARMOR_CHANGED, &"Helmet".to_string());
        hub.raise(&ARMOR_CHANGED, &"Torso".to_string());

        assert_eq!(stats.equipped(), vec![PartType::Torso]);
    }

    #[test]
    fn test_disable_and_drop_stop_listening() {
        let hub = EventHub::new();
        let mut stats = PrinceStats::new();

        stats.enable(&hub);
        stats.disable();
        assert!(!stats.is_enabled());
        hub.signal(&NO_INFORMATION);
        assert_eq!(stats.refresh_count(), 0);

        stats.enable(&hub);
        drop(stats);
        assert_eq!(hub.total_listener_count(), 0);
    }
}
