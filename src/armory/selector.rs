use tracing::{debug, info};

use super::parts::PartType;
use crate::event::{Delivery, EventHub, ARMOR_CHANGED, BUTTON_PRESSED, NO_INFORMATION};

/// Author side of the armory: cycles through armor options and announces
/// every change on the hub
pub struct ArmorSelector {
    hub: EventHub,
    current: PartType,
}

impl ArmorSelector {
    pub fn new(hub: EventHub) -> Self {
        Self {
            hub,
            current: PartType::default(),
        }
    }

    pub fn current(&self) -> PartType {
        self.current
    }

    /// Moves to the next option, then raises `NO_INFORMATION` followed by
    /// `ARMOR_CHANGED` with the new part name
    pub fn next_option(&mut self) -> PartType {
        let previous = self.current;
        self.current = previous.next();

        info!(from = %previous, to = %self.current, "Armor option changed");

        self.hub.signal(&NO_INFORMATION);
        let delivery = self.hub.raise(&ARMOR_CHANGED, &self.current.to_string());
        debug!(
            part = %self.current,
            delivered = delivery.delivered,
            failed = delivery.failures.len(),
            "Armor change announced"
        );

        self.current
    }

    /// Announces a button press with its label
    pub fn press_button(&self, label: &str) -> Delivery {
        self.hub.raise(&BUTTON_PRESSED, &label.to_string())
    }
}
