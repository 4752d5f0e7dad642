use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raised event as seen by async consumers
///
/// The relay sends an envelope from inside the raise, so only the listeners
/// registered before the relay have returned when one is received. Later
/// listeners may still be running on the raising thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<P> {
    /// Name of the channel the payload was raised on
    pub channel: String,
    pub payload: P,
    pub raised_at: DateTime<Utc>,
}

impl<P> Envelope<P> {
    pub fn new(channel: &str, payload: P) -> Self {
        Self {
            channel: channel.to_string(),
            payload,
            raised_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_serializes_payload_and_channel() {
        let envelope = Envelope::new("armor_changed", "Helmet".to_string());

        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["channel"], "armor_changed");
        assert_eq!(json["payload"], "Helmet");
        assert!(json["raised_at"].is_string());
    }
}
