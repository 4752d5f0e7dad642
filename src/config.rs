use std::time::Duration;

/// Runtime configuration for an [`EventHub`](crate::event::EventHub) and the
/// async relay helpers built on top of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    /// Log a warning when the same callback is registered twice on a channel
    pub warn_on_duplicate: bool,
    /// Catch listener panics during a raise instead of propagating them
    pub isolate_listeners: bool,
    /// Broadcast capacity for channel relays
    pub relay_capacity: usize,
    /// Timeout applied to each async handler attempt
    pub handler_timeout: Duration,
    /// Retries for async handlers returning a retryable error
    pub max_retries: u32,
}

impl HubConfig {
    /// Reads the configuration from the environment, falling back to the
    /// defaults for anything missing or unparsable
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            warn_on_duplicate: env_flag("EVENT_HUB_WARN_DUPLICATES")
                .unwrap_or(defaults.warn_on_duplicate),
            isolate_listeners: env_flag("EVENT_HUB_ISOLATE_LISTENERS")
                .unwrap_or(defaults.isolate_listeners),
            relay_capacity: std::env::var("EVENT_HUB_RELAY_CAPACITY")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .map(|capacity| capacity.max(1))
                .unwrap_or(defaults.relay_capacity),
            handler_timeout: std::env::var("EVENT_HUB_HANDLER_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.handler_timeout),
            max_retries: std::env::var("EVENT_HUB_HANDLER_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_retries),
        }
    }

    pub fn with_warn_on_duplicate(mut self, warn: bool) -> Self {
        self.warn_on_duplicate = warn;
        self
    }

    pub fn with_isolate_listeners(mut self, isolate: bool) -> Self {
        self.isolate_listeners = isolate;
        self
    }

    pub fn with_relay_capacity(mut self, capacity: usize) -> Self {
        self.relay_capacity = capacity.max(1);
        self
    }

    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            warn_on_duplicate: cfg!(debug_assertions),
            isolate_listeners: false,
            relay_capacity: 100,
            handler_timeout: Duration::from_secs(5),
            max_retries: 3,
        }
    }
}

/// Parses the usual truthy/falsy spellings of a boolean env var
fn env_flag(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    parse_flag(&value)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = HubConfig::default();

        assert!(!config.isolate_listeners);
        assert_eq!(config.relay_capacity, 100);
        assert_eq!(config.handler_timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_builder_overrides() {
        let config = HubConfig::default()
            .with_isolate_listeners(true)
            .with_warn_on_duplicate(false)
            .with_relay_capacity(0)
            .with_max_retries(1);

        assert!(config.isolate_listeners);
        assert!(!config.warn_on_duplicate);
        // Zero capacity would make the broadcast channel panic
        assert_eq!(config.relay_capacity, 1);
        assert_eq!(config.max_retries, 1);
    }

    #[rstest]
    #[case("1", Some(true))]
    #[case("TRUE", Some(true))]
    #[case(" on ", Some(true))]
    #[case("no", Some(false))]
    #[case("0", Some(false))]
    #[case("maybe", None)]
    #[case("", None)]
    fn test_parse_flag(#[case] raw: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_flag(raw), expected);
    }
}
