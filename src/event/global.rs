//! The process-wide hub.
//!
//! Prefer passing an [`EventHub`] handle explicitly; this exists for code
//! that has no owner to receive one from.

use once_cell::sync::OnceCell;
use tracing::{info, warn};

use super::hub::EventHub;
use crate::config::HubConfig;

static GLOBAL_HUB: OnceCell<EventHub> = OnceCell::new();

/// Returns the global hub, creating it from the environment on first use
pub fn instance() -> &'static EventHub {
    GLOBAL_HUB.get_or_init(|| {
        info!("Creating global event hub");
        EventHub::with_config(HubConfig::from_env())
    })
}

/// Makes `hub` the global hub unless one already exists
///
/// A second install is discarded and the existing hub is returned, so the
/// first instance stays authoritative for the life of the process.
pub fn install(hub: EventHub) -> &'static EventHub {
    match GLOBAL_HUB.try_insert(hub) {
        Ok(installed) => {
            info!("Installed global event hub");
            installed
        }
        Err((existing, _discarded)) => {
            warn!("Global event hub already exists, discarding the new instance");
            existing
        }
    }
}

/// The global hub, if anything has created it yet
pub fn try_instance() -> Option<&'static EventHub> {
    GLOBAL_HUB.get()
}
