use std::sync::Arc;

use armory_events::{
    global, ArmorSelector, ArmoryJournal, ChannelRelay, EventHub, HandlerSubscription, HubConfig,
    PartType, PrinceStats, ARMOR_CHANGED,
};
use strum::IntoEnumIterator;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "armory_events=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting armory demo");

    // The root owns the hub; everything else gets a handle
    let config = HubConfig::from_env();
    let hub: EventHub = global::install(EventHub::with_config(config.clone())).clone();

    let mut prince = PrinceStats::new();
    prince.enable(&hub);

    let journal = Arc::new(ArmoryJournal::new());
    let relay = ChannelRelay::attach(&hub, ARMOR_CHANGED);
    let journal_task = HandlerSubscription::<String>::new(journal.clone(), relay.subscribe())
        .with_config(&config)
        .start();

    let mut selector = ArmorSelector::new(hub.clone());
    for _ in PartType::iter() {
        selector.next_option();
    }
    selector.press_button("Next Option");

    info!(
        refreshes = prince.refresh_count(),
        equipped = ?prince.equipped(),
        "Prince stats after cycling every option"
    );

    match serde_json::to_string_pretty(&hub.stats()) {
        Ok(stats) => println!("{}", stats),
        Err(e) => warn!(error = %e, "Failed to serialize hub stats"),
    }

    // Closing the relay lets the journal drain and stop
    drop(relay);
    if let Err(e) = journal_task.await {
        warn!(error = %e, "Journal task did not finish cleanly");
    }
    info!(entries = journal.entries().await.len(), "Armory journal drained");

    prince.disable();
}
