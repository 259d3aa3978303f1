use eeg_producer::{Producer, ProducerConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eeg_producer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ProducerConfig::from_env()?;

    info!("🚀 Starting EEG producer v{}", env!("CARGO_PKG_VERSION"));
    info!("   Relay: {}", config.relay_address());
    info!(
        "   Frame layout: {} channels x {} samples",
        config.layout.channels(),
        config.layout.samples_per_channel()
    );
    info!(
        "   Loop interval: {:?}, reconnect interval: {:?}",
        config.loop_interval, config.reconnect_interval
    );

    let mut producer = Producer::new(&config);
    producer.run().await?;

    Ok(())
}
