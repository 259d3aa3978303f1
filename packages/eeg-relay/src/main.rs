use eeg_relay::{create_router, IngestListener, RelayConfig, RelayError, RelayState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eeg_relay=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RelayConfig::from_env()?;

    info!("🚀 Starting EEG relay v{}", VERSION);
    info!("📋 Configuration loaded:");
    info!("   Ingest address: {}", config.ingest_address());
    info!("   Web address: {}", config.web_address());
    info!(
        "   Frame layout: {} channels x {} samples",
        config.layout.channels(),
        config.layout.samples_per_channel()
    );
    info!("   Index page: {}", config.index_path().display());
    info!("   Max frame line: {} bytes", config.max_line_len());

    let state = Arc::new(RelayState::new(config.clone()));

    let ingest = IngestListener::bind(
        &config.ingest_address(),
        state.store.clone(),
        state.producer.clone(),
        config.max_line_len(),
    )
    .await?;
    info!("📡 Waiting for producer on {}", ingest.local_addr()?);
    tokio::spawn(ingest.run());

    let app = create_router(state);

    let web_address = config.web_address();
    let listener = tokio::net::TcpListener::bind(&web_address)
        .await
        .map_err(|source| RelayError::Bind {
            addr: web_address.clone(),
            source,
        })?;
    info!("🎧 Serving /data on http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
