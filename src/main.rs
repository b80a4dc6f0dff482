use std::sync::atomic::Ordering;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use blob_arena_server::config::RoomConfig;
use blob_arena_server::game::constants::room;
use blob_arena_server::room::RoomRuntime;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging (RUST_LOG overrides the default level)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Blob Arena Server v{}", env!("CARGO_PKG_VERSION"));

    let config = RoomConfig::load_or_default();
    config.validate()?;
    info!(
        "Configuration loaded: {}x{} world, {} food, {} target occupancy, {} max clients",
        config.world_width,
        config.world_height,
        config.food_count,
        config.target_occupancy,
        config.max_clients
    );

    let handle = RoomRuntime::spawn(config)?;
    let metrics = handle.metrics();

    let mut stats = tokio::time::interval(Duration::from_secs(room::STATS_LOG_INTERVAL_SECS));
    stats.tick().await;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result?;
                info!("Shutdown signal received");
                break;
            }
            _ = stats.tick() => {
                info!("{}", metrics.summary());
            }
        }
    }

    let last = handle.shutdown().await?;
    info!(
        "Server stopped after {} ticks ({} players, {} absorptions)",
        last.tick,
        last.players.len(),
        metrics.absorptions.load(Ordering::Relaxed)
    );

    Ok(())
}
