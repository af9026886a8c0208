use anyhow::Context;
use pipe_registry::shared::core::clock::SystemClock;
use pipe_registry::shared::infrastructure::storage::KeyValueStorage;
use pipe_registry::shared::infrastructure::storage::in_memory::InMemoryStorage;
use pipe_registry::shared::infrastructure::storage::json_file::JsonFileStorage;
use pipe_registry::shared::infrastructure::workbook::in_memory::InMemoryWorkbook;
use pipe_registry::shell::config::AppConfig;
use pipe_registry::shell::http::router;
use pipe_registry::shell::state::AppState;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = AppConfig::from_env()?;

    let storage: Arc<dyn KeyValueStorage> = match &config.cache_file {
        Some(path) => Arc::new(
            JsonFileStorage::open(path)
                .with_context(|| format!("opening cache file {}", path.display()))?,
        ),
        None => Arc::new(InMemoryStorage::new()),
    };

    // In-memory workbook for now
    let workbook = Arc::new(InMemoryWorkbook::new());
    if let Some(path) = &config.workbook_seed_file {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading workbook seed {}", path.display()))?;
        let sheets = workbook.seed_from_json(&raw).await?;
        tracing::info!(sheets, path = %path.display(), "workbook seeded");
    }

    let state = AppState::wire(
        workbook,
        storage,
        Arc::new(SystemClock),
        config.freshness_window_ms,
    );

    let mut changes = state.coordinator.cache().subscribe();
    tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(change) => tracing::debug!(
                    key = %change.key,
                    removed = change.new_value.is_none(),
                    "cache changed"
                ),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "cache change listener lagged")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("HTTP endpoint: http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
