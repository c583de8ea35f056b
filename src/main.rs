use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use frontier_selector::external::optimizer_http::HttpOptimizer;
use frontier_selector::logging::{init_logging, LoggingConfig};
use frontier_selector::{create_app, AppState, SelectorConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let config = SelectorConfig::from_env().context("invalid configuration")?;
    tracing::info!(
        "📊 Optimizer at {} ({:?} catalog, minimum {} assets)",
        config.optimizer_url,
        config.catalog,
        config.min_selection
    );

    let optimizer = HttpOptimizer::from_config(&config).context("failed to build optimizer client")?;
    let state = AppState::new(&config, Arc::new(optimizer));
    let app = create_app(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("🚀 Portfolio selector running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
