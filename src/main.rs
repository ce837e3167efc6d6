use anyhow::Context;
use bike_shop::app::build_router;
use bike_shop::config::{AppConfig, ConfigService};
use bike_shop::infrastructure::database;
use bike_shop::lifecycle::shutdown_signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first, so RUST_LOG from the file reaches the filter
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("🚀 Starting Bike Shop Server...");

    let config = AppConfig::load(&ConfigService::from_env())?;
    let products = database::product_repository(&config.storage).await?;
    let router = build_router(products);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("✅ Server running on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("🛑 Initiating graceful shutdown...");
        })
        .await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}
