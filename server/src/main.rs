use agenda_server::backend::{config::AppConfig, create_router, initialize_backend};
use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    let app_state = initialize_backend(&config).await?;
    let router = create_router(app_state, &config.cors_origin);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Agenda server listening on {}", config.bind_addr);

    axum::serve(listener, router).await.context("Server error")?;
    Ok(())
}
