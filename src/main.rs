use anyhow::{Context, Result};
use ideaforge_common::Config;
use ideaforge_db::initialize_db;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let repository = initialize_db(&config.mongodb_uri).await;
    let app = ideaforge_api::router(repository);

    let listener = TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    tracing::info!("Server running on port {}", config.port);

    ideaforge_api::serve(listener, app).await?;
    Ok(())
}
