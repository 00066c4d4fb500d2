use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use volley_coach::api::routes::create_routes;
use volley_coach::{AppConfig, PoseAnalysisService};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Scoring configuration problems are fatal at startup
    let scoring = config.scoring_config()?;
    let profile = scoring.profile;
    let service = PoseAnalysisService::new(scoring).context("Invalid scoring configuration")?;

    let app = create_routes(service);

    let address = config.server_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!(
        "Volley coach server starting on http://{} ({} environment, {} scoring)",
        address, config.environment, profile
    );
    info!("Health check available at http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
