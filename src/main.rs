use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use pdf_digest::{
    config::Config, report::LogoImage, routes::create_router, summarizer::build_summarizer,
    utils::init_tracing, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    tokio::fs::create_dir_all(&config.storage.work_dir).await?;
    info!(work_dir = %config.storage.work_dir.display(), "Work directory ready");

    // Model client is built once and shared by every request
    let summarizer = build_summarizer(&config.summarizer)?;

    let logo = match LogoImage::load(&config.report.logo_path) {
        Ok(logo) => {
            info!(path = %config.report.logo_path.display(), width = logo.width, height = logo.height, "Logo loaded");
            Some(Arc::new(logo))
        }
        Err(e) => {
            warn!(path = %config.report.logo_path.display(), error = %e, "Logo unavailable, reports will omit it");
            None
        }
    };

    let state = AppState {
        config: config.clone(),
        summarizer,
        logo,
    };

    let app = create_router(state);

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
