//! HTTP Routes
//!
//! - `GET /` - Upload form
//! - `POST /summarize` - Four PDFs in, combined summary PDF out
//! - `GET /health` - Health check

pub mod health;
pub mod summarize;
pub mod ui;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    Router::new()
        .merge(summarize::router(state.clone()))
        .merge(health::router(state))
        .merge(ui::router())
        .layer(TraceLayer::new_for_http())
}
