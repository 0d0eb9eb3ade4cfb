// PDF Digest - combined summary reports for uploaded PDF documents

pub mod config;
pub mod extraction;
pub mod intake;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod routes;
pub mod summarizer;
pub mod types;
pub mod utils;
pub mod workspace;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
