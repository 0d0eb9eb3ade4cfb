use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::report::LogoImage;
use crate::summarizer::Summarizer;

/// Shared, read-only service state. Built once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub summarizer: Arc<dyn Summarizer>,
    /// `None` when the logo asset could not be loaded at startup
    pub logo: Option<Arc<LogoImage>>,
}

/// One of the four uploaded files, saved inside the request workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    /// Form slot, 1 through 4
    pub slot: usize,
    pub original_filename: String,
    pub stored_path: PathBuf,
}

impl UploadedDocument {
    /// Filename as shown in messages and report headings: the client's name
    /// without any directory part it may have sent along
    pub fn display_name(&self) -> &str {
        self.original_filename
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.original_filename)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DocumentSummary {
    pub filename: String,
    pub summary_text: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub summarizer: String,
}
