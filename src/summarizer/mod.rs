//! Summarization
//!
//! Long documents are cut into fixed-size character windows, each window is
//! summarized on its own, and the window summaries are joined back together
//! in order. The model itself sits behind the [`Summarizer`] trait:
//!
//! - [`HuggingFaceSummarizer`]: hosted `bart-large-cnn` style inference endpoint
//! - [`ExtractiveSummarizer`]: offline lead-sentence fallback

pub mod extractive;
pub mod huggingface;

pub use extractive::ExtractiveSummarizer;
pub use huggingface::HuggingFaceSummarizer;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::{SummarizerConfig, SummarizerProvider};

/// Window length in characters fed to the model per call
pub const CHUNK_SIZE: usize = 1000;

/// Generation bounds passed with every window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParams {
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 150,
            min_length: 30,
            do_sample: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SummarizerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("summarization service returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("invalid summarization response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Provider name, reported by the health endpoint
    fn name(&self) -> &str;

    async fn summarize(&self, text: &str, params: &GenerationParams) -> Result<String, SummarizerError>;
}

/// Build the process-wide summarizer from configuration
pub fn build_summarizer(config: &SummarizerConfig) -> Result<Arc<dyn Summarizer>, SummarizerError> {
    let summarizer: Arc<dyn Summarizer> = match config.provider {
        SummarizerProvider::HuggingFace => Arc::new(HuggingFaceSummarizer::new(
            &config.api_base,
            &config.model,
            config.api_token.clone(),
            Duration::from_secs(config.timeout_secs),
        )?),
        SummarizerProvider::Extractive => Arc::new(ExtractiveSummarizer),
    };

    info!(provider = summarizer.name(), model = %config.model, "Summarizer initialized");
    Ok(summarizer)
}

/// Split `text` into contiguous windows of `size` characters.
///
/// Boundaries fall at `[0, size), [size, 2*size), ...` counted in chars, so a
/// multi-byte code point is never cut. The final window may be shorter.
pub fn chunk_text(text: &str, size: usize) -> Vec<&str> {
    if size == 0 {
        return if text.is_empty() { Vec::new() } else { vec![text] };
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == size {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}

/// Summarize a whole document window by window.
pub async fn summarize(summarizer: &dyn Summarizer, text: &str) -> Result<String, SummarizerError> {
    let params = GenerationParams::default();
    let chunks = chunk_text(text, CHUNK_SIZE);
    debug!(chunks = chunks.len(), chars = text.chars().count(), "Summarizing document");

    let mut parts = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.iter().enumerate() {
        let summary = summarizer.summarize(chunk, &params).await?;
        debug!(chunk = index, summary_len = summary.len(), "Chunk summarized");
        parts.push(summary);
    }

    Ok(parts.join(" ").trim().to_string())
}
