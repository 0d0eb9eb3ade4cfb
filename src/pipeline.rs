//! Summarize pipeline
//!
//! ```text
//! [UploadedDocument; 4]
//!      │  extract text (fails on empty text or PDF error)
//!      ▼
//!   chunk + summarize each document, in upload order
//!      │
//!      ▼
//! Vec<DocumentSummary> ──► combined report PDF
//! ```
//!
//! The first failing document aborts the whole batch.

use std::sync::Arc;

use tokio::fs;
use tracing::info;

use crate::extraction;
use crate::models::{AppState, DocumentSummary, UploadedDocument};
use crate::report::{self, LogoImage};
use crate::summarizer::{self, Summarizer};
use crate::types::{AppError, AppResult};
use crate::workspace::RequestWorkspace;

pub async fn summarize_documents(
    summarizer: &dyn Summarizer,
    documents: &[UploadedDocument],
) -> AppResult<Vec<DocumentSummary>> {
    let mut summaries = Vec::with_capacity(documents.len());

    for document in documents {
        let filename = document.display_name().to_string();

        let text = extraction::extract_text(&document.stored_path)
            .await
            .map_err(|e| AppError::Processing {
                filename: filename.clone(),
                detail: e.to_string(),
            })?;

        if text.trim().is_empty() {
            return Err(AppError::ExtractionEmpty { filename });
        }

        let summary_text = summarizer::summarize(summarizer, &text)
            .await
            .map_err(|e| AppError::Processing {
                filename: filename.clone(),
                detail: e.to_string(),
            })?;

        info!(
            slot = document.slot,
            filename = %filename,
            text_chars = text.chars().count(),
            summary_chars = summary_text.chars().count(),
            "Document summarized"
        );
        summaries.push(DocumentSummary { filename, summary_text });
    }

    Ok(summaries)
}

/// Render the combined report and write it into the request directory
pub async fn render_report(
    summaries: Vec<DocumentSummary>,
    title: String,
    logo: Option<Arc<LogoImage>>,
    workspace: &RequestWorkspace,
) -> AppResult<Vec<u8>> {
    if summaries.is_empty() {
        return Err(AppError::NoSummaries);
    }

    let sections = summaries.len();
    let bytes = tokio::task::spawn_blocking(move || {
        report::build_report(&summaries, &title, logo.as_deref())
    })
    .await
    .map_err(|e| AppError::Report(e.to_string()))?
    .map_err(|e| AppError::Report(e.to_string()))?;

    workspace.ensure().await?;
    let path = workspace.report_path();
    fs::write(&path, &bytes).await?;
    info!(sections, bytes = bytes.len(), path = %path.display(), "Combined report written");

    Ok(bytes)
}

/// Summaries of all four documents rendered into one PDF
pub async fn run(
    state: &AppState,
    documents: &[UploadedDocument],
    workspace: &RequestWorkspace,
) -> AppResult<Vec<u8>> {
    let summaries = summarize_documents(state.summarizer.as_ref(), documents).await?;
    render_report(
        summaries,
        state.config.report.title.clone(),
        state.logo.clone(),
        workspace,
    )
    .await
}
