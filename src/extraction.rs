// Plain-text extraction from uploaded PDFs

use std::path::Path;

use lopdf::Document;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Pdf(#[from] lopdf::Error),

    #[error("extraction task failed: {0}")]
    Task(String),
}

/// Text of every page, in page order
pub fn extract_text_from_bytes(bytes: &[u8]) -> Result<String, ExtractionError> {
    let doc = Document::load_mem(bytes)?;
    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    if pages.is_empty() {
        return Ok(String::new());
    }

    let text = doc.extract_text(&pages)?;
    debug!(pages = pages.len(), chars = text.len(), "Extracted PDF text");
    Ok(text)
}

/// Read a saved upload and extract its text on the blocking pool
pub async fn extract_text(path: &Path) -> Result<String, ExtractionError> {
    let bytes = tokio::fs::read(path).await?;
    tokio::task::spawn_blocking(move || extract_text_from_bytes(&bytes))
        .await
        .map_err(|e| ExtractionError::Task(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::pdf_with_lines;
    use tempfile::TempDir;

    #[test]
    fn test_extracts_all_pages_in_order() {
        let pdf = pdf_with_lines(&["First page sentence.", "Second page sentence."]);
        let text = extract_text_from_bytes(&pdf).unwrap();

        let first = text.find("First page sentence.").unwrap();
        let second = text.find("Second page sentence.").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_invalid_pdf_is_an_error() {
        let err = extract_text_from_bytes(b"this is not a pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
    }

    #[tokio::test]
    async fn test_extract_from_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.pdf");
        tokio::fs::write(&path, pdf_with_lines(&["Saved to disk."])).await.unwrap();

        let text = extract_text(&path).await.unwrap();
        assert!(text.contains("Saved to disk."));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = extract_text(Path::new("/no/such/file.pdf")).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Io(_)));
    }
}
