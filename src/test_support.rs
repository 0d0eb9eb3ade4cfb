// Fixtures shared by unit tests

use async_trait::async_trait;

use crate::report::{Align, Font, PdfCanvas};
use crate::summarizer::{GenerationParams, Summarizer, SummarizerError};

/// A PDF with one page per entry, each page holding that line of text
pub fn pdf_with_lines(lines: &[&str]) -> Vec<u8> {
    let mut canvas = PdfCanvas::new();
    canvas.set_font(Font::Helvetica, 12.0);
    for line in lines {
        canvas.add_page();
        canvas.cell(0.0, 10.0, line.as_bytes(), Align::Left, true);
    }
    canvas.finish().unwrap()
}

/// A valid PDF whose only page has no text at all
pub fn pdf_without_text() -> Vec<u8> {
    let mut canvas = PdfCanvas::new();
    canvas.add_page();
    canvas.line(10.0, 10.0, 100.0, 10.0);
    canvas.finish().unwrap()
}

/// Deterministic summarizer: returns the first `n` words of each window
pub struct FirstWordsSummarizer(pub usize);

#[async_trait]
impl Summarizer for FirstWordsSummarizer {
    fn name(&self) -> &str {
        "first-words"
    }

    async fn summarize(&self, text: &str, _params: &GenerationParams) -> Result<String, SummarizerError> {
        Ok(text.split_whitespace().take(self.0).collect::<Vec<_>>().join(" "))
    }
}

/// Fails every call, and counts how often it was asked
#[derive(Default)]
pub struct RefusingSummarizer {
    pub calls: std::sync::atomic::AtomicUsize,
}

#[async_trait]
impl Summarizer for RefusingSummarizer {
    fn name(&self) -> &str {
        "refusing"
    }

    async fn summarize(&self, _text: &str, _params: &GenerationParams) -> Result<String, SummarizerError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Err(SummarizerError::Upstream {
            status: 503,
            body: "model overloaded".to_string(),
        })
    }
}
