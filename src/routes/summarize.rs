use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tracing::{info, info_span, Instrument};

use crate::intake::{self, UPLOAD_SLOTS};
use crate::models::AppState;
use crate::pipeline;
use crate::report::REPORT_FILENAME;
use crate::types::AppResult;
use crate::workspace::RequestWorkspace;

/// Room for multipart boundaries and part headers on top of the file data
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.storage.max_upload_bytes * UPLOAD_SLOTS.len() + MULTIPART_OVERHEAD;

    Router::new()
        .route("/summarize", post(summarize_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// POST /summarize - four PDFs in, one combined summary PDF out
async fn summarize_handler(State(state): State<AppState>, mut multipart: Multipart) -> AppResult<Response> {
    let storage = &state.config.storage;
    let workspace = RequestWorkspace::new(&storage.work_dir, storage.keep_artifacts);
    let span = info_span!("summarize", request_id = %workspace.id());

    let result = process(&state, &mut multipart, &workspace).instrument(span.clone()).await;
    workspace.cleanup().instrument(span.clone()).await;

    let report = result?;
    span.in_scope(|| info!(bytes = report.len(), "Returning combined report"));
    Ok(pdf_attachment(report))
}

async fn process(state: &AppState, multipart: &mut Multipart, workspace: &RequestWorkspace) -> AppResult<Vec<u8>> {
    info!("Summarize request received");
    let documents = intake::accept_uploads(multipart, workspace, state.config.storage.max_upload_bytes).await?;
    pipeline::run(state, &documents, workspace).await
}

fn pdf_attachment(bytes: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime::APPLICATION_PDF.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", REPORT_FILENAME),
            ),
        ],
        bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        Config, ReportConfig, ServerConfig, StorageConfig, SummarizerConfig, SummarizerProvider,
    };
    use crate::summarizer::Summarizer;
    use crate::test_support::{pdf_with_lines, pdf_without_text, FirstWordsSummarizer, RefusingSummarizer};
    use axum::body::Body;
    use axum::http::Request;
    use lopdf::Document;
    use std::path::Path;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "digest-test-boundary";

    fn test_state(work_dir: &Path, summarizer: Arc<dyn Summarizer>) -> AppState {
        AppState {
            config: Config {
                server: ServerConfig { port: 0, host: "127.0.0.1".to_string() },
                storage: StorageConfig {
                    work_dir: work_dir.to_path_buf(),
                    keep_artifacts: false,
                    max_upload_bytes: 1024 * 1024,
                },
                summarizer: SummarizerConfig {
                    provider: SummarizerProvider::Extractive,
                    api_base: String::new(),
                    model: "stub".to_string(),
                    api_token: None,
                    timeout_secs: 1,
                },
                report: ReportConfig {
                    logo_path: work_dir.join("missing-logo.png"),
                    title: "MGM's College Of Engineering".to_string(),
                },
            },
            summarizer,
            logo: None,
        }
    }

    fn multipart_request(parts: &[(&str, &str, Vec<u8>)]) -> Request<Body> {
        let mut body = Vec::new();
        for (field, filename, data) in parts {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/summarize")
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    fn four_documents() -> Vec<(&'static str, &'static str, Vec<u8>)> {
        vec![
            ("pdf1", "first.pdf", pdf_with_lines(&["The first paper studies rivers."])),
            ("pdf2", "second.pdf", pdf_with_lines(&["The second paper studies mountains."])),
            ("pdf3", "third.pdf", pdf_with_lines(&["The third paper studies deserts."])),
            ("pdf4", "fourth.pdf", pdf_with_lines(&["The fourth paper studies oceans."])),
        ]
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    fn dir_is_empty(path: &Path) -> bool {
        std::fs::read_dir(path).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_four_documents_produce_combined_report() {
        let work = TempDir::new().unwrap();
        let app = router(test_state(work.path(), Arc::new(FirstWordsSummarizer(4))));

        let response = app.oneshot(multipart_request(&four_documents())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"combined_summaries.pdf\""
        );

        let doc = Document::load_mem(&body_bytes(response).await).unwrap();
        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        assert!(!pages.is_empty());
        let text = doc.extract_text(&pages).unwrap();

        let mut last = 0;
        for name in ["first.pdf", "second.pdf", "third.pdf", "fourth.pdf"] {
            let at = text.find(&format!("Summary of {}", name)).unwrap();
            assert!(at >= last);
            last = at;
        }
        assert!(text.contains("The third paper studies"));
        assert_eq!(text.matches("Summary of").count(), 4);
        assert!(dir_is_empty(work.path()));
    }

    #[tokio::test]
    async fn test_empty_filename_is_rejected_before_any_work() {
        let work = TempDir::new().unwrap();
        let refusing = Arc::new(RefusingSummarizer::default());
        let app = router(test_state(work.path(), refusing.clone()));

        let mut parts = four_documents();
        parts[2].1 = "";
        let response = app.oneshot(multipart_request(&parts)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_bytes(response).await, b"Please upload all PDF files.");
        assert_eq!(refusing.calls.load(Ordering::SeqCst), 0);
        assert!(dir_is_empty(work.path()));
    }

    #[tokio::test]
    async fn test_missing_slot_is_rejected() {
        let work = TempDir::new().unwrap();
        let app = router(test_state(work.path(), Arc::new(FirstWordsSummarizer(4))));

        let mut parts = four_documents();
        parts.pop();
        let response = app.oneshot(multipart_request(&parts)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_bytes(response).await, b"Please upload all PDF files.");
    }

    #[tokio::test]
    async fn test_document_without_text_fails_the_request() {
        let work = TempDir::new().unwrap();
        let app = router(test_state(work.path(), Arc::new(FirstWordsSummarizer(4))));

        let mut parts = four_documents();
        parts[1].2 = pdf_without_text();
        let response = app.oneshot(multipart_request(&parts)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_bytes(response).await, b"Failed to extract text from second.pdf.");
        assert!(dir_is_empty(work.path()));
    }

    #[tokio::test]
    async fn test_summarizer_error_is_reported_with_filename() {
        let work = TempDir::new().unwrap();
        let refusing = Arc::new(RefusingSummarizer::default());
        let app = router(test_state(work.path(), refusing.clone()));

        let response = app.oneshot(multipart_request(&four_documents())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(body.starts_with("Error processing first.pdf: "));
        assert!(body.contains("model overloaded"));
        assert_eq!(refusing.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_duplicate_filenames_are_kept_apart() {
        let work = TempDir::new().unwrap();
        let app = router(test_state(work.path(), Arc::new(FirstWordsSummarizer(3))));

        let parts: Vec<_> = four_documents()
            .into_iter()
            .map(|(field, _, data)| (field, "same.pdf", data))
            .collect();
        let response = app.oneshot(multipart_request(&parts)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let doc = Document::load_mem(&body_bytes(response).await).unwrap();
        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        let text = doc.extract_text(&pages).unwrap();
        assert_eq!(text.matches("Summary of same.pdf").count(), 4);
        for subject in ["rivers", "mountains", "deserts", "oceans"] {
            assert!(!text.contains(subject), "summary should stop after three words");
        }
        assert!(text.contains("The first paper"));
        assert!(text.contains("The fourth paper"));
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let work = TempDir::new().unwrap();
        let mut state = test_state(work.path(), Arc::new(FirstWordsSummarizer(4)));
        state.config.storage.max_upload_bytes = 16;
        let app = router(state);

        let response = app.oneshot(multipart_request(&four_documents())).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(dir_is_empty(work.path()));
    }
}
