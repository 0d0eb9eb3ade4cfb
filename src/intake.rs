//! Upload intake: read the four form parts, validate, and save them.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use tokio::fs;
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

use crate::models::UploadedDocument;
use crate::types::{AppError, AppResult};
use crate::workspace::RequestWorkspace;

/// Form field names, in upload order
pub const UPLOAD_SLOTS: [&str; 4] = ["pdf1", "pdf2", "pdf3", "pdf4"];

const FALLBACK_FILENAME: &str = "document.pdf";

/// A file part as received, before validation
#[derive(Debug, Clone)]
pub struct FilePart {
    pub filename: String,
    pub data: Bytes,
}

/// Read, validate and save the four uploads.
///
/// Nothing is written until all four slots are present with non-empty
/// filenames.
pub async fn accept_uploads(
    multipart: &mut Multipart,
    workspace: &RequestWorkspace,
    max_bytes: usize,
) -> AppResult<[UploadedDocument; 4]> {
    let parts = read_parts(multipart, max_bytes).await?;
    let parts = validate_parts(parts)?;
    save_uploads(parts, workspace).await
}

pub async fn read_parts(multipart: &mut Multipart, max_bytes: usize) -> AppResult<[Option<FilePart>; 4]> {
    let mut parts: [Option<FilePart>; 4] = Default::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        let name = field.name().unwrap_or("").to_string();
        let Some(slot) = UPLOAD_SLOTS.iter().position(|s| *s == name) else {
            debug!(field = %name, "Ignoring unknown form field");
            continue;
        };

        let filename = field.file_name().unwrap_or("").to_string();
        let data = field.bytes().await.map_err(|e| multipart_error(e, max_bytes))?;
        if data.len() > max_bytes {
            return Err(AppError::UploadTooLarge { limit: max_bytes });
        }

        debug!(slot = slot + 1, filename = %filename, bytes = data.len(), "Received upload");
        parts[slot] = Some(FilePart { filename, data });
    }

    Ok(parts)
}

fn multipart_error(err: MultipartError, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::UploadTooLarge { limit: max_bytes }
    } else {
        AppError::Multipart(err.body_text())
    }
}

/// Every slot must be filled with a named file. Fails on the first gap, in
/// slot order.
pub fn validate_parts(parts: [Option<FilePart>; 4]) -> AppResult<Vec<FilePart>> {
    let mut valid = Vec::with_capacity(UPLOAD_SLOTS.len());
    for part in parts {
        match part {
            Some(part) if !part.filename.trim().is_empty() => valid.push(part),
            _ => return Err(AppError::Validation),
        }
    }
    Ok(valid)
}

pub async fn save_uploads(
    parts: Vec<FilePart>,
    workspace: &RequestWorkspace,
) -> AppResult<[UploadedDocument; 4]> {
    workspace.ensure().await?;

    let mut documents = Vec::with_capacity(parts.len());
    for (index, part) in parts.into_iter().enumerate() {
        let slot = index + 1;
        let stored_path = workspace.upload_path(slot, &sanitize_filename(&part.filename));
        fs::write(&stored_path, &part.data).await?;
        info!(slot, filename = %part.filename, path = %stored_path.display(), "Saved upload");

        documents.push(UploadedDocument {
            slot,
            original_filename: part.filename,
            stored_path,
        });
    }

    documents.try_into().map_err(|_| AppError::Validation)
}

/// Reduce a client-supplied filename to a safe single path component.
///
/// Non-ASCII characters are decomposed and dropped, path separators and
/// whitespace become `_`, anything outside `[A-Za-z0-9_.-]` is removed, and
/// leading or trailing dots and underscores are stripped.
pub fn sanitize_filename(name: &str) -> String {
    let ascii: String = name.nfkd().filter(char::is_ascii).collect();
    let spaced = ascii.replace(|c: char| c == '/' || c == '\\', " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(*c, '_' | '.' | '-'))
        .collect();
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c == '_');

    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn part(filename: &str) -> Option<FilePart> {
        Some(FilePart {
            filename: filename.to_string(),
            data: Bytes::from_static(b"%PDF"),
        })
    }

    #[test]
    fn test_sanitize_plain_names() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("My cool file.pdf"), "My_cool_file.pdf");
    }

    #[test]
    fn test_sanitize_strips_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\notes.pdf"), "C_Users_me_notes.pdf");
        assert_eq!(sanitize_filename("/absolute/path.pdf"), "absolute_path.pdf");
    }

    #[test]
    fn test_sanitize_unicode_and_fallback() {
        assert_eq!(sanitize_filename("résumé.pdf"), "resume.pdf");
        assert_eq!(sanitize_filename("漢字"), FALLBACK_FILENAME);
        assert_eq!(sanitize_filename("..."), FALLBACK_FILENAME);
        assert_eq!(sanitize_filename("a<b>|c?.pdf"), "abc.pdf");
    }

    #[test]
    fn test_validate_requires_all_slots() {
        let ok = validate_parts([part("a.pdf"), part("b.pdf"), part("c.pdf"), part("d.pdf")]).unwrap();
        assert_eq!(ok.len(), 4);
        assert_eq!(ok[2].filename, "c.pdf");

        let missing = validate_parts([part("a.pdf"), None, part("c.pdf"), part("d.pdf")]);
        assert!(matches!(missing, Err(AppError::Validation)));

        let empty = validate_parts([part("a.pdf"), part("b.pdf"), part(""), part("d.pdf")]);
        assert!(matches!(empty, Err(AppError::Validation)));

        let blank = validate_parts([part("a.pdf"), part("b.pdf"), part("c.pdf"), part("  ")]);
        assert!(matches!(blank, Err(AppError::Validation)));
    }

    #[tokio::test]
    async fn test_save_keeps_order_and_separates_duplicates() {
        let root = TempDir::new().unwrap();
        let workspace = RequestWorkspace::new(root.path(), false);
        let parts = validate_parts([part("same.pdf"), part("same.pdf"), part("x.pdf"), part("../y.pdf")]).unwrap();

        let docs = save_uploads(parts, &workspace).await.unwrap();

        let slots: Vec<usize> = docs.iter().map(|d| d.slot).collect();
        assert_eq!(slots, vec![1, 2, 3, 4]);
        assert_ne!(docs[0].stored_path, docs[1].stored_path);
        assert_eq!(docs[3].stored_path, workspace.dir().join("4_y.pdf"));
        assert_eq!(docs[3].original_filename, "../y.pdf");
        for doc in &docs {
            assert!(doc.stored_path.starts_with(workspace.dir()));
            assert_eq!(fs::read(&doc.stored_path).await.unwrap(), b"%PDF");
        }
    }
}
