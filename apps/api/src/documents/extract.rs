//! Turns an uploaded job description or résumé (TXT or PDF) into UTF-8 text.

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("pdf-parse-failure: {0}")]
    Pdf(String),

    #[error("invalid UTF-8 in plaintext upload: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Accepted upload formats, resolved once from the part's MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Plaintext,
    Pdf,
}

impl DocumentKind {
    /// Maps a `Content-Type` value to a kind. Parameters such as `charset`
    /// are ignored. Returns `None` for anything that is not TXT or PDF.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim();
        if essence.eq_ignore_ascii_case("text/plain") {
            Some(DocumentKind::Plaintext)
        } else if essence.eq_ignore_ascii_case("application/pdf") {
            Some(DocumentKind::Pdf)
        } else {
            None
        }
    }
}

/// Which side of the comparison a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentRole {
    JobDescription,
    Resume,
}

impl DocumentRole {
    /// The multipart field name the document arrives under.
    pub fn field_name(self) -> &'static str {
        match self {
            DocumentRole::JobDescription => "jobDescription",
            DocumentRole::Resume => "resume",
        }
    }
}

/// A single uploaded file. Lives only for the duration of one request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub role: DocumentRole,
    pub kind: DocumentKind,
    pub filename: Option<String>,
    pub bytes: Bytes,
}

/// Text derived from an `UploadedDocument`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub role: DocumentRole,
    pub content: String,
}

/// Synchronous extraction. PDF parsing is CPU-bound; async callers should
/// go through `extract_document` instead.
pub fn extract(document: &UploadedDocument) -> Result<ExtractedText, ExtractionError> {
    let content = match document.kind {
        DocumentKind::Plaintext => String::from_utf8(document.bytes.to_vec())?,
        DocumentKind::Pdf => extract_pdf_text(&document.bytes)?,
    };

    debug!(
        "Extracted {} chars from {} file {:?} ({:?})",
        content.len(),
        document.role.field_name(),
        document.filename.as_deref().unwrap_or("<unnamed>"),
        document.kind
    );

    Ok(ExtractedText {
        role: document.role,
        content,
    })
}

/// Runs `extract` on the blocking pool. A panic inside the PDF parser is
/// reported as a PDF failure rather than taking the worker down.
pub async fn extract_document(document: UploadedDocument) -> Result<ExtractedText, ExtractionError> {
    if document.kind == DocumentKind::Plaintext {
        return extract(&document);
    }

    tokio::task::spawn_blocking(move || extract(&document))
        .await
        .map_err(|e| ExtractionError::Pdf(format!("PDF parser aborted: {e}")))?
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::Pdf("empty PDF stream".to_string()));
    }

    let text =
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(ExtractionError::Pdf(
            "PDF contains no extractable text".to_string(),
        ));
    }

    Ok(text)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a one-page PDF that draws `text` in Helvetica, with a correct xref table.
    pub(crate) fn minimal_pdf(text: &str) -> Vec<u8> {
        let stream = format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
             /Resources << /Font << /F1 5 0 R >> >> >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                stream.len(),
                stream
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref_at = out.len();
        out.extend_from_slice(
            format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes(),
        );
        for offset in offsets {
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref_at
            )
            .as_bytes(),
        );
        out
    }

    fn doc(kind: DocumentKind, bytes: impl Into<Bytes>) -> UploadedDocument {
        UploadedDocument {
            role: DocumentRole::Resume,
            kind,
            filename: None,
            bytes: bytes.into(),
        }
    }

    #[test]
    fn test_from_mime_accepts_txt_and_pdf_only() {
        assert_eq!(
            DocumentKind::from_mime("text/plain"),
            Some(DocumentKind::Plaintext)
        );
        assert_eq!(
            DocumentKind::from_mime("text/plain; charset=utf-8"),
            Some(DocumentKind::Plaintext)
        );
        assert_eq!(
            DocumentKind::from_mime("Application/PDF"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(DocumentKind::from_mime("application/x-msdownload"), None);
        assert_eq!(DocumentKind::from_mime("text/html"), None);
        assert_eq!(DocumentKind::from_mime(""), None);
    }

    #[test]
    fn test_plaintext_is_returned_verbatim() {
        let input = "5 years Python, no Go\n  — naïve café ✓\r\n";
        let extracted = extract(&doc(DocumentKind::Plaintext, input.as_bytes().to_vec())).unwrap();
        assert_eq!(extracted.content, input);
        assert_eq!(extracted.role, DocumentRole::Resume);
    }

    #[test]
    fn test_plaintext_rejects_invalid_utf8() {
        let result = extract(&doc(DocumentKind::Plaintext, vec![0x66, 0x6f, 0xff, 0xfe]));
        assert!(matches!(result, Err(ExtractionError::InvalidUtf8(_))));
    }

    #[test]
    fn test_empty_pdf_stream_fails() {
        let result = extract(&doc(DocumentKind::Pdf, Vec::new()));
        assert!(matches!(result, Err(ExtractionError::Pdf(_))));
    }

    #[tokio::test]
    async fn test_corrupted_pdf_fails() {
        let result = extract_document(doc(
            DocumentKind::Pdf,
            b"this is definitely not a pdf document".to_vec(),
        ))
        .await;
        assert!(matches!(result, Err(ExtractionError::Pdf(_))));
    }

    #[tokio::test]
    async fn test_pdf_text_is_extracted() {
        let pdf = minimal_pdf("Hello");
        let extracted = extract_document(doc(DocumentKind::Pdf, pdf)).await.unwrap();
        assert!(
            extracted.content.contains("Hello"),
            "unexpected PDF text: {:?}",
            extracted.content
        );
    }

    #[test]
    fn test_field_names_match_multipart_contract() {
        assert_eq!(DocumentRole::JobDescription.field_name(), "jobDescription");
        assert_eq!(DocumentRole::Resume.field_name(), "resume");
    }
}
