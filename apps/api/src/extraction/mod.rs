//! Text extraction from uploaded resume documents.
//!
//! Routing is by declared MIME type only; the bytes are never sniffed. Both parsers are
//! CPU-bound and run inside `tokio::task::spawn_blocking`, so a panic inside a parser
//! surfaces as a join error and is reported as `ExtractionError::Failed`.
//!
//! Both parsers read straight from the uploaded bytes. Nothing is written to disk, so there
//! is no temporary file to clean up after a DOCX parse.

use bytes::Bytes;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;
use tracing::debug;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MSWORD_MIME: &str = "application/msword";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported content type '{0}'")]
    UnsupportedFormat(String),

    #[error("no text extracted from the file")]
    Empty,

    #[error("{0}")]
    Failed(String),
}

/// The document kinds the extractor knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Word,
}

impl DocumentKind {
    /// Maps a declared content type onto a document kind.
    /// Parameters such as `; charset=binary` are ignored and the comparison is
    /// case-insensitive.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or_default().trim();

        if essence.eq_ignore_ascii_case(PDF_MIME) {
            Some(DocumentKind::Pdf)
        } else if essence.eq_ignore_ascii_case(DOCX_MIME)
            || essence.eq_ignore_ascii_case(MSWORD_MIME)
        {
            Some(DocumentKind::Word)
        } else {
            None
        }
    }
}

/// Extracts plain text from `data`, routing on `content_type`.
///
/// Fails with `UnsupportedFormat` before touching the bytes when the content type is
/// not accepted, and with `Empty` when parsing succeeds but yields only whitespace.
pub async fn extract_text(data: Bytes, content_type: &str) -> Result<String, ExtractionError> {
    let kind = DocumentKind::from_content_type(content_type)
        .ok_or_else(|| ExtractionError::UnsupportedFormat(content_type.to_string()))?;

    let text = tokio::task::spawn_blocking(move || extract_sync(&data, kind))
        .await
        .map_err(|e| ExtractionError::Failed(format!("parser task aborted: {e}")))??;

    if text.trim().is_empty() {
        return Err(ExtractionError::Empty);
    }

    debug!(?kind, chars = text.len(), "Text extracted");
    Ok(text)
}

fn extract_sync(data: &[u8], kind: DocumentKind) -> Result<String, ExtractionError> {
    match kind {
        DocumentKind::Pdf => extract_pdf(data),
        DocumentKind::Word => extract_docx(data),
    }
}

/// Concatenates per-page text in page order. Pages without extractable text
/// contribute an empty string.
fn extract_pdf(data: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(data)
        .map_err(|e| ExtractionError::Failed(e.to_string()))?;

    Ok(pages.concat())
}

/// Joins the text of every non-blank body paragraph with `\n`, in document order.
fn extract_docx(data: &[u8]) -> Result<String, ExtractionError> {
    let docx = docx_rs::read_docx(data).map_err(|e| ExtractionError::Failed(e.to_string()))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(&para.children)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut text = String::new();
    push_paragraph_text(children, &mut text);
    text
}

/// Run text in order, including runs nested in hyperlinks. Soft line breaks become `\n`.
fn push_paragraph_text(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_text(&link.children, text),
            _ => {}
        }
    }
}
