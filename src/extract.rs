//! Document text extraction
//!
//! DOCX extraction lives here; PDF extraction is handled inside the RAG
//! facade, which does its own parsing for PDF sources.

use std::path::Path;

use crate::error::{Error, Result};

/// Upload content types accepted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Pdf,
    Docx,
}

impl ContentType {
    /// Detect content type from a file name's extension.
    /// Anything outside the accepted set is an explicit error, never a
    /// silent no-op.
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let extension = file_name.rsplit('.').next().unwrap_or("").to_lowercase();
        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            other => Err(Error::UnsupportedType(other.to_string())),
        }
    }

    /// File extension used when staging uploads to disk.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

/// Extract plain text from a DOCX file on disk.
///
/// Paragraph-level text blocks are concatenated with a single newline
/// between paragraphs. `filename` is only used for error reporting.
pub fn extract_docx_text(path: &Path, filename: &str) -> Result<String> {
    let data = std::fs::read(path)
        .map_err(|e| Error::extraction(filename, format!("unreadable file: {}", e)))?;
    extract_docx_text_from_bytes(&data, filename)
}

/// Extract plain text from DOCX bytes.
pub fn extract_docx_text_from_bytes(data: &[u8], filename: &str) -> Result<String> {
    let doc = docx_rs::read_docx(data).map_err(|e| Error::extraction(filename, e.to_string()))?;

    let mut paragraphs = Vec::new();
    for child in doc.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = child {
            let mut paragraph = String::new();
            for child in p.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for child in run.children {
                        if let docx_rs::RunChild::Text(t) = child {
                            paragraph.push_str(&t.text);
                        }
                    }
                }
            }
            paragraphs.push(paragraph);
        }
    }

    Ok(paragraphs.join("\n"))
}
