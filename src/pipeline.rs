//! Upload ingestion: stage bytes to a temp file, extract, and index.

use tracing::warn;

use crate::error::{Error, Result};
use crate::extract::{self, ContentType};
use crate::rag::RagApp;

/// Ingest an uploaded file into the session's RAG pipeline. Returns the
/// number of chunks indexed. The staged temp file is removed before this
/// returns, on success and on failure alike.
pub async fn ingest_file(data: &[u8], file_name: &str, rag: &RagApp) -> Result<usize> {
    ingest_file_in(std::env::temp_dir().as_path(), data, file_name, rag).await
}

async fn ingest_file_in(
    dir: &std::path::Path,
    data: &[u8],
    file_name: &str,
    rag: &RagApp,
) -> Result<usize> {
    let content_type = ContentType::from_file_name(file_name)?;

    // NamedTempFile removes itself when dropped, so every exit path below
    // leaves no staged file behind.
    let staged = tempfile::Builder::new()
        .prefix("docgpt-upload-")
        .suffix(&format!(".{}", content_type.extension()))
        .tempfile_in(dir)?;
    tokio::fs::write(staged.path(), data).await?;

    let result = match content_type {
        ContentType::Pdf => rag.add_pdf_file(staged.path(), file_name).await,
        ContentType::Docx => {
            // DOCX parsing is CPU-bound zip work; keep it off the runtime.
            let path = staged.path().to_path_buf();
            let name = file_name.to_string();
            let extracted = tokio::task::spawn_blocking(move || {
                extract::extract_docx_text(&path, &name)
            })
            .await
            .map_err(|e| Error::internal(format!("extraction task panicked: {}", e)))
            .and_then(|r| r);
            match extracted {
                Ok(text) => rag.add_text(&text, file_name).await,
                Err(e) => Err(e),
            }
        }
    };

    if let Err(ref error) = result {
        warn!(file = file_name, %error, "ingestion failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RagSettings;
    use crate::error::Error;
    use crate::rag::provider::testing::{StubChat, StubEmbedder};
    use std::io::Cursor;
    use std::sync::Arc;

    fn rag() -> RagApp {
        let settings = RagSettings {
            chunk_size: 200,
            chunk_overlap: 0,
            top_k: 2,
        };
        RagApp::new(
            &settings,
            Arc::new(StubEmbedder::new()),
            Arc::new(StubChat::replay(&[])),
        )
        .unwrap()
    }

    fn docx_bytes(text: &str) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        docx_rs::Docx::new()
            .add_paragraph(docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text(text)))
            .build()
            .pack(&mut buf)
            .unwrap();
        buf.into_inner()
    }

    fn dir_is_empty(dir: &std::path::Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_docx_ingestion_indexes_chunks() {
        let rag = rag();
        let data = docx_bytes("A document about quarterly results.");
        let added = ingest_file(&data, "results.docx", &rag).await.unwrap();
        assert!(added >= 1);
        assert_eq!(rag.indexed_chunks(), added);
    }

    #[tokio::test]
    async fn test_unsupported_extension_rejected_before_staging() {
        let rag = rag();
        let staging = tempfile::tempdir().unwrap();
        let result = ingest_file_in(staging.path(), b"hello", "notes.txt", &rag).await;
        assert!(matches!(result, Err(Error::UnsupportedType(_))));
        assert!(dir_is_empty(staging.path()));
    }

    #[tokio::test]
    async fn test_temp_file_removed_after_success() {
        let rag = rag();
        let staging = tempfile::tempdir().unwrap();
        let data = docx_bytes("Some text to index.");
        ingest_file_in(staging.path(), &data, "doc.docx", &rag)
            .await
            .unwrap();
        assert!(dir_is_empty(staging.path()));
    }

    #[tokio::test]
    async fn test_temp_file_removed_after_failure() {
        let rag = rag();
        let staging = tempfile::tempdir().unwrap();
        let result = ingest_file_in(staging.path(), b"not a real docx", "broken.docx", &rag).await;
        assert!(matches!(result, Err(Error::Extraction { .. })));
        assert!(dir_is_empty(staging.path()));
    }
}
