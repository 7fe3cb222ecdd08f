//! Multipart document upload.

use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::Json;
use tracing::info;

use crate::error::{Error, Result};
use crate::pipeline;
use crate::server::routes::session_id;
use crate::server::state::AppState;
use crate::types::{IngestedFile, UploadError, UploadResponse};

/// Accepts one or more files and ingests each into the session's
/// knowledge base. Files already ingested this session are skipped,
/// and a failure on one file does not abort the others.
pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let id = session_id(&headers)?;
    let session = state.session(&id)?;

    // One upload batch is one turn: the session lock is held for the whole
    // request, so a concurrent upload or chat cannot interleave with it.
    // In particular, two simultaneous uploads of the same file name cannot
    // both pass the dedup check.
    let mut guard = session.lock().await;

    let mut response = UploadResponse::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::ingestion(format!("malformed multipart body: {}", e)))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::ingestion(format!("failed to read upload: {}", e)))?;

        if guard.is_ingested(&file_name) {
            response.skipped.push(file_name);
            continue;
        }
        let rag = guard.ensure_rag(|| state.new_rag())?;

        match pipeline::ingest_file(&data, &file_name, &rag).await {
            Ok(chunks) => {
                guard.record_ingested(&file_name);
                info!(file = %file_name, chunks, "document ingested");
                response.added.push(IngestedFile { file_name, chunks });
            }
            Err(error) => {
                response.errors.push(UploadError {
                    file_name,
                    error: error.to_string(),
                });
            }
        }
    }

    Ok(Json(response))
}
