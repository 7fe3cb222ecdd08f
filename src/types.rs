//! Request and response bodies for the HTTP API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::Message;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub session_id: Uuid,
    pub first_name: String,
}

/// Point-in-time view of a session returned by the session endpoint.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub first_name: String,
    pub ingested_files: Vec<String>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct IngestedFile {
    pub file_name: String,
    pub chunks: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadError {
    pub file_name: String,
    pub error: String,
}

/// Per-file outcome of a multipart upload. One bad file never fails the
/// whole batch.
#[derive(Debug, Serialize, Default)]
pub struct UploadResponse {
    pub added: Vec<IngestedFile>,
    pub skipped: Vec<String>,
    pub errors: Vec<UploadError>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}
