//! Error types for the service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing secret, bad address, bad file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid login credentials. Deliberately carries no detail about
    /// which of email/password was wrong.
    #[error("Invalid email or password")]
    Auth,

    /// Credential store unreachable or misbehaving
    #[error("Credential store error: {0}")]
    Store(#[from] mongodb::error::Error),

    /// Unknown or missing session id
    #[error("Session not found")]
    SessionNotFound,

    /// Document text extraction failed
    #[error("Failed to extract text from '{filename}': {message}")]
    Extraction { filename: String, message: String },

    /// File type outside the accepted set (pdf, docx)
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// Ingestion into the knowledge base failed
    #[error("Ingestion failed: {0}")]
    Ingestion(String),

    /// Embedding generation failed
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// LLM chat call failed
    #[error("LLM error: {0}")]
    Llm(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an extraction error
    pub fn extraction(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an ingestion error
    pub fn ingestion(message: impl Into<String>) -> Self {
        Self::Ingestion(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg.clone()),
            Error::Auth => (
                StatusCode::UNAUTHORIZED,
                "auth_error",
                "Invalid email or password".to_string(),
            ),
            Error::Store(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                err.to_string(),
            ),
            Error::SessionNotFound => (
                StatusCode::UNAUTHORIZED,
                "session_error",
                "Session not found".to_string(),
            ),
            Error::Extraction { filename, message } => (
                StatusCode::BAD_REQUEST,
                "extraction_error",
                format!("Failed to extract text from '{}': {}", filename, message),
            ),
            Error::UnsupportedType(ext) => (
                StatusCode::BAD_REQUEST,
                "unsupported_type",
                format!("Unsupported file type: {}", ext),
            ),
            Error::Ingestion(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ingestion_error",
                msg.clone(),
            ),
            Error::Embedding(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "embedding_error",
                msg.clone(),
            ),
            Error::Llm(msg) => (StatusCode::SERVICE_UNAVAILABLE, "llm_error", msg.clone()),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg.clone(),
            ),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_message_names_neither_field() {
        assert_eq!(Error::Auth.to_string(), "Invalid email or password");
    }

    #[test]
    fn test_session_message_does_not_promise_expiry() {
        // Sessions live until logout; the message must not suggest a TTL.
        assert_eq!(Error::SessionNotFound.to_string(), "Session not found");
    }
}
