//! HTTP route handlers.

mod auth;
mod chat;
mod upload;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;

/// Header carrying the caller's session id.
pub const SESSION_HEADER: &str = "x-session-id";

pub fn api_router(state: AppState) -> Router {
    let max_upload = state.config().server.max_upload_size;

    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session_snapshot))
        .route(
            "/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(max_upload)),
        )
        .route("/chat", post(chat::chat))
        .with_state(state)
}

/// Pull the session id out of the request headers.
pub(crate) fn session_id(headers: &HeaderMap) -> Result<Uuid> {
    let value = headers
        .get(SESSION_HEADER)
        .ok_or(Error::SessionNotFound)?
        .to_str()
        .map_err(|_| Error::SessionNotFound)?;
    Uuid::parse_str(value).map_err(|_| Error::SessionNotFound)
}
