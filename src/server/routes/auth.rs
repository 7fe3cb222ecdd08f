//! Login, logout, and session inspection.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use tracing::info;

use crate::error::{Error, Result};
use crate::server::routes::session_id;
use crate::server::state::AppState;
use crate::types::{LoginRequest, LoginResponse, SessionSnapshot};

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user = state
        .credentials()
        .authenticate(&request.email, &request.password)
        .await?
        .ok_or(Error::Auth)?;

    info!(email = %user.email, "login succeeded");
    let first_name = user.first_name.clone();
    let session_id = state.sessions().create(user);

    Ok(Json(LoginResponse {
        session_id,
        first_name,
    }))
}

/// Destroys the session. The session's RAG pipeline is dropped with it,
/// removing the on-disk index directory.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode> {
    let id = session_id(&headers)?;
    if !state.sessions().destroy(&id) {
        return Err(Error::SessionNotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn session_snapshot(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionSnapshot>> {
    let id = session_id(&headers)?;
    let session = state.session(&id)?;
    let session = session.lock().await;

    let mut ingested_files: Vec<String> =
        session.ingested_files().map(str::to_string).collect();
    ingested_files.sort();

    Ok(Json(SessionSnapshot {
        first_name: session.user.first_name.clone(),
        ingested_files,
        messages: session.transcript().to_vec(),
    }))
}
