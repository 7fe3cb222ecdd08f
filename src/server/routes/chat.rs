//! Streaming chat over server-sent events.

use std::convert::Infallible;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures_util::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::error;

use crate::error::Result;
use crate::server::routes::session_id;
use crate::server::state::AppState;
use crate::types::ChatRequest;

/// Answers a question as an SSE stream: `message` events carry incremental
/// answer fragments, followed by a final `done` event, or an `error` event
/// if generation fails. The full answer is appended to the transcript once
/// the stream completes.
pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let id = session_id(&headers)?;
    let session = state.session(&id)?;

    // The owned guard travels into the relay task and is released only
    // after the assistant message lands, so one chat turn is one fully
    // serialized interaction: concurrent turns on the same session queue
    // up rather than interleaving the transcript.
    let mut guard = session.lock_owned().await;
    guard.push_user(&request.message);
    let rag = guard.ensure_rag(|| state.new_rag())?;

    let (event_tx, event_rx) = mpsc::channel::<std::result::Result<Event, Infallible>>(32);

    tokio::spawn(async move {
        let (frag_tx, mut frag_rx) = mpsc::channel::<String>(32);
        let question = request.message;
        let chat_task = tokio::spawn(async move { rag.chat(&question, frag_tx).await });

        while let Some(fragment) = frag_rx.recv().await {
            let event = Event::default().event("message").data(fragment);
            if event_tx.send(Ok(event)).await.is_err() {
                // Client disconnected; generation finishes in the
                // background so the transcript still gets the answer.
                break;
            }
        }

        match chat_task.await {
            Ok(Ok(answer)) => {
                guard.push_assistant(answer);
                let _ = event_tx.send(Ok(Event::default().event("done").data(""))).await;
            }
            Ok(Err(e)) => {
                error!(%e, "chat generation failed");
                let _ = event_tx
                    .send(Ok(Event::default().event("error").data(e.to_string())))
                    .await;
            }
            Err(e) => {
                error!(%e, "chat task panicked");
                let _ = event_tx
                    .send(Ok(Event::default().event("error").data("internal error")))
                    .await;
            }
        }
    });

    Ok(Sse::new(ReceiverStream::new(event_rx)).keep_alive(KeepAlive::default()))
}
