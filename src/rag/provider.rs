//! Provider traits for embeddings and chat completion.
//!
//! The RAG facade works against these traits so tests can swap in stub
//! providers and the live OpenAI client stays behind a seam.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;

/// Produces dense vector embeddings for text.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single piece of text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Dimensionality of vectors returned by [`embed`](Self::embed).
    fn dimensions(&self) -> usize;
}

/// Streams chat completions token-by-token.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Generate a completion for `prompt`, sending each incremental text
    /// fragment through `tx` as it arrives. Returns once the stream ends.
    async fn stream_chat(&self, prompt: &str, tx: mpsc::Sender<String>) -> Result<()>;

    /// Model identifier used for generation.
    fn model(&self) -> &str;
}
