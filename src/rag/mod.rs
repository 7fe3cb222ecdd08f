//! Retrieval-augmented generation pipeline.
//!
//! [`RagApp`] ties the pieces together: text extraction feeds the chunker,
//! chunks are embedded into a per-session [`VectorIndex`], and chat queries
//! retrieve the top matches to ground a streaming completion.

pub mod chunker;
pub mod index;
pub mod openai;
pub mod prompt;
pub mod provider;

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::RagSettings;
use crate::error::{Error, Result};
use chunker::TextChunker;
use index::{IndexEntry, VectorIndex};
use provider::{ChatProvider, EmbeddingProvider};

pub struct RagApp {
    embedder: Arc<dyn EmbeddingProvider>,
    chat_provider: Arc<dyn ChatProvider>,
    index: VectorIndex,
    chunker: TextChunker,
    top_k: usize,
}

impl RagApp {
    pub fn new(
        settings: &RagSettings,
        embedder: Arc<dyn EmbeddingProvider>,
        chat_provider: Arc<dyn ChatProvider>,
    ) -> Result<Self> {
        let index = VectorIndex::create(embedder.dimensions())?;
        Ok(Self {
            embedder,
            chat_provider,
            index,
            chunker: TextChunker::new(settings.chunk_size, settings.chunk_overlap),
            top_k: settings.top_k,
        })
    }

    /// Extract text from a PDF on disk and index it. Returns the number
    /// of chunks added.
    pub async fn add_pdf_file(&self, path: &Path, source_name: &str) -> Result<usize> {
        // PDF parsing is blocking and can be slow on large files.
        let path = path.to_path_buf();
        let name = source_name.to_string();
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text(&path).map_err(|e| Error::extraction(&name, e.to_string()))
        })
        .await
        .map_err(|e| Error::internal(format!("pdf extraction task panicked: {}", e)))??;
        self.add_text(&text, source_name).await
    }

    /// Chunk, embed, and index a piece of text. Returns the number of
    /// chunks added. Empty or whitespace-only text is an extraction error;
    /// a document that yields nothing has nothing to answer questions from.
    pub async fn add_text(&self, text: &str, source_name: &str) -> Result<usize> {
        if text.trim().is_empty() {
            return Err(Error::extraction(source_name, "document contains no text"));
        }

        let chunks = self.chunker.chunk(text);
        let mut entries = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let vector = self.embedder.embed(chunk).await?;
            entries.push(IndexEntry::new(vector, chunk.clone(), source_name));
        }

        let added = entries.len();
        self.index.add(entries).await?;
        info!(source = source_name, chunks = added, "indexed document");
        Ok(added)
    }

    /// Answer a question grounded in the indexed documents, streaming
    /// incremental fragments through `tx` and returning the full answer.
    pub async fn chat(&self, question: &str, tx: mpsc::Sender<String>) -> Result<String> {
        let query_vector = self.embedder.embed(question).await?;
        let matches = self.index.search(&query_vector, self.top_k)?;
        debug!(
            model = self.chat_provider.model(),
            matches = matches.len(),
            "generating grounded answer"
        );

        let context = prompt::build_context(&matches);
        let full_prompt = prompt::build_chat_prompt(question, &context);

        let provider = Arc::clone(&self.chat_provider);
        let (inner_tx, mut inner_rx) = mpsc::channel::<String>(32);
        let stream_task =
            tokio::spawn(async move { provider.stream_chat(&full_prompt, inner_tx).await });

        let mut answer = String::new();
        while let Some(fragment) = inner_rx.recv().await {
            answer.push_str(&fragment);
            // Caller may have dropped the receiver; keep accumulating so
            // the transcript still gets the full answer.
            let _ = tx.send(fragment).await;
        }

        stream_task
            .await
            .map_err(|e| Error::internal(format!("chat stream task panicked: {}", e)))??;

        Ok(answer)
    }

    /// Number of chunks currently indexed.
    pub fn indexed_chunks(&self) -> usize {
        self.index.len()
    }

    /// Directory holding this pipeline's on-disk index snapshot.
    pub fn index_path(&self) -> &Path {
        self.index.path()
    }
}
