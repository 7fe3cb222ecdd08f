//! In-memory vector index with per-session disk persistence.
//!
//! Each index owns a temporary directory that holds a JSON snapshot of its
//! entries. Dropping the index removes the directory, so a session's
//! indexed content leaves no trace on disk after logout.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tempfile::TempDir;
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub content: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

impl IndexEntry {
    pub fn new(vector: Vec<f32>, content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            vector,
            content: content.into(),
            source: source.into(),
            created_at: Utc::now(),
        }
    }
}

/// A chunk returned from similarity search.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub content: String,
    pub source: String,
    pub score: f32,
}

pub struct VectorIndex {
    dir: TempDir,
    dimensions: usize,
    entries: RwLock<Vec<IndexEntry>>,
}

impl VectorIndex {
    pub fn create(dimensions: usize) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("docgpt-index-").tempdir()?;
        Ok(Self {
            dir,
            dimensions,
            entries: RwLock::new(Vec::new()),
        })
    }

    /// Directory backing this index. Removed when the index is dropped.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Add entries to the index and persist the updated snapshot.
    pub async fn add(&self, new_entries: Vec<IndexEntry>) -> Result<()> {
        for entry in &new_entries {
            if entry.vector.len() != self.dimensions {
                return Err(Error::embedding(format!(
                    "vector dimension mismatch: expected {}, got {}",
                    self.dimensions,
                    entry.vector.len()
                )));
            }
        }

        // Serialize under the lock, write without holding it.
        let json = {
            let mut entries = self.entries.write();
            entries.extend(new_entries);
            serde_json::to_string(&*entries)?
        };
        tokio::fs::write(self.dir.path().join("index.json"), json).await?;
        Ok(())
    }

    /// Top-k nearest entries by cosine similarity. Empty index yields
    /// empty results.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if query.len() != self.dimensions {
            return Err(Error::embedding(format!(
                "query dimension mismatch: expected {}, got {}",
                self.dimensions,
                query.len()
            )));
        }

        let entries = self.entries.read();
        let mut scored: Vec<ScoredChunk> = entries
            .iter()
            .map(|entry| ScoredChunk {
                content: entry.content.clone(),
                source: entry.source.clone(),
                score: cosine_similarity(query, &entry.vector),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}

/// Cosine similarity between two equal-length vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
