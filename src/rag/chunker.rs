//! Sentence-aware text chunking.

use unicode_segmentation::UnicodeSegmentation;

/// Splits text into chunks on sentence boundaries, with optional overlap
/// carried from the tail of each chunk into the next.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size / 2),
        }
    }

    /// Chunk `text` into pieces of roughly `chunk_size` characters.
    /// Sentences are never split; a sentence longer than the chunk size
    /// becomes its own chunk. Non-empty input always yields at least one
    /// chunk.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut current = String::new();

        for sentence in text.unicode_sentences() {
            if !current.is_empty() && current.len() + sentence.len() > self.chunk_size {
                let overlap_tail = self.overlap_tail(&current);
                chunks.push(std::mem::take(&mut current));
                current = overlap_tail;
            }
            current.push_str(sentence);
        }

        if !current.trim().is_empty() {
            chunks.push(current);
        }

        let chunks: Vec<String> = chunks
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        if chunks.is_empty() {
            // Pathological input (e.g. whitespace-heavy) still produces one chunk.
            return vec![text.to_string()];
        }

        chunks
    }

    /// Tail of `chunk` that seeds the next chunk, cut at a word boundary.
    fn overlap_tail(&self, chunk: &str) -> String {
        if self.overlap == 0 || chunk.len() <= self.overlap {
            return String::new();
        }

        // Take the first word that starts inside the tail region, so the
        // slice always lands on a word boundary.
        let tail_start = chunk.len() - self.overlap;
        let mut boundary = chunk.len();
        for (offset, _) in chunk.unicode_word_indices() {
            if offset >= tail_start {
                boundary = offset;
                break;
            }
        }

        chunk[boundary..].trim_start().to_string()
    }
}
