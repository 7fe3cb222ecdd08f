//! Prompt assembly for grounded question answering.

use crate::rag::index::ScoredChunk;

/// Render retrieved chunks into a context block, most relevant first.
pub fn build_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| format!("[{}] (from {})\n{}", i + 1, chunk.source, chunk.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the full prompt: grounding rules, document context, then the
/// user's question.
pub fn build_chat_prompt(question: &str, context: &str) -> String {
    format!(
        "You are DocGPT, an assistant that answers questions about the user's uploaded documents.\n\
        Answer using only the document excerpts below. If the excerpts do not contain \
        the answer, say you could not find it in the uploaded documents.\n\n\
        Document excerpts:\n{}\n\nQuestion: {}\n\nAnswer:",
        context, question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(content: &str, source: &str) -> ScoredChunk {
        ScoredChunk {
            content: content.to_string(),
            source: source.to_string(),
            score: 0.9,
        }
    }

    #[test]
    fn test_context_numbers_chunks_in_order() {
        let chunks = vec![chunk("first passage", "a.pdf"), chunk("second passage", "b.docx")];
        let context = build_context(&chunks);
        assert!(context.contains("[1] (from a.pdf)\nfirst passage"));
        assert!(context.contains("[2] (from b.docx)\nsecond passage"));
        assert!(context.find("first passage").unwrap() < context.find("second passage").unwrap());
    }

    #[test]
    fn test_empty_context() {
        assert_eq!(build_context(&[]), "");
    }

    #[test]
    fn test_prompt_contains_question_and_context() {
        let prompt = build_chat_prompt("What is the deadline?", "The deadline is Friday.");
        assert!(prompt.contains("What is the deadline?"));
        assert!(prompt.contains("The deadline is Friday."));
        assert!(prompt.ends_with("Answer:"));
    }
}
