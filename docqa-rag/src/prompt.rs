//! Grounding prompt construction.

use crate::document::SearchResult;

/// Join retrieved chunk texts, in rank order, separated by blank lines.
pub fn build_context(results: &[SearchResult]) -> String {
    results.iter().map(|r| r.chunk.text.as_str()).collect::<Vec<_>>().join("\n\n")
}

/// Build the prompt sent to the language model for `question`.
///
/// The model is told to answer only from the context, to say so when the
/// context is insufficient, to be concise, and to use bullet points when
/// listing several items.
pub fn build_prompt(question: &str, results: &[SearchResult]) -> String {
    format!(
        r#"You are a helpful AI assistant. Answer the question based on the provided context from the document.

Context from document:
{context}

Question: {question}

Instructions:
- Answer based only on the provided context
- If the context doesn't contain enough information, say so
- Be concise and accurate
- Use bullet points if listing multiple items

Answer:"#,
        context = build_context(results),
    )
}

/// Positional source labels, `"Chunk 1"`, `"Chunk 2"`, ... by retrieval rank.
pub fn source_labels(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("Chunk {i}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chunk;

    fn result(index: usize, text: &str) -> SearchResult {
        SearchResult { chunk: Chunk::new(1, index, text), score: 0.5 }
    }

    #[test]
    fn context_keeps_rank_order() {
        let results = vec![result(4, "second chunk"), result(0, "first chunk")];
        assert_eq!(build_context(&results), "second chunk\n\nfirst chunk");
    }

    #[test]
    fn prompt_contains_context_question_and_rules() {
        let prompt = build_prompt("What is the capital?", &[result(0, "Paris is the capital.")]);
        assert!(prompt.contains("Context from document:\nParis is the capital.\n"));
        assert!(prompt.contains("Question: What is the capital?"));
        assert!(prompt.contains("Answer based only on the provided context"));
        assert!(prompt.contains("say so"));
        assert!(prompt.contains("bullet points"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn labels_are_one_based() {
        assert_eq!(source_labels(3), vec!["Chunk 1", "Chunk 2", "Chunk 3"]);
        assert!(source_labels(0).is_empty());
    }
}
