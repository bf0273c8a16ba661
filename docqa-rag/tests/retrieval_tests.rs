//! Property tests for per-document retrieval ordering.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use docqa_rag::embedding::{EmbeddingProvider, cosine_similarity};
use docqa_rag::error::{RagError, Result};
use docqa_rag::index::IndexStore;
use docqa_rag::inmemory::InMemoryVectorStore;
use proptest::prelude::*;

/// Embeds each known text as a fixed vector.
struct TableEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    dimensions: usize,
}

#[async_trait]
impl EmbeddingProvider for TableEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.vectors.get(text).cloned().ok_or_else(|| RagError::EmbeddingError {
            provider: "table".into(),
            message: format!("unknown text {text:?}"),
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        "table"
    }
}

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero embedding", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-8 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

/// Embeddings drawn from a tiny pool so that equal scores are common.
fn arb_pooled_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    (0..3usize).prop_map(move |slot| {
        let mut v = vec![0.0; dim];
        v[slot % dim] = 1.0;
        v
    })
}

fn retrieve(
    chunk_embeddings: Vec<Vec<f32>>,
    query: Vec<f32>,
    top_k: usize,
    dim: usize,
) -> Vec<docqa_rag::SearchResult> {
    let texts: Vec<String> = (0..chunk_embeddings.len()).map(|i| format!("chunk {i}")).collect();
    let mut vectors: HashMap<String, Vec<f32>> =
        texts.iter().cloned().zip(chunk_embeddings).collect();
    vectors.insert("query".to_string(), query);

    let store = IndexStore::new(
        Arc::new(TableEmbedder { vectors, dimensions: dim }),
        Arc::new(InMemoryVectorStore::new()),
    );
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        store.build(1, texts).await.unwrap();
        store.retrieve(1, "query", top_k).await.unwrap()
    })
}

/// *For any* document index and query, retrieval SHALL return
/// `min(top_k, chunk_count)` results ordered by descending cosine similarity,
/// with equal scores in document order, and no chunk outside the result set
/// SHALL score higher than the last returned chunk.
mod prop_retrieval_ordering {
    use super::*;

    const DIM: usize = 8;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_bounded_by_top_k(
            chunks in proptest::collection::vec(arb_normalized_embedding(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            top_k in 1usize..25,
        ) {
            let count = chunks.len();
            let scores: Vec<f32> = chunks.iter().map(|c| cosine_similarity(&query, c)).collect();
            let results = retrieve(chunks, query, top_k, DIM);

            prop_assert_eq!(results.len(), top_k.min(count));
            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }

            if let Some(last) = results.last() {
                let returned: Vec<usize> = results.iter().map(|r| r.chunk.index).collect();
                for (i, score) in scores.iter().enumerate() {
                    if !returned.contains(&i) {
                        prop_assert!(*score <= last.score);
                    }
                }
            }
        }

        #[test]
        fn ties_keep_document_order(
            chunks in proptest::collection::vec(arb_pooled_embedding(DIM), 1..15),
            query in arb_pooled_embedding(DIM),
            top_k in 1usize..20,
        ) {
            let results = retrieve(chunks, query, top_k, DIM);
            for window in results.windows(2) {
                if window[0].score == window[1].score {
                    prop_assert!(window[0].chunk.index < window[1].chunk.index);
                }
            }
        }
    }
}
