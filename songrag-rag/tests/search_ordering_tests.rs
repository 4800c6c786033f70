//! Property tests for semantic search ordering and cosine similarity.

use std::collections::HashMap;
use std::sync::Arc;

use proptest::prelude::*;
use songrag_rag::{
    EmbeddingProvider, FnEmbedder, RagEngine, Record, Retriever, RetrieverConfig,
    cosine_similarity,
};

const DIM: usize = 3;
const QUERY: &str = "query";

/// Small integer components so that equal scores (ties) are common.
fn arb_vector() -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec((-1i8..=1).prop_map(f32::from), DIM)
}

fn arb_float_vector() -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-10.0f32..10.0f32, 1..16)
}

fn records(count: usize) -> Vec<Record> {
    (0..count).map(|i| Record::new(format!("song{i}"), "artist", "genre", "mood", 2000)).collect()
}

/// Embedder that returns a fixed vector per searchable text.
fn lookup_embedder(
    records: &[Record],
    vectors: &[Vec<f32>],
    query_vector: Vec<f32>,
) -> Arc<dyn EmbeddingProvider> {
    let mut table: HashMap<String, Vec<f32>> = records
        .iter()
        .zip(vectors)
        .map(|(record, vector)| (record.searchable_text(), vector.clone()))
        .collect();
    table.insert(QUERY.to_string(), query_vector);
    Arc::new(FnEmbedder::new(DIM, move |text: &str| {
        table.get(text).cloned().ok_or_else(|| format!("no vector for '{text}'"))
    }))
}

async fn retriever_for(records: Vec<Record>, provider: Arc<dyn EmbeddingProvider>) -> Retriever {
    let engine = RagEngine::builder()
        .records(records)
        .embedding_provider(provider)
        .config(RetrieverConfig::default())
        .build()
        .await
        .unwrap();
    engine.retriever().await
}

/// *For any* corpus of size N and k ≥ N, semantic search SHALL return exactly
/// N results ordered by descending score with ties in ascending corpus order.
mod prop_semantic_search_ordering {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn returns_every_record_in_total_order(
            vectors in proptest::collection::vec(arb_vector(), 1..20),
            query in arb_vector(),
            extra in 0usize..5,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let corpus = records(vectors.len());
            let provider = lookup_embedder(&corpus, &vectors, query);
            let k = vectors.len() + extra;

            let results = rt.block_on(async {
                let retriever = retriever_for(corpus, provider).await;
                retriever.semantic_search(QUERY, k).await.unwrap()
            });

            prop_assert_eq!(results.len(), vectors.len());

            let mut ids: Vec<usize> = results.records().map(|r| r.id).collect();
            ids.sort_unstable();
            prop_assert_eq!(ids, (0..vectors.len()).collect::<Vec<_>>());

            for window in results.entries().windows(2) {
                let (a, b) = (&window[0], &window[1]);
                prop_assert!(
                    a.score > b.score || (a.score == b.score && a.record.id < b.record.id),
                    "out of order: ({}, {}) before ({}, {})",
                    a.record.id, a.score, b.record.id, b.score,
                );
            }
        }

        #[test]
        fn result_count_is_bounded_by_k(
            vectors in proptest::collection::vec(arb_vector(), 1..20),
            query in arb_vector(),
            k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let corpus = records(vectors.len());
            let provider = lookup_embedder(&corpus, &vectors, query);

            let results = rt.block_on(async {
                let retriever = retriever_for(corpus, provider).await;
                retriever.semantic_search(QUERY, k).await.unwrap()
            });

            prop_assert_eq!(results.len(), k.min(vectors.len()));
        }
    }
}

/// *For any* non-zero vectors, cosine similarity SHALL be symmetric and a
/// vector's similarity with itself SHALL be 1.0.
mod prop_cosine_similarity {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn self_similarity_is_one(v in arb_float_vector()) {
            prop_assume!(v.iter().any(|x| x.abs() > 1e-3));
            prop_assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-4);
        }

        #[test]
        fn similarity_is_symmetric(
            pair in (1usize..16).prop_flat_map(|n| (
                proptest::collection::vec(-10.0f32..10.0f32, n),
                proptest::collection::vec(-10.0f32..10.0f32, n),
            )),
        ) {
            let (a, b) = pair;
            prop_assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
        }

        #[test]
        fn similarity_stays_in_range(
            pair in (1usize..16).prop_flat_map(|n| (
                proptest::collection::vec(-10.0f32..10.0f32, n),
                proptest::collection::vec(-10.0f32..10.0f32, n),
            )),
        ) {
            let (a, b) = pair;
            let sim = cosine_similarity(&a, &b);
            prop_assert!((-1.0 - 1e-4..=1.0 + 1e-4).contains(&sim));
        }
    }
}
