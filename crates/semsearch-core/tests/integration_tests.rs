//! End-to-end tests for the retrieval facade over the sample corpus.
//!
//! Most tests use a deterministic trigram embedder so they run without model
//! files. The MiniLM tests at the bottom run only when `SEMSEARCH_MODEL_DIR`
//! points at a directory with `config.json`, `tokenizer.json` and
//! `model.safetensors`; otherwise they return early.

mod common;

use common::*;
use semsearch_core::config::{RetrievalConfig, EMBEDDING_DIM};
use semsearch_core::error::InitializationError;
use semsearch_core::search::{RetrievalEngine, ScoreBand, SearchError, SearchMode};
use semsearch_core::storage::{DocumentStore, InMemoryDocumentStore, SAMPLE_DOCUMENTS};
use std::sync::Arc;
use std::thread;

// ============================================================================
// Semantic mode
// ============================================================================

#[test]
fn test_semantic_engine_over_sample_corpus() {
    let engine = sample_engine(trigram_loader);
    assert_eq!(engine.mode(), SearchMode::Semantic);
    assert_eq!(engine.documents().len(), SAMPLE_DOCUMENTS.len());

    let retrieval = engine.retrieve(SAMPLE_DOCUMENTS[3], 5).unwrap();
    assert_eq!(retrieval.mode, SearchMode::Semantic);
    assert_eq!(retrieval.results.len(), 5);

    // Exact text has distance 0 and similarity 1
    let best = &retrieval.results[0];
    assert_eq!(best.text, SAMPLE_DOCUMENTS[3]);
    assert_eq!(best.doc_id.index(), 3);
    assert!(best.distance.unwrap().abs() < 1e-5);
    assert!((best.score - 1.0).abs() < 1e-5);
    assert_eq!(best.band(), ScoreBand::High);
}

#[test]
fn test_semantic_results_sorted_and_bounded() {
    let engine = sample_engine(trigram_loader);

    for top_k in [1, 3, 20, 50] {
        let retrieval = engine.retrieve("healthy food and exercise", top_k).unwrap();
        assert_eq!(retrieval.results.len(), top_k.min(SAMPLE_DOCUMENTS.len()));

        for pair in retrieval.results.windows(2) {
            assert!(pair[0].distance.unwrap() <= pair[1].distance.unwrap());
            assert!(pair[0].score >= pair[1].score);
        }
        for result in &retrieval.results {
            assert!(result.distance.unwrap() >= 0.0);
            assert!(result.score > 0.0 && result.score <= 1.0);
        }
    }
}

#[test]
fn test_empty_query_returns_nothing_in_both_modes() {
    for engine in [sample_engine(trigram_loader), sample_engine(unavailable_loader)] {
        let retrieval = engine.retrieve("", 5).unwrap();
        assert!(retrieval.is_empty());
        assert!(retrieval.diagnostic.is_none());
    }
}

#[test]
fn test_zero_top_k_is_rejected_in_both_modes() {
    for engine in [sample_engine(trigram_loader), sample_engine(unavailable_loader)] {
        assert_eq!(
            engine.retrieve("anything", 0).unwrap_err(),
            SearchError::InvalidTopK(0)
        );
    }
}

// ============================================================================
// Keyword fallback
// ============================================================================

#[test]
fn test_missing_backend_falls_back_to_keyword() {
    let engine = sample_engine(unavailable_loader);
    assert_eq!(engine.mode(), SearchMode::Keyword);
    assert!(engine.model_id().is_none());
    assert!(matches!(
        engine.unavailable_reason(),
        Some(InitializationError::BackendUnavailable(_))
    ));

    let retrieval = engine.retrieve("machine learning", 5).unwrap();
    assert_eq!(retrieval.mode, SearchMode::Keyword);
    assert!(!retrieval.is_empty());
    assert!(retrieval.results[0].text.contains("Machine learning"));
    assert!(retrieval.results.iter().all(|r| r.distance.is_none()));
}

#[test]
fn test_keyword_cat_mat_example() {
    let engine = RetrievalEngine::initialize(
        &pair_store(),
        unavailable_loader,
        RetrievalConfig::default(),
    );

    let retrieval = engine.retrieve("cat mat", 5).unwrap();
    assert_eq!(retrieval.results.len(), 1);
    assert_eq!(retrieval.results[0].text, "cat sat on mat");
    assert_eq!(retrieval.results[0].score, 0.5);
}

#[test]
fn test_keyword_never_pads_results() {
    let store = pair_store();
    let engine = RetrievalEngine::initialize(&store, unavailable_loader, RetrievalConfig::default());

    // Each document matches one query word
    let retrieval = engine.retrieve("cat dog", 10).unwrap();
    assert_eq!(retrieval.results.len(), store.len());
}

#[test]
fn test_missing_model_assets_fall_back() {
    let dir = std::env::temp_dir().join("semsearch-missing-model");
    let engine = RetrievalEngine::initialize(
        &InMemoryDocumentStore::sample(),
        || semsearch_core::embedding::load_embedder(&dir, Default::default()),
        RetrievalConfig::default(),
    );

    assert_eq!(engine.mode(), SearchMode::Keyword);
    assert!(matches!(
        engine.unavailable_reason(),
        Some(InitializationError::ModelAssets(_))
    ));
}

#[test]
fn test_empty_corpus_falls_back() {
    let store = InMemoryDocumentStore::from_texts(Vec::<String>::new());
    let engine = RetrievalEngine::initialize(&store, trigram_loader, RetrievalConfig::default());

    assert_eq!(engine.mode(), SearchMode::Keyword);
    assert!(matches!(
        engine.unavailable_reason(),
        Some(InitializationError::EmptyCorpus)
    ));
    assert!(engine.retrieve("anything", 5).unwrap().is_empty());
}

// ============================================================================
// Per-call degradation
// ============================================================================

#[test]
fn test_query_failure_degrades_single_call() {
    let trigger = "this query breaks the encoder".to_string();
    let engine = RetrievalEngine::initialize(
        &InMemoryDocumentStore::sample(),
        || Ok(Arc::new(FlakyEmbedder { trigger: trigger.clone() }) as _),
        RetrievalConfig::default(),
    );

    let failed = engine.retrieve(&trigger, 5).unwrap();
    assert!(failed.is_empty());
    assert!(matches!(failed.diagnostic, Some(SearchError::Encoding(_))));

    let ok = engine.retrieve("solar power", 5).unwrap();
    assert_eq!(ok.mode, SearchMode::Semantic);
    assert_eq!(ok.results.len(), 5);
}

#[test]
fn test_query_failure_with_keyword_policy() {
    let trigger = "renewable energy".to_string();
    let engine = RetrievalEngine::initialize(
        &InMemoryDocumentStore::sample(),
        || Ok(Arc::new(FlakyEmbedder { trigger: trigger.clone() }) as _),
        RetrievalConfig::default().with_keyword_fallback(),
    );

    let retrieval = engine.retrieve(&trigger, 5).unwrap();
    assert_eq!(retrieval.mode, SearchMode::Keyword);
    assert!(retrieval.diagnostic.is_some());
    assert_eq!(retrieval.results[0].text, SAMPLE_DOCUMENTS[3]);
    assert_eq!(engine.mode(), SearchMode::Semantic);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_readers_share_engine() {
    let engine = Arc::new(sample_engine(trigram_loader));
    let expected = engine.retrieve("space exploration", 3).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.retrieve("space exploration", 3).unwrap())
        })
        .collect();

    for handle in handles {
        let retrieval = handle.join().unwrap();
        let texts: Vec<_> = retrieval.results.iter().map(|r| &r.text).collect();
        let expected_texts: Vec<_> = expected.results.iter().map(|r| &r.text).collect();
        assert_eq!(texts, expected_texts);
    }
}

// ============================================================================
// MiniLM (requires SEMSEARCH_MODEL_DIR)
// ============================================================================

#[cfg(feature = "candle")]
#[test]
fn test_minilm_semantic_ranking() {
    let Some(dir) = model_dir() else {
        eprintln!("SEMSEARCH_MODEL_DIR not set or incomplete; skipping");
        return;
    };

    let engine = RetrievalEngine::initialize(
        &InMemoryDocumentStore::sample(),
        || semsearch_core::embedding::load_embedder(&dir, Default::default()),
        RetrievalConfig::default(),
    );
    assert_eq!(engine.mode(), SearchMode::Semantic);

    let retrieval = engine.retrieve("healthy lifestyle tips", 3).unwrap();
    let texts: Vec<&str> = retrieval.results.iter().map(|r| r.text.as_str()).collect();
    assert!(
        texts.iter().any(|t| t.contains("exercise") || t.contains("nutrition")),
        "unexpected results: {texts:?}"
    );
}

#[cfg(feature = "candle")]
#[test]
fn test_minilm_embedding_shape() {
    let Some(dir) = model_dir() else {
        return;
    };

    let embedder = semsearch_core::embedding::load_embedder(&dir, Default::default()).unwrap();
    let embedding = embedder.embed("The weather today is sunny").unwrap();
    assert_eq!(embedding.len(), EMBEDDING_DIM);

    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-3);
}
