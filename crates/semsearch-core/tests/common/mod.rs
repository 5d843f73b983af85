//! Shared fixtures for integration tests.

#![allow(dead_code)]

use semsearch_core::embedding::TextEmbedder;
use semsearch_core::error::{EmbeddingError, InitializationError};
use semsearch_core::search::RetrievalEngine;
use semsearch_core::storage::{DocumentStore, InMemoryDocumentStore};
use semsearch_core::config::RetrievalConfig;
use semsearch_core::metrics::RetrievalMetrics;
use std::path::PathBuf;
use std::sync::Arc;

pub const TEST_DIM: usize = 64;

/// Character-trigram embedder; similar spellings land close together.
pub struct TrigramEmbedder;

impl TextEmbedder for TrigramEmbedder {
    fn model_id(&self) -> &str {
        "test/trigram"
    }

    fn embedding_dim(&self) -> usize {
        TEST_DIM
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut v = vec![0.0f32; TEST_DIM];
        let chars: Vec<char> = text.to_lowercase().chars().collect();
        for window in chars.windows(3) {
            let hash = window
                .iter()
                .fold(17u32, |h, c| h.wrapping_mul(31).wrapping_add(*c as u32));
            v[hash as usize % TEST_DIM] += 1.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(v)
    }
}

/// Embedder that fails for one exact text and otherwise defers to trigrams.
pub struct FlakyEmbedder {
    pub trigger: String,
}

impl TextEmbedder for FlakyEmbedder {
    fn model_id(&self) -> &str {
        "test/flaky"
    }

    fn embedding_dim(&self) -> usize {
        TEST_DIM
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text == self.trigger {
            return Err(EmbeddingError::InferenceFailed("injected failure".into()));
        }
        TrigramEmbedder.embed(text)
    }
}

pub fn trigram_loader() -> Result<Arc<dyn TextEmbedder>, InitializationError> {
    Ok(Arc::new(TrigramEmbedder))
}

pub fn unavailable_loader() -> Result<Arc<dyn TextEmbedder>, InitializationError> {
    Err(InitializationError::BackendUnavailable(
        "embedding backend not compiled in".into(),
    ))
}

pub fn sample_engine(
    loader: impl FnOnce() -> Result<Arc<dyn TextEmbedder>, InitializationError>,
) -> RetrievalEngine {
    RetrievalEngine::initialize(
        &InMemoryDocumentStore::sample(),
        loader,
        RetrievalConfig::default(),
    )
    .with_metrics(RetrievalMetrics::new())
}

pub fn pair_store() -> impl DocumentStore {
    InMemoryDocumentStore::from_texts(["cat sat on mat", "dog ran in park"])
}

/// Model directory from `SEMSEARCH_MODEL_DIR`, if it holds all assets.
pub fn model_dir() -> Option<PathBuf> {
    let dir = PathBuf::from(std::env::var_os("SEMSEARCH_MODEL_DIR")?);
    semsearch_core::embedding::MiniLmConfig::default()
        .missing_assets(&dir)
        .is_empty()
        .then_some(dir)
}
