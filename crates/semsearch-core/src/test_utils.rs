//! Test embedders for unit tests.
//!
//! Deterministic stand-ins for the MiniLM backend so index and facade logic
//! can be tested without model files.

use crate::embedding::TextEmbedder;
use crate::error::EmbeddingError;

/// Bag-of-words embedder: each lower-cased word adds 1.0 to a hashed bucket,
/// then the vector is L2-normalized. Identical texts embed identically.
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

fn fnv1a(word: &str) -> u64 {
    word.bytes().fold(0xcbf29ce484222325, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(0x100000001b3)
    })
}

impl TextEmbedder for HashingEmbedder {
    fn model_id(&self) -> &str {
        "test/hashing"
    }

    fn embedding_dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut v = vec![0.0f32; self.dim];
        for word in text.split_whitespace() {
            let bucket = (fnv1a(&word.to_lowercase()) % self.dim as u64) as usize;
            v[bucket] += 1.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(v)
    }
}

/// Returns the same vector for every input, whatever `dim` it claims.
pub struct FixedEmbedder {
    dim: usize,
    vector: Vec<f32>,
}

impl FixedEmbedder {
    pub fn new(dim: usize, vector: Vec<f32>) -> Self {
        Self { dim, vector }
    }
}

impl TextEmbedder for FixedEmbedder {
    fn model_id(&self) -> &str {
        "test/fixed"
    }

    fn embedding_dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.vector.clone())
    }
}

/// Fails on every input, or only on one trigger text.
pub struct FailingEmbedder {
    trigger: Option<String>,
    inner: HashingEmbedder,
}

impl FailingEmbedder {
    pub fn always(dim: usize) -> Self {
        Self {
            trigger: None,
            inner: HashingEmbedder::new(dim),
        }
    }

    pub fn on_query(trigger: &str, dim: usize) -> Self {
        Self {
            trigger: Some(trigger.to_string()),
            inner: HashingEmbedder::new(dim),
        }
    }
}

impl TextEmbedder for FailingEmbedder {
    fn model_id(&self) -> &str {
        "test/failing"
    }

    fn embedding_dim(&self) -> usize {
        self.inner.embedding_dim()
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.trigger {
            Some(trigger) if trigger != text => self.inner.embed(text),
            _ => Err(EmbeddingError::InferenceFailed(
                "simulated backend failure".to_string(),
            )),
        }
    }
}
