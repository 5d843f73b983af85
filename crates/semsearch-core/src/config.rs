//! Configuration constants and runtime settings.
//!
//! # Usage
//!
//! ```
//! use semsearch_core::config::{RetrievalConfig, DEFAULT_TOP_K, EMBEDDING_DIM};
//!
//! let embedding = vec![0.0f32; EMBEDDING_DIM];
//! let config = RetrievalConfig::default();
//! assert_eq!(config.default_top_k, DEFAULT_TOP_K);
//! # let _ = embedding;
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// Embedding Model
// =============================================================================

/// Embedding vector dimension (all-MiniLM-L6-v2 hidden_size).
pub const EMBEDDING_DIM: usize = 384;

/// HuggingFace identifier of the default sentence-embedding model.
pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

// =============================================================================
// Retrieval
// =============================================================================

/// Number of results returned when the caller does not ask for a count.
pub const DEFAULT_TOP_K: usize = 5;

/// Upper bound offered by interactive front ends. The core accepts any
/// `top_k >= 1` and caps it at the corpus size.
pub const MAX_INTERACTIVE_TOP_K: usize = 10;

// =============================================================================
// Presentation
// =============================================================================

/// Scores strictly above this are shown as strong matches.
///
/// Tuned against the `1 / (1 + d)` distance transform; changing the transform
/// invalidates both thresholds.
pub const HIGH_SCORE_THRESHOLD: f32 = 0.7;

/// Scores strictly above this (and not above [`HIGH_SCORE_THRESHOLD`]) are
/// shown as moderate matches.
pub const MEDIUM_SCORE_THRESHOLD: f32 = 0.5;

/// Query words must be longer than this many characters to be highlighted.
pub const HIGHLIGHT_MIN_WORD_CHARS: usize = 2;

/// What a semantic retrieval does when the query cannot be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradePolicy {
    /// Return no results for that call, with the error as a diagnostic.
    #[default]
    EmptyWithDiagnostic,
    /// Answer that call with the keyword scorer, keeping the diagnostic.
    FallbackToKeyword,
}

/// Runtime settings for the retrieval facade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Result count used by callers that don't specify one
    pub default_top_k: usize,
    /// Behavior when a semantic query fails at runtime
    pub degrade_policy: DegradePolicy,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_top_k: DEFAULT_TOP_K,
            degrade_policy: DegradePolicy::default(),
        }
    }
}

impl RetrievalConfig {
    /// Returns a config that answers failed semantic queries with keyword search.
    pub fn with_keyword_fallback(mut self) -> Self {
        self.degrade_policy = DegradePolicy::FallbackToKeyword;
        self
    }
}
