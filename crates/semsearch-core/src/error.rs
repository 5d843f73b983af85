//! Error types for semsearch-core.
//!
//! Two failure classes reach callers of the retrieval facade:
//! [`InitializationError`] when the embedding index cannot be built (the
//! engine downgrades to keyword mode) and [`SearchError`] when a single
//! query fails. [`EmbeddingError`] is the backend-level error that both are
//! built from.

use thiserror::Error;

/// Errors that can occur during embedding operations.
#[derive(Debug, Clone, Error)]
pub enum EmbeddingError {
    /// Failed to load model weights or configuration
    #[error("Failed to load model: {0}")]
    ModelLoad(String),
    /// Failed to create tensor during inference
    #[error("Failed to create tensor: {0}")]
    TensorCreation(String),
    /// Forward pass through the model failed
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    /// Failed to tokenize text
    #[error("Tokenization failed: {0}")]
    TokenizationFailed(String),
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Tokenizer not available or initialization failed
    #[error("Tokenizer unavailable: {0}")]
    TokenizerUnavailable(String),
}

/// Errors that prevent the embedding index from being built.
///
/// None of these are fatal to the process: the retrieval facade records the
/// reason and answers queries with the keyword scorer instead.
#[derive(Debug, Clone, Error)]
pub enum InitializationError {
    /// The embedding backend was not compiled into this build
    #[error("Embedding backend unavailable: {0}")]
    BackendUnavailable(String),
    /// Model files are missing or unreadable
    #[error("Model assets not found: {0}")]
    ModelAssets(String),
    /// Model or tokenizer failed to load
    #[error("Failed to load embedding model: {0}")]
    ModelLoad(String),
    /// Encoding the corpus failed
    #[error("Failed to encode corpus: {0}")]
    Encoding(String),
    /// An embedding did not have the model's output width
    #[error("Embedding dimension mismatch at document {index}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Position of the offending document
        index: usize,
        /// Model output width
        expected: usize,
        /// Width actually produced
        actual: usize,
    },
    /// There is nothing to index
    #[error("Cannot build an index over an empty corpus")]
    EmptyCorpus,
    /// Initialization did not finish within the allotted time
    #[error("Initialization timed out after {0}s")]
    Timeout(u64),
}

/// Errors for a single retrieval call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SearchError {
    /// The query could not be encoded
    #[error("Query encoding failed: {0}")]
    Encoding(String),
    /// Query vector width does not match the index
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Index dimension
        expected: usize,
        /// Query vector dimension
        actual: usize,
    },
    /// top_k must be at least 1
    #[error("Invalid top_k: {0} (must be >= 1)")]
    InvalidTopK(usize),
}

impl From<EmbeddingError> for InitializationError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::ModelLoad(_)
            | EmbeddingError::InvalidConfig(_)
            | EmbeddingError::TokenizerUnavailable(_) => {
                InitializationError::ModelLoad(err.to_string())
            }
            _ => InitializationError::Encoding(err.to_string()),
        }
    }
}

impl From<EmbeddingError> for SearchError {
    fn from(err: EmbeddingError) -> Self {
        SearchError::Encoding(err.to_string())
    }
}
