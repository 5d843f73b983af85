//! Retrieval over a fixed corpus.
//!
//! - **Semantic search**: exact L2 nearest neighbors over sentence
//!   embeddings, scored `1 / (1 + d)`
//! - **Keyword search**: Jaccard word-set overlap, used when no embedding
//!   backend is available
//!
//! # Architecture
//!
//! - `types`: Core types (DocId, Document, SearchResult, Retrieval, SearchMode)
//! - `vector`: Flat exact L2 index
//! - `semantic`: EmbeddingIndex (embedder + flat index)
//! - `keyword`: Word-overlap scorer
//! - `engine`: RetrievalEngine facade and the process-wide shared engine
//!
//! # Usage
//!
//! ```ignore
//! use semsearch_core::search::{shared_engine, RetrievalEngine};
//! use semsearch_core::storage::InMemoryDocumentStore;
//!
//! let engine = shared_engine(|| {
//!     RetrievalEngine::initialize(
//!         &InMemoryDocumentStore::sample(),
//!         || load_embedder(&model_dir, MiniLmConfig::default()),
//!         RetrievalConfig::default(),
//!     )
//! });
//!
//! let retrieval = engine.retrieve("healthy lifestyle tips", 5)?;
//! println!("{} results via {} in {:.1}ms", retrieval.results.len(), retrieval.mode, retrieval.elapsed_ms());
//! ```

pub mod types;

mod engine;
pub mod keyword;
mod semantic;
pub mod vector;

pub use types::{
    validate_dimension, DocId, Document, Retrieval, ScoreBand, SearchMode, SearchResult,
};

pub use crate::error::SearchError;
pub use engine::{shared_engine, try_shared_engine, EngineState, RetrievalEngine};
pub use semantic::EmbeddingIndex;
pub use vector::{distance_to_similarity, FlatL2Index, Neighbor};
