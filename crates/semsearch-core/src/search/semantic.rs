// EmbeddingIndex - text embedder plus exact L2 index over the corpus

use super::types::{validate_dimension, Document, SearchError, SearchResult};
use super::vector::{distance_to_similarity, FlatL2Index};
use crate::embedding::TextEmbedder;
use crate::error::InitializationError;
use crate::metrics::global_metrics;
use std::sync::Arc;
use tracing::{info, instrument};

/// Semantic search over a fixed corpus.
///
/// Built once from the full document list; immutable afterwards, so `search`
/// takes `&self` and can run from many threads at once.
pub struct EmbeddingIndex {
    /// Model used for both corpus and query encoding
    embedder: Arc<dyn TextEmbedder>,
    /// Exact index; row `i` is the embedding of `documents[i]`
    index: FlatL2Index,
    /// Corpus in index order
    documents: Vec<Document>,
    /// Document embeddings, parallel to `documents`
    embeddings: Vec<Vec<f32>>,
}

impl std::fmt::Debug for EmbeddingIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingIndex")
            .field("model_id", &self.embedder.model_id())
            .field("dimension", &self.index.dimension())
            .field("documents", &self.documents.len())
            .finish()
    }
}

impl EmbeddingIndex {
    /// Encodes every document and builds the index.
    ///
    /// # Errors
    ///
    /// - `InitializationError::EmptyCorpus` if `documents` is empty
    /// - `InitializationError::Encoding` if the embedder fails or returns the
    ///   wrong number of vectors
    /// - `InitializationError::DimensionMismatch` if any vector's width
    ///   differs from `embedder.embedding_dim()`
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub fn build(
        embedder: Arc<dyn TextEmbedder>,
        documents: Vec<Document>,
    ) -> Result<Self, InitializationError> {
        if documents.is_empty() {
            return Err(InitializationError::EmptyCorpus);
        }

        let start = instant::Instant::now();
        let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
        let embeddings = embedder.embed_batch(&texts)?;

        if embeddings.len() != documents.len() {
            return Err(InitializationError::Encoding(format!(
                "Embedder returned {} vectors for {} documents",
                embeddings.len(),
                documents.len()
            )));
        }

        let dimension = embedder.embedding_dim();
        for (i, embedding) in embeddings.iter().enumerate() {
            if embedding.len() != dimension {
                return Err(InitializationError::DimensionMismatch {
                    index: i,
                    expected: dimension,
                    actual: embedding.len(),
                });
            }
        }

        let mut index = FlatL2Index::new(dimension);
        index
            .add_all(&embeddings)
            .map_err(|e| InitializationError::Encoding(e.to_string()))?;

        let build_ms = start.elapsed().as_secs_f64() * 1000.0;
        global_metrics().record_index_build(build_ms);
        info!(
            "Built embedding index: {} documents, {}d, {:.1}ms",
            documents.len(),
            dimension,
            build_ms
        );

        Ok(Self {
            embedder,
            index,
            documents,
            embeddings,
        })
    }

    /// Returns the `top_k` documents closest to `query`, best first.
    ///
    /// Scores are `1 / (1 + d)` for squared L2 distance `d`. Ties on distance
    /// keep corpus order. An empty or whitespace-only query returns no
    /// results.
    ///
    /// # Errors
    ///
    /// - `SearchError::Encoding` if the query cannot be embedded
    /// - `SearchError::DimensionMismatch` if the query vector has the wrong width
    #[instrument(skip_all, fields(top_k = top_k))]
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>, SearchError> {
        if query.trim().is_empty() || top_k == 0 {
            return Ok(vec![]);
        }

        let query_embedding = self.embedder.embed(query)?;
        validate_dimension(self.index.dimension(), query_embedding.len())?;

        let neighbors = self.index.search(&query_embedding, top_k)?;

        Ok(neighbors
            .into_iter()
            .filter_map(|neighbor| {
                self.documents.get(neighbor.index).map(|doc| SearchResult {
                    doc_id: doc.id,
                    text: doc.text.clone(),
                    score: distance_to_similarity(neighbor.distance),
                    distance: Some(neighbor.distance),
                })
            })
            .collect())
    }

    pub fn model_id(&self) -> &str {
        self.embedder.model_id()
    }

    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Document embeddings in corpus order.
    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }
}
