//! Trait for text embedding models.

use crate::error::EmbeddingError;

/// Encodes text into fixed-width embedding vectors.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: a built index holds its embedder
/// and may be queried from several threads at once.
///
/// # Examples
///
/// ```ignore
/// let embedder: Arc<dyn TextEmbedder> = load_embedder(dir, MiniLmConfig::default())?;
/// let embedding = embedder.embed("cloud computing")?;
/// assert_eq!(embedding.len(), embedder.embedding_dim());
/// ```
pub trait TextEmbedder: Send + Sync {
    /// Returns the model identifier (e.g., "sentence-transformers/all-MiniLM-L6-v2").
    fn model_id(&self) -> &str;

    /// Returns the embedding dimension. Every vector produced has this length.
    fn embedding_dim(&self) -> usize;

    /// Encodes a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Encodes several texts, one vector per input in input order.
    ///
    /// The default calls [`embed`](Self::embed) per text; backends with real
    /// batching should override it.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}
