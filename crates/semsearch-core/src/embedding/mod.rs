//! Text embedding abstractions and the MiniLM backend.
//!
//! ## Core Trait
//!
//! - [`TextEmbedder`] - encode text into fixed-width vectors
//!
//! ## Implementations
//!
//! - [`MiniLmEmbedder`] - all-MiniLM-L6-v2 via Candle (feature `candle`)
//! - [`TokenizerHandle`] - HuggingFace tokenizer with truncation (feature `candle`)
//!
//! ## Example
//!
//! ```ignore
//! use semsearch_core::embedding::{load_embedder, MiniLmConfig};
//!
//! let embedder = load_embedder(Path::new("models/all-MiniLM-L6-v2"), MiniLmConfig::default())?;
//! let embedding = embedder.embed("renewable energy")?;
//! assert_eq!(embedding.len(), embedder.embedding_dim());
//! ```

mod traits;

pub mod config;
#[cfg(feature = "candle")]
pub mod model;
#[cfg(feature = "candle")]
pub mod tokenizer;

pub use config::MiniLmConfig;
#[cfg(feature = "candle")]
pub use model::MiniLmEmbedder;
#[cfg(feature = "candle")]
pub use tokenizer::TokenizerHandle;
pub use traits::TextEmbedder;

use crate::error::InitializationError;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Loads the default embedding backend from a model directory.
///
/// The directory must contain `config.json`, `tokenizer.json` and
/// `model.safetensors`.
///
/// # Errors
///
/// - `InitializationError::BackendUnavailable` when built without the
///   `candle` feature
/// - `InitializationError::ModelAssets` when files are missing
/// - `InitializationError::ModelLoad` when the files cannot be parsed
pub fn load_embedder(
    model_dir: &Path,
    config: MiniLmConfig,
) -> Result<Arc<dyn TextEmbedder>, InitializationError> {
    let missing = config.missing_assets(model_dir);
    if !missing.is_empty() {
        let names: Vec<String> = missing.iter().map(|p| p.display().to_string()).collect();
        return Err(InitializationError::ModelAssets(names.join(", ")));
    }

    load_backend(model_dir, config)
}

#[cfg(feature = "candle")]
fn load_backend(
    model_dir: &Path,
    config: MiniLmConfig,
) -> Result<Arc<dyn TextEmbedder>, InitializationError> {
    info!("Loading embedding model from {}", model_dir.display());
    let embedder = MiniLmEmbedder::from_dir(model_dir, config)?;
    Ok(Arc::new(embedder))
}

#[cfg(not(feature = "candle"))]
fn load_backend(
    model_dir: &Path,
    _config: MiniLmConfig,
) -> Result<Arc<dyn TextEmbedder>, InitializationError> {
    info!(
        "Embedding assets present at {} but no backend is compiled in",
        model_dir.display()
    );
    Err(InitializationError::BackendUnavailable(
        "built without the `candle` feature".to_string(),
    ))
}
