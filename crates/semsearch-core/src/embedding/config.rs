//! Configuration for the MiniLM sentence-embedding model.

use crate::config::{DEFAULT_MODEL_ID, EMBEDDING_DIM};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Safetensors weights file inside a model directory.
pub const MODEL_WEIGHTS_FILE: &str = "model.safetensors";
/// HuggingFace tokenizer definition inside a model directory.
pub const TOKENIZER_FILE: &str = "tokenizer.json";
/// BERT architecture configuration inside a model directory.
pub const MODEL_CONFIG_FILE: &str = "config.json";

/// Runtime settings for [`MiniLmEmbedder`](super::MiniLmEmbedder).
///
/// Architecture parameters (layers, heads, hidden size) come from the model
/// directory's `config.json`; this struct only holds inference settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiniLmConfig {
    /// Model identifier, reported in status output
    pub model_id: String,

    /// Expected output width; the loaded model must match it
    pub embedding_dim: usize,

    /// Tokens beyond this are truncated. all-MiniLM-L6-v2 was trained with 256.
    pub max_sequence_length: usize,

    /// Whether to L2-normalize pooled embeddings
    pub normalize_embeddings: bool,

    /// Texts encoded per forward pass while building the index
    pub batch_size: usize,
}

impl Default for MiniLmConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            embedding_dim: EMBEDDING_DIM,
            max_sequence_length: 256,
            normalize_embeddings: true,
            batch_size: 32,
        }
    }
}

impl MiniLmConfig {
    /// Paths of the three model files under `model_dir`.
    pub fn asset_paths(&self, model_dir: &Path) -> [PathBuf; 3] {
        [
            model_dir.join(MODEL_CONFIG_FILE),
            model_dir.join(TOKENIZER_FILE),
            model_dir.join(MODEL_WEIGHTS_FILE),
        ]
    }

    /// Model files that don't exist under `model_dir`.
    pub fn missing_assets(&self, model_dir: &Path) -> Vec<PathBuf> {
        self.asset_paths(model_dir)
            .into_iter()
            .filter(|path| !path.is_file())
            .collect()
    }
}
