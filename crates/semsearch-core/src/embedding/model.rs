//! MiniLM sentence-embedding model.
//!
//! BERT encoder (all-MiniLM-L6-v2) run with Candle, followed by
//! attention-masked mean pooling and optional L2 normalization, which
//! reproduces the sentence-transformers pipeline for this model.

use super::config::{MiniLmConfig, MODEL_CONFIG_FILE, MODEL_WEIGHTS_FILE, TOKENIZER_FILE};
use super::tokenizer::{TokenBatch, TokenizerHandle};
use super::traits::TextEmbedder;
use crate::error::EmbeddingError;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use std::path::Path;
use tracing::{debug, info, instrument};

/// MiniLM embedding model.
///
/// # Examples
///
/// ```ignore
/// let embedder = MiniLmEmbedder::from_dir(Path::new("models/all-MiniLM-L6-v2"), MiniLmConfig::default())?;
/// let embedding = embedder.embed("data analytics")?;
/// assert_eq!(embedding.len(), 384);
/// ```
pub struct MiniLmEmbedder {
    model: BertModel,
    tokenizer: TokenizerHandle,
    config: MiniLmConfig,
    device: Device,
}

impl MiniLmEmbedder {
    /// Loads the model, tokenizer and architecture config from `model_dir`.
    ///
    /// # Errors
    ///
    /// - `EmbeddingError::ModelLoad` if the config or weights can't be read,
    ///   or the model width differs from `config.embedding_dim`
    /// - `EmbeddingError::TokenizerUnavailable` if the tokenizer can't be loaded
    pub fn from_dir(model_dir: &Path, config: MiniLmConfig) -> Result<Self, EmbeddingError> {
        info!("Loading embedding model '{}'", config.model_id);

        let config_path = model_dir.join(MODEL_CONFIG_FILE);
        let config_bytes = std::fs::read(&config_path).map_err(|e| {
            EmbeddingError::ModelLoad(format!("Failed to read {}: {}", config_path.display(), e))
        })?;
        let bert_config: BertConfig = serde_json::from_slice(&config_bytes)
            .map_err(|e| EmbeddingError::ModelLoad(format!("Invalid model config: {}", e)))?;

        if bert_config.hidden_size != config.embedding_dim {
            return Err(EmbeddingError::ModelLoad(format!(
                "Model hidden size {} does not match expected embedding dimension {}",
                bert_config.hidden_size, config.embedding_dim
            )));
        }

        let tokenizer =
            TokenizerHandle::from_file(&model_dir.join(TOKENIZER_FILE), config.max_sequence_length)?;

        let weights_path = model_dir.join(MODEL_WEIGHTS_FILE);
        let weights = std::fs::read(&weights_path).map_err(|e| {
            EmbeddingError::ModelLoad(format!("Failed to read {}: {}", weights_path.display(), e))
        })?;
        info!(
            "Model weights: {:.2}MB, {} layers, {}d hidden",
            weights.len() as f64 / 1_000_000.0,
            bert_config.num_hidden_layers,
            bert_config.hidden_size
        );

        let device = Self::select_device();
        let model = Self::create_model(weights, &bert_config, &device)?;

        Ok(Self {
            model,
            tokenizer,
            config,
            device,
        })
    }

    /// Returns a reference to the config.
    pub fn config(&self) -> &MiniLmConfig {
        &self.config
    }

    /// Selects the best available compute device.
    pub fn select_device() -> Device {
        if let Ok(cuda_device) = Device::new_cuda(0) {
            info!("Using CUDA GPU");
            return cuda_device;
        }

        if let Ok(metal_device) = Device::new_metal(0) {
            info!("Using Metal GPU");
            return metal_device;
        }

        info!("Using CPU");
        Device::Cpu
    }

    /// Builds the BertModel from safetensors bytes.
    fn create_model(
        weights: Vec<u8>,
        config: &BertConfig,
        device: &Device,
    ) -> Result<BertModel, EmbeddingError> {
        if weights.len() < 8 {
            return Err(EmbeddingError::ModelLoad(
                "Model file too small".to_string(),
            ));
        }

        let vb = VarBuilder::from_buffered_safetensors(weights, DTYPE, device).map_err(|e| {
            EmbeddingError::ModelLoad(format!("Failed to create VarBuilder: {}", e))
        })?;

        BertModel::load(vb, config)
            .map_err(|e| EmbeddingError::ModelLoad(format!("Failed to create BertModel: {}", e)))
    }

    /// Runs one forward pass over a padded batch and pools to `[batch, hidden]`.
    fn forward_batch(&self, batch: TokenBatch) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let shape = (batch.batch_size, batch.seq_len);
        let input_ids = Tensor::from_vec(batch.input_ids, shape, &self.device)
            .map_err(|e| EmbeddingError::TensorCreation(format!("input ids: {}", e)))?;
        let token_type_ids = Tensor::from_vec(batch.token_type_ids, shape, &self.device)
            .map_err(|e| EmbeddingError::TensorCreation(format!("token type ids: {}", e)))?;
        let attention_mask = Tensor::from_vec(batch.attention_mask, shape, &self.device)
            .map_err(|e| EmbeddingError::TensorCreation(format!("attention mask: {}", e)))?;

        // [batch, seq_len] -> [batch, seq_len, hidden]
        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(|e| EmbeddingError::InferenceFailed(format!("Forward pass failed: {}", e)))?;

        let pooled = Self::masked_mean_pool(&hidden, &attention_mask)?;
        let pooled = if self.config.normalize_embeddings {
            Self::normalize_l2(&pooled)?
        } else {
            pooled
        };

        pooled
            .to_vec2::<f32>()
            .map_err(|e| EmbeddingError::InferenceFailed(format!("Failed to convert to vec: {}", e)))
    }

    /// Averages token embeddings, ignoring padding positions.
    fn masked_mean_pool(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor, EmbeddingError> {
        let infer = |e: candle_core::Error| EmbeddingError::InferenceFailed(e.to_string());

        // [batch, seq_len] -> [batch, seq_len, 1]
        let mask = attention_mask
            .to_dtype(DType::F32)
            .and_then(|m| m.unsqueeze(2))
            .map_err(infer)?;
        let summed = hidden
            .broadcast_mul(&mask)
            .and_then(|t| t.sum(1))
            .map_err(infer)?;
        // Every row has at least [CLS] and [SEP], so the count is never zero.
        let counts = mask.sum(1).map_err(infer)?;
        summed.broadcast_div(&counts).map_err(infer)
    }

    /// Applies L2 normalization to create unit vectors.
    fn normalize_l2(v: &Tensor) -> Result<Tensor, EmbeddingError> {
        let infer = |e: candle_core::Error| EmbeddingError::InferenceFailed(e.to_string());
        let norms = v
            .sqr()
            .and_then(|s| s.sum_keepdim(1))
            .and_then(|s| s.sqrt())
            .map_err(infer)?;
        v.broadcast_div(&norms).map_err(infer)
    }
}

impl TextEmbedder for MiniLmEmbedder {
    fn model_id(&self) -> &str {
        &self.config.model_id
    }

    fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| EmbeddingError::InferenceFailed("Model returned no embedding".into()))
    }

    #[instrument(skip_all, fields(batch = texts.len()))]
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let mut embeddings = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.config.batch_size.max(1)) {
            let batch = self.tokenizer.encode_batch(chunk)?;
            debug!("Encoding {} texts ({} tokens each)", batch.batch_size, batch.seq_len);
            embeddings.extend(self.forward_batch(batch)?);
        }

        Ok(embeddings)
    }
}
