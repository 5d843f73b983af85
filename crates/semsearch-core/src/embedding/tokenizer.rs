//! Tokenization for the BERT encoder.
//!
//! [`TokenizerHandle`] wraps a HuggingFace tokenizer with truncation
//! configured and produces padded batches with attention masks.

use crate::error::EmbeddingError;
use std::path::Path;
use tokenizers::tokenizer::{Tokenizer, TruncationDirection, TruncationParams, TruncationStrategy};

/// Token ids for a batch of texts, padded to the longest sequence.
///
/// All three vectors are row-major `[batch_size, seq_len]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBatch {
    pub input_ids: Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub token_type_ids: Vec<u32>,
    pub batch_size: usize,
    pub seq_len: usize,
}

/// Handle for a configured tokenizer.
pub struct TokenizerHandle {
    tokenizer: Tokenizer,
    max_length: usize,
}

impl TokenizerHandle {
    /// Loads `tokenizer.json` and configures right-truncation at `max_length`.
    ///
    /// # Errors
    ///
    /// Returns `EmbeddingError::TokenizerUnavailable` if the file can't be parsed.
    pub fn from_file(path: &Path, max_length: usize) -> Result<Self, EmbeddingError> {
        let mut tokenizer = Tokenizer::from_file(path).map_err(|e| {
            EmbeddingError::TokenizerUnavailable(format!(
                "Failed to load tokenizer from {}: {}",
                path.display(),
                e
            ))
        })?;

        configure_truncation(&mut tokenizer, max_length)?;

        Ok(Self {
            tokenizer,
            max_length,
        })
    }

    /// Returns the configured maximum length.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Tokenizes texts (with special tokens) and pads them into one batch.
    pub fn encode_batch(&self, texts: &[&str]) -> Result<TokenBatch, EmbeddingError> {
        let mut rows = Vec::with_capacity(texts.len());
        for text in texts {
            let encoding = self
                .tokenizer
                .encode(*text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed(e.to_string()))?;
            rows.push((
                encoding.get_ids().to_vec(),
                encoding.get_attention_mask().to_vec(),
                encoding.get_type_ids().to_vec(),
            ));
        }

        Ok(pad_batch(rows))
    }

    /// Returns the vocabulary size.
    pub fn vocab_size(&self) -> usize {
        self.tokenizer.get_vocab_size(true)
    }
}

/// Configures tokenizer with truncation settings.
fn configure_truncation(
    tokenizer: &mut Tokenizer,
    max_length: usize,
) -> Result<(), EmbeddingError> {
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            stride: 0,
            strategy: TruncationStrategy::OnlyFirst,
            direction: TruncationDirection::Right,
        }))
        .map_err(|e| {
            EmbeddingError::InvalidConfig(format!(
                "Failed to configure tokenizer truncation: {}",
                e
            ))
        })?;

    Ok(())
}

/// Right-pads every row with zeros (mask 0) to the longest row.
fn pad_batch(rows: Vec<(Vec<u32>, Vec<u32>, Vec<u32>)>) -> TokenBatch {
    let batch_size = rows.len();
    let seq_len = rows.iter().map(|(ids, _, _)| ids.len()).max().unwrap_or(0);

    let mut input_ids = Vec::with_capacity(batch_size * seq_len);
    let mut attention_mask = Vec::with_capacity(batch_size * seq_len);
    let mut token_type_ids = Vec::with_capacity(batch_size * seq_len);

    for (mut ids, mut mask, mut types) in rows {
        ids.resize(seq_len, 0);
        mask.resize(seq_len, 0);
        types.resize(seq_len, 0);
        input_ids.extend(ids);
        attention_mask.extend(mask);
        token_type_ids.extend(types);
    }

    TokenBatch {
        input_ids,
        attention_mask,
        token_type_ids,
        batch_size,
        seq_len,
    }
}
