//! # Semsearch Core
//!
//! Retrieval core for a small fixed document corpus. A query is answered by
//! exact nearest-neighbor search over sentence embeddings when the embedding
//! backend is available, and by word-set overlap scoring otherwise.
//!
//! This crate holds the algorithms only; presentation (terminal output, JSON)
//! lives in `semsearch-cli`.
//!
//! ## Modules
//!
//! - [`search`] - Retrieval facade, exact L2 index, keyword fallback
//! - [`embedding`] - Text embedding trait and the MiniLM (Candle) backend
//! - [`storage`] - Read-only document store and the built-in sample corpus
//! - [`highlight`] - Query-term span marking for result text
//! - [`metrics`] - Rolling retrieval timing metrics
//! - [`config`] - Constants and runtime configuration
//! - [`error`] - Error types for initialization, search and embedding

pub mod config;
pub mod embedding;
pub mod error;
pub mod highlight;
pub mod metrics;
pub mod search;
pub mod storage;

#[cfg(test)]
mod test_utils;
