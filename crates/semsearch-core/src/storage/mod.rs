//! Read-only document storage.
//!
//! The corpus is fixed at startup. [`DocumentStore`] gives ordered, indexed
//! access to it; repeated calls to [`DocumentStore::get_all`] return equal
//! sequences in the same order.
//!
//! # Implementations
//!
//! - [`InMemoryDocumentStore`] - any ordered list of texts, including the
//!   built-in [`SAMPLE_DOCUMENTS`] demo corpus

mod document_store;
mod sample;

pub use document_store::InMemoryDocumentStore;
pub use sample::SAMPLE_DOCUMENTS;

use crate::search::types::{DocId, Document};
use serde::Serialize;

/// Ordered, immutable collection of documents.
///
/// Implementations must be `Send + Sync` so a built engine can be shared
/// between threads without locking.
pub trait DocumentStore: Send + Sync {
    /// Returns every document in corpus order.
    fn get_all(&self) -> Vec<Document>;

    /// Returns the document at `id`, or `None` if out of range.
    fn get(&self, id: DocId) -> Option<Document>;

    /// Number of documents in the corpus.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Summary counts for status displays.
    fn stats(&self) -> CorpusStats {
        let documents = self.get_all();
        CorpusStats {
            document_count: documents.len(),
            total_words: documents.iter().map(Document::word_count).sum(),
        }
    }
}

/// Corpus-level counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CorpusStats {
    /// Number of documents
    pub document_count: usize,
    /// Sum of whitespace-separated words over all documents
    pub total_words: usize,
}
