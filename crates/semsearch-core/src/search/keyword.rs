//! Word-overlap keyword scoring.
//!
//! The fallback scorer used when no embedding index is available. It needs
//! nothing beyond string operations:
//!
//! - text is lower-cased and split on whitespace into a set of words
//! - a document with no word in common with the query is dropped
//! - otherwise its score is the Jaccard index `|Q ∩ D| / |Q ∪ D|`
//!
//! # Usage
//!
//! ```
//! use semsearch_core::search::keyword::{jaccard_score, search_all};
//! use semsearch_core::storage::{DocumentStore, InMemoryDocumentStore};
//!
//! assert_eq!(jaccard_score("cat sat on mat", "cat mat"), Some(0.5));
//!
//! let store = InMemoryDocumentStore::from_texts(["cat sat on mat", "dog ran in park"]);
//! let results = search_all(&store.get_all(), "cat mat", 5);
//! assert_eq!(results.len(), 1);
//! ```

use super::types::{Document, SearchResult};
use std::collections::HashSet;
use tracing::instrument;

/// Lower-cases `text` and splits it on whitespace into a set of words.
pub fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Jaccard index of two word sets, or `None` when they share no word.
fn overlap_score(document_words: &HashSet<String>, query_words: &HashSet<String>) -> Option<f32> {
    let intersection = document_words.intersection(query_words).count();
    if intersection == 0 {
        return None;
    }
    let union = document_words.union(query_words).count();
    Some(intersection as f32 / union as f32)
}

/// Scores one document against a query.
///
/// Returns `None` if the document shares no word with the query (it is
/// excluded from results, not scored as zero), otherwise a score in (0, 1].
pub fn jaccard_score(document: &str, query: &str) -> Option<f32> {
    overlap_score(&word_set(document), &word_set(query))
}

/// Ranks `documents` against `query` by word overlap.
///
/// Zero-overlap documents are dropped, the rest are sorted by descending
/// score with ties kept in corpus order, and at most `top_k` are returned.
/// An empty query or no overlapping document yields an empty vector.
#[instrument(skip_all, fields(documents = documents.len(), top_k))]
pub fn search_all(documents: &[Document], query: &str, top_k: usize) -> Vec<SearchResult> {
    let query_words = word_set(query);
    if query_words.is_empty() || top_k == 0 {
        return vec![];
    }

    let mut results: Vec<SearchResult> = documents
        .iter()
        .filter_map(|doc| {
            overlap_score(&word_set(&doc.text), &query_words).map(|score| SearchResult {
                doc_id: doc.id,
                text: doc.text.clone(),
                score,
                distance: None,
            })
        })
        .collect();

    // sort_by is stable, so equal scores keep corpus order
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(top_k);
    results
}
