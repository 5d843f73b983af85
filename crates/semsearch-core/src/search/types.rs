use crate::config::{HIGH_SCORE_THRESHOLD, MEDIUM_SCORE_THRESHOLD};
pub use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Document identifier: the document's 0-based position in the corpus.
///
/// Use [`DocId::display_id`] for the 1-based number shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(usize);

impl DocId {
    /// Creates a DocId from a 0-based corpus position.
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Returns the 0-based corpus position.
    pub fn index(&self) -> usize {
        self.0
    }

    /// Returns the 1-based identifier used for display.
    pub fn display_id(&self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad, not write!, so width and alignment flags apply
        f.pad(&self.display_id().to_string())
    }
}

/// Immutable corpus document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Position in the corpus
    pub id: DocId,
    /// Document text content
    pub text: String,
}

impl Document {
    pub fn new(id: DocId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    /// Length of the text in characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A ranked document returned by a retrieval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Document identifier
    pub doc_id: DocId,
    /// Document text content
    pub text: String,
    /// Similarity score. Jaccard index in keyword mode, `1 / (1 + d)` in
    /// semantic mode.
    pub score: f32,
    /// Squared L2 distance to the query (semantic mode only)
    pub distance: Option<f32>,
}

impl SearchResult {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }
}

/// Which scorer produced a retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Embedding index (nearest neighbors by meaning)
    Semantic,
    /// Word-overlap fallback
    Keyword,
}

impl SearchMode {
    /// Short label for status lines.
    pub fn label(&self) -> &'static str {
        match self {
            SearchMode::Semantic => "AI Semantic",
            SearchMode::Keyword => "Keyword",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse relevance bucket used for color coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    /// Buckets a score; both thresholds are exclusive.
    pub fn from_score(score: f32) -> Self {
        if score > HIGH_SCORE_THRESHOLD {
            ScoreBand::High
        } else if score > MEDIUM_SCORE_THRESHOLD {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }
}

/// Outcome of one call to the retrieval facade.
#[derive(Debug, Clone)]
pub struct Retrieval {
    /// Ranked results, best first
    pub results: Vec<SearchResult>,
    /// Wall-clock time spent in the delegated search
    pub elapsed: Duration,
    /// Scorer that produced `results`
    pub mode: SearchMode,
    /// Runtime failure recovered during this call, if any
    pub diagnostic: Option<SearchError>,
}

impl Retrieval {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn top_score(&self) -> Option<f32> {
        self.results.first().map(|r| r.score)
    }
}

/// Validates that an embedding has the expected dimension.
pub fn validate_dimension(expected: usize, actual: usize) -> Result<(), SearchError> {
    if actual == expected {
        Ok(())
    } else {
        Err(SearchError::DimensionMismatch { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_display_is_one_based() {
        let id = DocId::from_index(0);
        assert_eq!(id.index(), 0);
        assert_eq!(id.display_id(), 1);
        assert_eq!(id.to_string(), "1");
    }

    #[test]
    fn test_doc_id_display_honors_width() {
        let id = DocId::from_index(6);
        assert_eq!(format!("{:>3}|", id), "  7|");
        assert_eq!(format!("{:<3}|", id), "7  |");
    }

    #[test]
    fn test_document_counts() {
        let doc = Document::new(DocId::from_index(3), "cat  sat on   mat");
        assert_eq!(doc.word_count(), 4);
        assert_eq!(doc.char_count(), 17);
    }

    #[test]
    fn test_score_band_thresholds_are_exclusive() {
        assert_eq!(ScoreBand::from_score(0.9), ScoreBand::High);
        assert_eq!(ScoreBand::from_score(0.7), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_score(0.6), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_score(0.5), ScoreBand::Low);
        assert_eq!(ScoreBand::from_score(0.1), ScoreBand::Low);
    }

    #[test]
    fn test_validate_dimension() {
        assert!(validate_dimension(3, 3).is_ok());
        assert_eq!(
            validate_dimension(3, 4),
            Err(SearchError::DimensionMismatch {
                expected: 3,
                actual: 4
            })
        );
    }
}
