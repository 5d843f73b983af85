//! Output formatting for retrievals and the corpus listing.
//!
//! Supports both human-readable terminal output and JSON for scripting.

use semsearch_core::highlight::highlight;
use semsearch_core::search::{Document, Retrieval, RetrievalEngine, ScoreBand, SearchMode};
use semsearch_core::storage::CorpusStats;
use serde::Serialize;

/// Maximum characters of document text shown in the corpus table
const TABLE_TEXT_MAX_LEN: usize = 60;

/// Markers wrapped around highlighted query terms.
#[derive(Debug, Clone, Copy)]
pub struct Markers {
    pub open: &'static str,
    pub close: &'static str,
}

impl Markers {
    /// Bold yellow, for terminals
    pub const ANSI: Markers = Markers {
        open: "\x1b[1;33m",
        close: "\x1b[0m",
    };
    /// For pipes and files
    pub const PLAIN: Markers = Markers {
        open: "**",
        close: "**",
    };
}

/// JSON output structure for a retrieval
#[derive(Serialize)]
pub struct JsonOutput {
    pub query: String,
    pub mode: SearchMode,
    pub elapsed_ms: f64,
    /// Query-time failure recovered during this call
    pub diagnostic: Option<String>,
    pub results: Vec<JsonResult>,
}

#[derive(Serialize)]
pub struct JsonResult {
    pub rank: usize,
    /// 1-based document number
    pub doc_id: usize,
    pub text: String,
    pub score: f32,
    pub percent: f32,
    /// Squared L2 distance (semantic mode only)
    pub distance: Option<f32>,
    pub band: ScoreBand,
}

/// Formats a retrieval as JSON.
pub fn format_json(query: &str, retrieval: &Retrieval) -> String {
    let output = JsonOutput {
        query: query.to_string(),
        mode: retrieval.mode,
        elapsed_ms: retrieval.elapsed_ms(),
        diagnostic: retrieval.diagnostic.as_ref().map(ToString::to_string),
        results: retrieval
            .results
            .iter()
            .enumerate()
            .map(|(i, result)| JsonResult {
                rank: i + 1,
                doc_id: result.doc_id.display_id(),
                text: result.text.clone(),
                score: result.score,
                percent: result.score * 100.0,
                distance: result.distance,
                band: result.band(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

fn band_marker(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::High => "🟢",
        ScoreBand::Medium => "🟡",
        ScoreBand::Low => "🔴",
    }
}

/// One-line engine status: which mode is active and why.
pub fn format_banner(engine: &RetrievalEngine) -> String {
    match (engine.model_id(), engine.unavailable_reason()) {
        (Some(model), _) => format!("AI search engine ready (using {model})"),
        (None, Some(reason)) => format!("Keyword search only: {reason}"),
        (None, None) => "Keyword search only".to_string(),
    }
}

/// Formats a retrieval for human-readable terminal output.
pub fn format_human(
    query: &str,
    retrieval: &Retrieval,
    engine: &RetrievalEngine,
    markers: Markers,
) -> String {
    let mut output = String::new();
    output.push_str(&format_banner(engine));
    output.push_str("\n\n");

    if let Some(diagnostic) = &retrieval.diagnostic {
        output.push_str(&format!("Warning: {diagnostic}\n"));
    }

    if retrieval.is_empty() {
        output.push_str("No results found. Try a different query.\n");
        output.push_str("Suggestions:\n  - Try broader terms\n  - Use synonyms\n  - Check spelling\n");
    } else {
        output.push_str(&format!(
            "Found {} result{} in {:.1}ms\n\n",
            retrieval.results.len(),
            if retrieval.results.len() == 1 { "" } else { "s" },
            retrieval.elapsed_ms()
        ));

        for (i, result) in retrieval.results.iter().enumerate() {
            output.push_str(&format!(
                "{} Result #{}  {:.3} ({:.1}%)\n",
                band_marker(result.band()),
                i + 1,
                result.score,
                result.score * 100.0
            ));
            output.push_str(&format!(
                "   {}\n\n",
                highlight(&result.text, query, markers.open, markers.close)
            ));
        }
    }

    output.push_str(&format_footer(query, retrieval));
    output
}

/// Query length, search time, result count and search type.
fn format_footer(query: &str, retrieval: &Retrieval) -> String {
    format!(
        "---\nQuery length: {} chars | Search time: {:.1}ms | Results: {} | Search type: {}",
        query.chars().count(),
        retrieval.elapsed_ms(),
        retrieval.results.len(),
        retrieval.mode
    )
}

/// Formats the corpus as a table followed by summary counts.
pub fn format_corpus_table(documents: &[Document], stats: CorpusStats) -> String {
    let mut output = format!("{:>3}  {:>5}  {:>5}  {}\n", "ID", "Chars", "Words", "Text");

    for doc in documents {
        output.push_str(&format!(
            "{:>3}  {:>5}  {:>5}  {}\n",
            doc.id,
            doc.char_count(),
            doc.word_count(),
            truncate_text(&doc.text, TABLE_TEXT_MAX_LEN)
        ));
    }

    output.push_str(&format!(
        "\nTotal documents: {} | Total words: {}",
        stats.document_count, stats.total_words
    ));
    output
}

/// Truncates text to at most `max_chars` characters, adding ellipsis if needed.
fn truncate_text(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };

    // Prefer a word boundary
    let truncated = &text[..cut];
    match truncated.rfind(' ') {
        Some(last_space) => format!("{}...", &truncated[..last_space]),
        None => format!("{truncated}..."),
    }
}
