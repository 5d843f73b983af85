// RetrievalEngine - picks semantic or keyword search and times each call

use super::keyword;
use super::semantic::EmbeddingIndex;
use super::types::{Document, Retrieval, SearchError, SearchMode};
use crate::config::{DegradePolicy, RetrievalConfig};
use crate::embedding::TextEmbedder;
use crate::error::InitializationError;
use crate::metrics::{global_metrics, RetrievalMetrics};
use crate::storage::DocumentStore;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Outcome of the start-up capability probe.
#[derive(Debug)]
pub enum EngineState {
    /// Embedding index built; queries use semantic search
    Ready(EmbeddingIndex),
    /// Embedding index could not be built; queries use keyword search
    Unavailable {
        /// Why the index is missing
        reason: InitializationError,
    },
}

/// Single entry point for retrieval over a fixed corpus.
///
/// Constructed once, then read-only: `retrieve` takes `&self`, so one engine
/// can serve concurrent callers without locking.
pub struct RetrievalEngine {
    state: EngineState,
    /// Corpus in store order, used by the keyword scorer
    documents: Vec<Document>,
    config: RetrievalConfig,
    metrics: RetrievalMetrics,
}

impl std::fmt::Debug for RetrievalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalEngine")
            .field("mode", &self.mode())
            .field("state", &self.state)
            .field("documents", &self.documents.len())
            .field("config", &self.config)
            .finish()
    }
}

impl RetrievalEngine {
    /// Probes the embedding backend and builds the index if it is available.
    ///
    /// `loader` is called once. If it or the index build fails, the engine
    /// starts in keyword mode and keeps the failure as
    /// [`unavailable_reason`](Self::unavailable_reason).
    #[instrument(skip_all)]
    pub fn initialize<S, F>(store: &S, loader: F, config: RetrievalConfig) -> Self
    where
        S: DocumentStore + ?Sized,
        F: FnOnce() -> Result<Arc<dyn TextEmbedder>, InitializationError>,
    {
        let documents = store.get_all();
        let state = match loader()
            .and_then(|embedder| EmbeddingIndex::build(embedder, documents.clone()))
        {
            Ok(index) => {
                info!(
                    "Semantic search ready ({}, {} documents)",
                    index.model_id(),
                    index.len()
                );
                EngineState::Ready(index)
            }
            Err(reason) => {
                warn!("Semantic search unavailable, using keyword search: {}", reason);
                EngineState::Unavailable { reason }
            }
        };

        Self::from_parts(documents, state, config)
    }

    /// Creates an engine that only does keyword search.
    pub fn keyword_only<S>(store: &S, reason: InitializationError, config: RetrievalConfig) -> Self
    where
        S: DocumentStore + ?Sized,
    {
        info!("Keyword-only engine: {}", reason);
        Self::from_parts(store.get_all(), EngineState::Unavailable { reason }, config)
    }

    fn from_parts(documents: Vec<Document>, state: EngineState, config: RetrievalConfig) -> Self {
        Self {
            state,
            documents,
            config,
            metrics: global_metrics().clone(),
        }
    }

    /// Records retrievals into `metrics` instead of the global collector.
    pub fn with_metrics(mut self, metrics: RetrievalMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Ranks the corpus against `query` and returns at most `top_k` results.
    ///
    /// Uses the embedding index when it was built, the keyword scorer
    /// otherwise. Elapsed time covers only the delegated search.
    ///
    /// A query-time failure in semantic mode is not returned as `Err`: the
    /// call yields an empty result set (or keyword results, depending on
    /// [`DegradePolicy`]) with the failure in `Retrieval::diagnostic`. The
    /// engine stays in semantic mode for later calls.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidTopK` if `top_k` is 0.
    #[instrument(skip_all, fields(query_len = query.len(), top_k = top_k))]
    pub fn retrieve(&self, query: &str, top_k: usize) -> Result<Retrieval, SearchError> {
        if top_k == 0 {
            return Err(SearchError::InvalidTopK(top_k));
        }

        let start = instant::Instant::now();

        let (results, mode, diagnostic) = match &self.state {
            EngineState::Ready(index) => match index.search(query, top_k) {
                Ok(results) => (results, SearchMode::Semantic, None),
                Err(err) => {
                    warn!("Semantic search failed: {}", err);
                    match self.config.degrade_policy {
                        DegradePolicy::EmptyWithDiagnostic => {
                            (Vec::new(), SearchMode::Semantic, Some(err))
                        }
                        DegradePolicy::FallbackToKeyword => (
                            keyword::search_all(&self.documents, query, top_k),
                            SearchMode::Keyword,
                            Some(err),
                        ),
                    }
                }
            },
            EngineState::Unavailable { .. } => (
                keyword::search_all(&self.documents, query, top_k),
                SearchMode::Keyword,
                None,
            ),
        };

        let elapsed = start.elapsed();
        let retrieval = Retrieval {
            results,
            elapsed,
            mode,
            diagnostic,
        };

        debug!(
            "{} search returned {} results in {:.2}ms",
            retrieval.mode,
            retrieval.results.len(),
            retrieval.elapsed_ms()
        );
        self.metrics.record_retrieval(
            retrieval.mode,
            retrieval.elapsed_ms(),
            retrieval.results.len(),
            retrieval.top_score(),
        );

        Ok(retrieval)
    }

    /// [`retrieve`](Self::retrieve) with the configured default `top_k`.
    pub fn retrieve_default(&self, query: &str) -> Result<Retrieval, SearchError> {
        self.retrieve(query, self.config.default_top_k)
    }

    /// Mode queries will run in, barring per-call degradation.
    pub fn mode(&self) -> SearchMode {
        match self.state {
            EngineState::Ready(_) => SearchMode::Semantic,
            EngineState::Unavailable { .. } => SearchMode::Keyword,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Why semantic search is unavailable, if it is.
    pub fn unavailable_reason(&self) -> Option<&InitializationError> {
        match &self.state {
            EngineState::Ready(_) => None,
            EngineState::Unavailable { reason } => Some(reason),
        }
    }

    /// Identifier of the embedding model in use, if any.
    pub fn model_id(&self) -> Option<&str> {
        match &self.state {
            EngineState::Ready(index) => Some(index.model_id()),
            EngineState::Unavailable { .. } => None,
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn metrics(&self) -> &RetrievalMetrics {
        &self.metrics
    }
}

static SHARED_ENGINE: OnceCell<RetrievalEngine> = OnceCell::new();

/// Returns the process-wide engine, running `init` on first use only.
///
/// Concurrent first callers block until the single initialization finishes;
/// `init` never runs twice, so the model is loaded at most once.
pub fn shared_engine<F>(init: F) -> &'static RetrievalEngine
where
    F: FnOnce() -> RetrievalEngine,
{
    SHARED_ENGINE.get_or_init(init)
}

/// Returns the process-wide engine if it has been initialized.
pub fn try_shared_engine() -> Option<&'static RetrievalEngine> {
    SHARED_ENGINE.get()
}
