//! Engine construction and query execution.
//!
//! The embedding model loads on a blocking thread under a timeout. Any
//! failure (missing files, bad weights, timeout) leaves the engine in keyword
//! mode; the reason is kept for the status banner.

use crate::config;
use anyhow::{Context, Result};
use semsearch_core::config::RetrievalConfig;
use semsearch_core::embedding::{load_embedder, MiniLmConfig, TextEmbedder};
use semsearch_core::error::InitializationError;
use semsearch_core::search::{Retrieval, RetrievalEngine};
use semsearch_core::storage::InMemoryDocumentStore;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Engine shared by every query in this process.
static ENGINE: OnceCell<RetrievalEngine> = OnceCell::const_new();

/// How the engine should be built.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Skip the embedding backend entirely
    pub keyword_only: bool,
    /// Explicit model directory (`--model-dir`)
    pub model_dir: Option<PathBuf>,
    /// Upper bound on model load plus corpus encoding
    pub build_timeout: Duration,
    /// Serve keyword results when a semantic query fails
    pub fallback_on_error: bool,
}

impl EngineOptions {
    fn retrieval_config(&self) -> RetrievalConfig {
        let config = RetrievalConfig::default();
        if self.fallback_on_error {
            config.with_keyword_fallback()
        } else {
            config
        }
    }
}

/// Builds an engine over the sample corpus.
pub async fn build_engine(options: &EngineOptions) -> RetrievalEngine {
    if options.keyword_only {
        return RetrievalEngine::keyword_only(
            &InMemoryDocumentStore::sample(),
            InitializationError::BackendUnavailable("disabled by --keyword-only".into()),
            options.retrieval_config(),
        );
    }

    let model_dir = match config::find_model_dir(options.model_dir.as_deref()) {
        Ok(dir) => dir,
        Err(e) => {
            warn!("{}", e);
            return RetrievalEngine::keyword_only(
                &InMemoryDocumentStore::sample(),
                InitializationError::ModelAssets(e.to_string()),
                options.retrieval_config(),
            );
        }
    };

    info!("Loading embedding model from {}", model_dir.display());
    build_with_loader(options, move || {
        load_embedder(&model_dir, MiniLmConfig::default())
    })
    .await
}

/// Builds an engine with `loader` on a blocking thread, bounded by
/// `options.build_timeout`.
///
/// On timeout the blocking task is left running and its result discarded;
/// the runtime must be shut down without waiting on it (see `main`).
pub async fn build_with_loader<L>(options: &EngineOptions, loader: L) -> RetrievalEngine
where
    L: FnOnce() -> Result<Arc<dyn TextEmbedder>, InitializationError> + Send + 'static,
{
    let store = InMemoryDocumentStore::sample();
    let retrieval_config = options.retrieval_config();

    let task_store = store.clone();
    let task_config = retrieval_config.clone();
    let build = tokio::task::spawn_blocking(move || {
        RetrievalEngine::initialize(&task_store, loader, task_config)
    });

    match tokio::time::timeout(options.build_timeout, build).await {
        Ok(Ok(engine)) => engine,
        Ok(Err(join_err)) => RetrievalEngine::keyword_only(
            &store,
            InitializationError::ModelLoad(format!("engine build task failed: {join_err}")),
            retrieval_config,
        ),
        Err(_) => {
            let secs = options.build_timeout.as_secs();
            warn!("Engine build exceeded {}s, using keyword search", secs);
            RetrievalEngine::keyword_only(&store, InitializationError::Timeout(secs), retrieval_config)
        }
    }
}

/// Runs `build` once per cell; concurrent callers wait for that one build.
async fn init_once<F, Fut>(cell: &OnceCell<RetrievalEngine>, build: F) -> &RetrievalEngine
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = RetrievalEngine>,
{
    cell.get_or_init(build).await
}

/// Returns the process-wide engine, building it on first use.
pub async fn engine(options: &EngineOptions) -> &'static RetrievalEngine {
    init_once(&ENGINE, || build_engine(options)).await
}

/// Runs `query` against the shared engine.
pub async fn execute_search(
    query: &str,
    limit: usize,
    options: &EngineOptions,
) -> Result<(&'static RetrievalEngine, Retrieval)> {
    let engine = engine(options).await;

    info!("Searching for: \"{}\"", query);
    let retrieval = engine
        .retrieve(query, limit)
        .with_context(|| format!("Search failed for \"{query}\""))?;

    info!(
        "Found {} results in {:.1}ms",
        retrieval.results.len(),
        retrieval.elapsed_ms()
    );
    Ok((engine, retrieval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use semsearch_core::search::SearchMode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn options(keyword_only: bool, model_dir: Option<PathBuf>) -> EngineOptions {
        EngineOptions {
            keyword_only,
            model_dir,
            build_timeout: Duration::from_secs(30),
            fallback_on_error: false,
        }
    }

    #[tokio::test]
    async fn test_keyword_only_skips_model() {
        let engine = build_engine(&options(true, None)).await;
        assert_eq!(engine.mode(), SearchMode::Keyword);
        assert!(matches!(
            engine.unavailable_reason(),
            Some(InitializationError::BackendUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_model_dir_falls_back() {
        let engine =
            build_engine(&options(false, Some(PathBuf::from("/nonexistent/models")))).await;
        assert_eq!(engine.mode(), SearchMode::Keyword);
        let reason = engine.unavailable_reason().unwrap().to_string();
        assert!(reason.contains("Model files not found"));
    }

    #[tokio::test]
    async fn test_execute_search_keyword_mode() {
        let (engine, retrieval) = execute_search("machine learning", 3, &options(true, None))
            .await
            .unwrap();
        assert_eq!(engine.mode(), SearchMode::Keyword);
        assert_eq!(retrieval.mode, SearchMode::Keyword);
        assert!(!retrieval.is_empty());
        assert!(retrieval.results.len() <= 3);
    }

    #[tokio::test]
    async fn test_execute_search_rejects_zero_limit() {
        let err = execute_search("anything", 0, &options(true, None))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("Invalid top_k"));
    }

    #[tokio::test]
    async fn test_slow_loader_times_out_to_keyword() {
        let opts = EngineOptions {
            build_timeout: Duration::from_millis(50),
            ..options(false, None)
        };
        let start = std::time::Instant::now();
        let engine = build_with_loader(&opts, || {
            std::thread::sleep(Duration::from_millis(500));
            Err(InitializationError::BackendUnavailable("slow".into()))
        })
        .await;

        assert!(start.elapsed() < Duration::from_millis(400));
        assert_eq!(engine.mode(), SearchMode::Keyword);
        assert!(matches!(
            engine.unavailable_reason(),
            Some(InitializationError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_loader_error_kept_as_reason() {
        let engine = build_with_loader(&options(false, None), || {
            Err(InitializationError::ModelLoad("corrupt weights".into()))
        })
        .await;
        assert_eq!(engine.mode(), SearchMode::Keyword);
        assert!(engine
            .unavailable_reason()
            .unwrap()
            .to_string()
            .contains("corrupt weights"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_callers_share_one_build() {
        static BUILDS: AtomicUsize = AtomicUsize::new(0);
        let cell = OnceCell::new();
        let opts = options(true, None);
        let opts = &opts;

        let build = move || async move {
            BUILDS.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            build_engine(opts).await
        };

        let (first, second) = tokio::join!(init_once(&cell, build), init_once(&cell, build));

        assert!(std::ptr::eq(first, second));
        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
    }
}
