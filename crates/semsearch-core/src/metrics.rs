//! Retrieval timing metrics with rolling averages.
//!
//! Every call through the retrieval facade records its latency, mode and
//! result statistics here. Samples older than the window are ignored by
//! averages; lifetime counters never reset except via [`RetrievalMetrics::clear`].
//!
//! The engine records into [`global_metrics()`] unless given its own
//! collector, so a process-wide view is available without threading a handle
//! through callers.

use crate::search::SearchMode;
use instant::Instant;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Window for rolling averages (5 minutes).
const SEARCH_WINDOW_SECS: u64 = 300;

/// Maximum samples to keep per metric (prevents unbounded growth).
const MAX_SAMPLES: usize = 1000;

#[derive(Clone, Debug)]
struct TimingSample {
    timestamp: Instant,
    duration_ms: f64,
}

/// Rolling statistics for a single timing.
#[derive(Debug)]
struct MetricData {
    samples: VecDeque<TimingSample>,
    total_count: u64,
    total_duration_ms: f64,
}

impl MetricData {
    fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(64),
            total_count: 0,
            total_duration_ms: 0.0,
        }
    }

    fn record(&mut self, duration_ms: f64) {
        self.total_count += 1;
        self.total_duration_ms += duration_ms;

        self.samples.push_back(TimingSample {
            timestamp: Instant::now(),
            duration_ms,
        });
        while self.samples.len() > MAX_SAMPLES {
            self.samples.pop_front();
        }
    }

    fn prune(&mut self, window: Duration) {
        // checked_sub: the window may reach back before the clock's origin
        let Some(cutoff) = Instant::now().checked_sub(window) else {
            return;
        };

        while let Some(front) = self.samples.front() {
            if front.timestamp < cutoff {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    fn in_window(&self, window: Duration) -> impl Iterator<Item = &TimingSample> {
        let cutoff = Instant::now().checked_sub(window);
        self.samples
            .iter()
            .filter(move |s| cutoff.is_none_or(|c| s.timestamp >= c))
    }

    fn rolling_avg(&self, window: Duration) -> Option<f64> {
        let (sum, count) = self
            .in_window(window)
            .fold((0.0, 0usize), |(sum, n), s| (sum + s.duration_ms, n + 1));

        (count > 0).then(|| sum / count as f64)
    }

    fn rolling_count(&self, window: Duration) -> usize {
        self.in_window(window).count()
    }

    fn lifetime_avg(&self) -> Option<f64> {
        (self.total_count > 0).then(|| self.total_duration_ms / self.total_count as f64)
    }

    fn last(&self) -> Option<f64> {
        self.samples.back().map(|s| s.duration_ms)
    }
}

/// Point-in-time information about the most recent retrieval.
#[derive(Clone, Debug)]
struct LastRetrieval {
    mode: SearchMode,
    result_count: usize,
    top_score: Option<f32>,
}

struct MetricsInner {
    retrieval: MetricData,
    index_build: MetricData,
    semantic_searches: u64,
    keyword_searches: u64,
    last: Option<LastRetrieval>,
}

impl Default for MetricsInner {
    fn default() -> Self {
        Self {
            retrieval: MetricData::new(),
            index_build: MetricData::new(),
            semantic_searches: 0,
            keyword_searches: 0,
            last: None,
        }
    }
}

/// Metrics snapshot for display.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MetricsSnapshot {
    /// Average retrieval latency over the window (ms)
    pub avg_latency_ms: Option<f64>,
    /// Average retrieval latency since startup (ms)
    pub lifetime_avg_latency_ms: Option<f64>,
    /// Latency of the most recent retrieval (ms)
    pub last_latency_ms: Option<f64>,
    /// Retrievals in the rolling window
    pub query_count: usize,

    /// Lifetime totals per mode
    pub semantic_searches: u64,
    pub keyword_searches: u64,

    pub last_mode: Option<SearchMode>,
    pub last_result_count: Option<usize>,
    pub last_top_score: Option<f32>,

    /// Most recent embedding index build time (ms)
    pub index_build_ms: Option<f64>,
}

impl MetricsSnapshot {
    pub fn total_searches(&self) -> u64 {
        self.semantic_searches + self.keyword_searches
    }
}

/// Thread-safe retrieval metrics collector.
///
/// Cloning is cheap and clones share the same underlying data.
#[derive(Clone)]
pub struct RetrievalMetrics {
    inner: Arc<RwLock<MetricsInner>>,
    window: Duration,
}

impl RetrievalMetrics {
    pub fn new() -> Self {
        Self::with_window(SEARCH_WINDOW_SECS)
    }

    /// Collector with a custom rolling window (for testing).
    pub fn with_window(window_secs: u64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MetricsInner::default())),
            window: Duration::from_secs(window_secs),
        }
    }

    /// Records one completed retrieval.
    pub fn record_retrieval(
        &self,
        mode: SearchMode,
        elapsed_ms: f64,
        result_count: usize,
        top_score: Option<f32>,
    ) {
        if let Ok(mut inner) = self.inner.write() {
            inner.retrieval.record(elapsed_ms);
            match mode {
                SearchMode::Semantic => inner.semantic_searches += 1,
                SearchMode::Keyword => inner.keyword_searches += 1,
            }
            inner.last = Some(LastRetrieval {
                mode,
                result_count,
                top_score,
            });
        }
    }

    /// Records an embedding index build.
    pub fn record_index_build(&self, duration_ms: f64) {
        if let Ok(mut inner) = self.inner.write() {
            inner.index_build.record(duration_ms);
        }
    }

    /// Drops samples outside the window.
    pub fn prune(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.retrieval.prune(self.window);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let Ok(inner) = self.inner.read() else {
            return MetricsSnapshot::default();
        };
        let last = inner.last.as_ref();

        MetricsSnapshot {
            avg_latency_ms: inner.retrieval.rolling_avg(self.window),
            lifetime_avg_latency_ms: inner.retrieval.lifetime_avg(),
            last_latency_ms: inner.retrieval.last(),
            query_count: inner.retrieval.rolling_count(self.window),
            semantic_searches: inner.semantic_searches,
            keyword_searches: inner.keyword_searches,
            last_mode: last.map(|l| l.mode),
            last_result_count: last.map(|l| l.result_count),
            last_top_score: last.and_then(|l| l.top_score),
            index_build_ms: inner.index_build.last(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Resets all counters and samples.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            *inner = MetricsInner::default();
        }
    }
}

impl Default for RetrievalMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_METRICS: Lazy<RetrievalMetrics> = Lazy::new(RetrievalMetrics::new);

/// Process-wide metrics collector.
pub fn global_metrics() -> &'static RetrievalMetrics {
    &GLOBAL_METRICS
}
