//! Pipeline orchestration
//!
//! `run` lists the honeypot folder, keeps the files inside the window, fetches
//! them (concurrently, bounded) and folds every parsed line into one
//! [`AggregationResult`]. Fetches may complete in any order but bodies are
//! folded strictly in selector order, so credential attempts are
//! deterministic.

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::aggregator::{AggregationResult, Aggregator};
use crate::config::{StoreConfig, DEFAULT_FETCH_CONCURRENCY};
use crate::error_handling::{HoneypotError, HoneypotResult};
use crate::parser::GrammarRegistry;
use crate::selector::select_log_files;
use crate::store::{GithubLogStore, LogStore};
use crate::window::{DateRange, DateWindow};

/// Bookkeeping for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub files_listed: usize,
    pub files_selected: usize,
    /// Selected files that came back empty, including failed fetches
    pub files_empty: usize,
    pub lines_read: u64,
    pub lines_dropped: u64,
    pub events_parsed: u64,
    pub elapsed_ms: u64,
}

pub struct Pipeline {
    store: Arc<dyn LogStore>,
    registry: GrammarRegistry,
    fetch_concurrency: usize,
}

impl Pipeline {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self {
            store,
            registry: GrammarRegistry::with_defaults(),
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }

    /// Pipeline reading from a GitHub-style contents API
    pub fn from_config(config: StoreConfig) -> HoneypotResult<Self> {
        let concurrency = config.fetch_concurrency;
        let store = GithubLogStore::new(config)?;
        Ok(Self::new(Arc::new(store)).with_fetch_concurrency(concurrency))
    }

    pub fn with_registry(mut self, registry: GrammarRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = concurrency.max(1);
        self
    }

    /// Aggregate `folder` over `window`, resolved against today's UTC date
    pub async fn run(&self, folder: &str, window: DateWindow) -> HoneypotResult<AggregationResult> {
        self.run_range(folder, window.resolve_now()).await
    }

    /// Entry point taking the raw range selector (`"all"` or a day count)
    pub async fn run_selector(&self, folder: &str, selector: &str) -> HoneypotResult<AggregationResult> {
        let window: DateWindow = selector.parse()?;
        self.run(folder, window).await
    }

    pub async fn run_range(&self, folder: &str, range: DateRange) -> HoneypotResult<AggregationResult> {
        self.run_with_stats(folder, range).await.map(|(result, _)| result)
    }

    pub async fn run_with_stats(
        &self,
        folder: &str,
        range: DateRange,
    ) -> HoneypotResult<(AggregationResult, RunStats)> {
        let started = Instant::now();

        if !self.registry.contains(folder) {
            return Err(HoneypotError::unsupported_honeypot(folder));
        }

        let listed = self.store.list_files(folder).await?;
        let files = select_log_files(&listed, &range);
        info!(
            "Aggregating {} of {} files in '{}' for {} to {}",
            files.len(),
            listed.len(),
            folder,
            range.start,
            range.end
        );

        let mut stats = RunStats {
            files_listed: listed.len(),
            files_selected: files.len(),
            ..RunStats::default()
        };

        let store = self.store.as_ref();
        let mut bodies = stream::iter(files.iter())
            .map(|file| async move { (file, store.fetch_content(folder, file).await) })
            .buffered(self.fetch_concurrency);

        let mut aggregator = Aggregator::new();
        while let Some((file, body)) = bodies.next().await {
            if body.is_empty() {
                stats.files_empty += 1;
                debug!("{}/{} contributed no content", folder, file);
                continue;
            }

            let before = aggregator.total_events();
            for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
                stats.lines_read += 1;
                match self.registry.parse(line, folder) {
                    Some(event) => aggregator.push(event),
                    None => stats.lines_dropped += 1,
                }
            }
            debug!(
                "{}/{} contributed {} events",
                folder,
                file,
                aggregator.total_events() - before
            );
        }

        let result = aggregator.finish();
        stats.events_parsed = result.total_events;
        stats.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            "Run over '{}' finished: {} events, {} lines dropped, {} empty files in {}ms",
            folder, stats.events_parsed, stats.lines_dropped, stats.files_empty, stats.elapsed_ms
        );

        Ok((result, stats))
    }
}
