//! Search orchestration: strategies in priority order, first success wins

use super::models::{Attempt, SearchOutcome};
use crate::config::{SearchMode, Settings};
use crate::network::HttpClient;
use crate::sources::{RawResult, SourceLoader, Strategy};
use futures::stream::{FuturesOrdered, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default sentinel when no source produces text
pub const NO_RESULTS: &str = "No search results found";

/// Drives the source strategies for one query at a time
pub struct Orchestrator {
    strategies: Vec<Arc<dyn Strategy>>,
    mode: SearchMode,
    fallback: String,
}

impl Orchestrator {
    /// Create an orchestrator over strategies already in priority order
    pub fn new(strategies: Vec<Arc<dyn Strategy>>) -> Self {
        Self {
            strategies,
            mode: SearchMode::Sequential,
            fallback: NO_RESULTS.to_string(),
        }
    }

    /// Build the configured built-in sources
    pub fn from_settings(settings: &Settings, client: &HttpClient) -> Self {
        Self::new(SourceLoader::load(settings, client))
            .with_mode(settings.search.mode)
            .with_fallback(settings.search.fallback_message.clone())
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        let fallback = fallback.into();
        if !fallback.trim().is_empty() {
            self.fallback = fallback;
        }
        self
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Names of the strategies, in priority order
    pub fn source_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Search and return plain text; never empty, never an error
    pub async fn search(&self, query: &str) -> String {
        self.search_detailed(query).await.text
    }

    /// Search, also reporting which source answered and every attempt made
    pub async fn search_detailed(&self, query: &str) -> SearchOutcome {
        let query = query.trim();
        let start = Instant::now();

        if query.is_empty() {
            debug!("Empty query, skipping sources");
            return self.fallback_outcome(Vec::new());
        }

        debug!("Searching '{}' with {} sources", query, self.strategies.len());

        let outcome = match self.mode {
            SearchMode::Sequential => self.run_sequential(query).await,
            SearchMode::Racing => self.run_racing(query).await,
        };

        info!(
            "Search finished in {:?}: source={} attempts={} chars={}",
            start.elapsed(),
            outcome.source.as_deref().unwrap_or("none"),
            outcome.attempts.len(),
            outcome.text.len()
        );
        outcome
    }

    async fn run_sequential(&self, query: &str) -> SearchOutcome {
        let mut attempts = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let start = Instant::now();
            let result = strategy.attempt(query).await;
            let elapsed = start.elapsed();
            if let Some(outcome) = self.record(strategy.name(), result, elapsed, &mut attempts) {
                return outcome;
            }
        }

        self.fallback_outcome(attempts)
    }

    /// All strategies run at once; results are consumed in priority order,
    /// and lower-priority calls still in flight are dropped once one wins.
    async fn run_racing(&self, query: &str) -> SearchOutcome {
        let mut attempts = Vec::with_capacity(self.strategies.len());

        let mut pending: FuturesOrdered<_> = self
            .strategies
            .iter()
            .map(|strategy| async move {
                let start = Instant::now();
                let result = strategy.attempt(query).await;
                (strategy, result, start.elapsed())
            })
            .collect();

        while let Some((strategy, result, elapsed)) = pending.next().await {
            if let Some(outcome) = self.record(strategy.name(), result, elapsed, &mut attempts) {
                return outcome;
            }
        }

        self.fallback_outcome(attempts)
    }

    /// Log one attempt; return the final outcome if it is a usable success
    fn record(
        &self,
        name: &str,
        result: RawResult,
        elapsed: Duration,
        attempts: &mut Vec<Attempt>,
    ) -> Option<SearchOutcome> {
        attempts.push(Attempt::new(name, &result, elapsed));
        match result {
            RawResult::Success(text) if !text.trim().is_empty() => {
                debug!("Source {} answered in {:?}", name, elapsed);
                Some(SearchOutcome {
                    text,
                    source: Some(name.to_string()),
                    attempts: std::mem::take(attempts),
                })
            }
            RawResult::Failure(e) => {
                debug!("Source {} failed ({}), trying next", name, e);
                None
            }
            _ => {
                debug!("Source {} had no content, trying next", name);
                None
            }
        }
    }

    fn fallback_outcome(&self, attempts: Vec<Attempt>) -> SearchOutcome {
        SearchOutcome {
            text: self.fallback.clone(),
            source: None,
            attempts,
        }
    }
}
