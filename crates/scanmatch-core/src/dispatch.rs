//! Parallel dispatcher - fans a batch of queries out over a worker pool
//!
//! Each query is one unit of work: normalize the query, scan every candidate
//! of the shared [`Document`], classify. Units share nothing mutable; the
//! document is borrowed read-only by every worker. Results are written back
//! into per-query slots by input index, so report order never depends on
//! completion order.
//!
//! A panicking unit is caught and reported as [`QueryError::Processing`] for
//! that query alone. With a deadline, units that have not finished in time
//! report [`QueryError::TimedOut`] and the batch still returns.

use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::classify::{Classification, MatchClassifier};
use crate::error::{EmptyInput, QueryError, SearchError, SearchResult};
use crate::normalize::{Normalizer, TextNormalizer};
use crate::options::SearchOptions;
use crate::report::{MatchResult, QueryEntry, QueryTiming, SearchReport, WorkerAllocation};
use crate::window::Document;

/// Batch search engine
///
/// Cheap to share: the normalizer sits behind an `Arc` and is only read.
#[derive(Clone)]
pub struct SearchEngine {
    options: SearchOptions,
    normalizer: Arc<dyn TextNormalizer>,
}

impl SearchEngine {
    /// Create an engine with validated options
    pub fn new(options: SearchOptions) -> SearchResult<Self> {
        options.validate()?;
        let normalizer = Arc::new(Normalizer::new(options.normalization.clone()));
        Ok(Self {
            options,
            normalizer,
        })
    }

    /// Replace the normalization strategy
    pub fn with_normalizer(mut self, normalizer: Arc<dyn TextNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Search raw text for every query
    ///
    /// Rejects empty (or whitespace-only) text and an empty query list
    /// before any worker is started.
    pub fn run_batch<S: AsRef<str>>(&self, text: &str, queries: &[S]) -> SearchResult<SearchReport> {
        self.run_document(&Document::from_text(text), queries)
    }

    /// Search an already-split document for every query
    pub fn run_document<S: AsRef<str>>(
        &self,
        document: &Document,
        queries: &[S],
    ) -> SearchResult<SearchReport> {
        if document.is_empty() {
            return Err(SearchError::EmptyInput(EmptyInput::Text));
        }
        if queries.is_empty() {
            return Err(SearchError::EmptyInput(EmptyInput::Queries));
        }

        let started_at = Utc::now();
        let start = Instant::now();
        let deadline = self.options.deadline().map(|d| start + d);

        let queries: Vec<&str> = queries.iter().map(|q| q.as_ref()).collect();
        let units = if self.options.split_windows {
            queries.len() * self.options.window_sizes.feasible(document.len()).count()
        } else {
            queries.len()
        };
        let workers = allocate_workers(self.options.workers, units);
        if self.options.workers.is_some() && workers.was_clamped() {
            warn!(
                requested = workers.requested,
                granted = workers.granted,
                available = workers.available,
                "worker count clamped"
            );
        }

        let outcomes = self.execute(document, &queries, workers.granted, deadline);

        // Place each outcome in its input slot
        let mut slots: Vec<Option<MatchResult>> = vec![None; queries.len()];
        for (index, result) in outcomes {
            slots[index] = Some(result);
        }
        let entries: Vec<QueryEntry> = queries
            .iter()
            .zip(slots)
            .map(|(query, slot)| QueryEntry {
                query: query.to_string(),
                result: slot.unwrap_or_else(|| {
                    MatchResult::failed(
                        QueryError::Processing("worker returned no result".to_string()),
                        None,
                    )
                }),
            })
            .collect();

        let report = SearchReport {
            entries,
            started_at,
            finished_at: Utc::now(),
            duration_us: start.elapsed().as_micros() as u64,
            workers,
        };

        info!(
            queries = report.len(),
            words = document.len(),
            workers = workers.granted,
            failures = report.failures(),
            duration_us = report.duration_us,
            "batch complete"
        );

        Ok(report)
    }

    #[cfg(feature = "parallel")]
    fn execute(
        &self,
        document: &Document,
        queries: &[&str],
        workers: usize,
        deadline: Option<Instant>,
    ) -> Vec<(usize, MatchResult)> {
        if workers > 1 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("scanmatch-worker-{}", i))
                .build()
            {
                Ok(pool) => {
                    return pool.install(|| {
                        queries
                            .par_iter()
                            .enumerate()
                            .map(|(index, query)| (index, self.run_unit(document, query, deadline)))
                            .collect()
                    });
                }
                Err(e) => {
                    warn!(error = %e, workers, "worker pool unavailable, running batch sequentially");
                }
            }
        }
        self.execute_sequential(document, queries, deadline)
    }

    #[cfg(not(feature = "parallel"))]
    fn execute(
        &self,
        document: &Document,
        queries: &[&str],
        _workers: usize,
        deadline: Option<Instant>,
    ) -> Vec<(usize, MatchResult)> {
        self.execute_sequential(document, queries, deadline)
    }

    fn execute_sequential(
        &self,
        document: &Document,
        queries: &[&str],
        deadline: Option<Instant>,
    ) -> Vec<(usize, MatchResult)> {
        queries
            .iter()
            .enumerate()
            .map(|(index, query)| (index, self.run_unit(document, query, deadline)))
            .collect()
    }

    /// Run one query start-to-finish, isolating panics
    fn run_unit(&self, document: &Document, query: &str, deadline: Option<Instant>) -> MatchResult {
        let started_at = Utc::now();
        let start = Instant::now();

        let outcome = if deadline.is_some_and(|d| start >= d) {
            Ok(Err(QueryError::TimedOut))
        } else {
            panic::catch_unwind(AssertUnwindSafe(|| self.scan(document, query, deadline)))
        };

        let timing = QueryTiming {
            started_at,
            finished_at: Utc::now(),
            duration_us: start.elapsed().as_micros() as u64,
        };

        match outcome {
            Ok(Ok(classification)) => {
                debug!(
                    query,
                    best_distance = ?classification.best_distance(),
                    near = classification.near.len(),
                    far = classification.far.len(),
                    duration_us = timing.duration_us,
                    "query complete"
                );
                MatchResult::from_classification(classification, Some(timing))
            }
            Ok(Err(error)) => {
                warn!(query, error = %error, "query incomplete");
                MatchResult::failed(error, Some(timing))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(query, panic = %message, "query unit panicked");
                MatchResult::failed(QueryError::Processing(message), Some(timing))
            }
        }
    }

    fn scan(
        &self,
        document: &Document,
        query: &str,
        deadline: Option<Instant>,
    ) -> Result<Classification, QueryError> {
        let classifier = MatchClassifier::new(self.normalizer.as_ref(), self.options.thresholds);
        let query_clean = classifier.normalize_query(query);

        if !self.options.split_windows {
            return classifier.classify_normalized(
                &query_clean,
                document.candidates(self.options.window_sizes),
                deadline,
            );
        }

        // One sub-unit per window size, merged back in ascending size order
        let sizes: Vec<usize> = self.options.window_sizes.feasible(document.len()).collect();
        let scan_size = |size: usize| {
            classifier.classify_normalized(&query_clean, document.candidates_of_size(size), deadline)
        };

        // Only fan out when already on a pool worker; a sequential batch
        // stays on the caller thread.
        #[cfg(feature = "parallel")]
        let parts: Vec<Result<Classification, QueryError>> =
            if rayon::current_thread_index().is_some() {
                sizes.par_iter().map(|&size| scan_size(size)).collect()
            } else {
                sizes.iter().map(|&size| scan_size(size)).collect()
            };
        #[cfg(not(feature = "parallel"))]
        let parts: Vec<Result<Classification, QueryError>> =
            sizes.iter().map(|&size| scan_size(size)).collect();

        parts
            .into_iter()
            .try_fold(Classification::default(), |acc, part| Ok(acc.merge(part?)))
    }
}

/// Clamp a requested worker count to `[1, min(units, available_parallelism)]`
pub fn allocate_workers(requested: Option<usize>, units: usize) -> WorkerAllocation {
    let available = std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    let requested = requested.unwrap_or(available);
    let ceiling = units.min(available).max(1);
    WorkerAllocation {
        requested,
        granted: requested.clamp(1, ceiling),
        available,
    }
}

/// Search `document` for every query with default options and `worker_count` workers
pub fn run_batch<S: AsRef<str>>(
    document: &Document,
    queries: &[S],
    worker_count: usize,
) -> SearchResult<SearchReport> {
    SearchEngine::new(SearchOptions::default().with_workers(worker_count))?
        .run_document(document, queries)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
