//! Scanmatch Core Engine
//!
//! Fuzzy phrase lookup over noisy OCR text. Each query is compared against
//! every contiguous word window of a document, scored by edit distance on
//! normalized forms, and bucketed by distance. A batch of queries is fanned
//! out over a worker pool; results come back in input order.
//!
//! # Features
//!
//! - `parallel` - Worker pool via rayon (default). Without it every batch
//!   runs sequentially with identical results.
//!
//! # Example
//!
//! ```rust
//! use scanmatch_core::{SearchEngine, SearchOptions};
//!
//! let engine = SearchEngine::new(SearchOptions::default().with_workers(2)).unwrap();
//! let report = engine
//!     .run_batch("The qick brown fx jumps over the lazy dog.", &["quick", "fox"])
//!     .unwrap();
//!
//! let quick = report.get("quick").unwrap();
//! assert_eq!(quick.closest_match.as_deref(), Some("qick"));
//! assert_eq!(quick.best_distance, Some(1));
//! ```

pub mod classify;
pub mod dispatch;
pub mod distance;
pub mod error;
pub mod locate;
pub mod normalize;
pub mod options;
pub mod report;
pub mod sanitize;
pub mod window;

// Re-export main types at crate root
pub use classify::{
    classify, BestMatch, Bucket, BucketThresholds, Classification, MatchClassifier,
};
pub use dispatch::{allocate_workers, run_batch, SearchEngine};
pub use distance::edit_distance;
pub use error::{EmptyInput, QueryError, SearchError, SearchResult};
pub use locate::{contexts, first_within, KeywordContext, DEFAULT_CONTEXT_CHARS};
pub use normalize::{normalize, NormalizeOptions, Normalizer, SubstitutionTable, TextNormalizer};
pub use options::SearchOptions;
pub use report::{MatchResult, QueryEntry, QueryTiming, SearchReport, WorkerAllocation};
pub use sanitize::sanitize;
pub use window::{Candidate, Candidates, Document, WindowSizes};
