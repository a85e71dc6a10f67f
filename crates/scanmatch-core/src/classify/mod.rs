//! Candidate classification
//!
//! Buckets every candidate of a query by edit distance:
//!
//! - **Exact**: distance 0 (only ever surfaces as the best match)
//! - **Near**: distance 1 by default
//! - **Far**: distance 2 by default
//! - **Reject**: anything further
//!
//! and tracks the lowest-distance candidate. Ties keep the first candidate in
//! window-size-then-position order.
//!
//! # Example
//!
//! ```rust
//! use scanmatch_core::classify::classify;
//! use scanmatch_core::window::{Document, WindowSizes};
//!
//! let doc = Document::from_text("The qick brown fx jumps over the lazy dog.");
//! let result = classify("quick", doc.candidates(WindowSizes::default()));
//! assert_eq!(result.best.unwrap().text, "qick");
//! ```

pub mod classifier;
mod types;

pub use classifier::{classify, MatchClassifier};
pub use types::{BestMatch, Bucket, BucketThresholds, Classification};
