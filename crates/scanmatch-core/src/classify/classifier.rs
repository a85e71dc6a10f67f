//! Match classifier
//!
//! Scores every candidate of one query against the normalized query and
//! buckets it by edit distance while tracking the best candidate.

use std::time::Instant;

use super::types::{BestMatch, Bucket, BucketThresholds, Classification};
use crate::distance::{edit_distance, length_lower_bound};
use crate::error::QueryError;
use crate::normalize::{Normalizer, TextNormalizer};
use crate::sanitize::sanitize;
use crate::window::Candidate;

/// Candidates scored between two deadline checks
const DEADLINE_CHECK_INTERVAL: usize = 256;

/// Per-query classifier over a shared normalizer
#[derive(Clone, Copy)]
pub struct MatchClassifier<'n> {
    normalizer: &'n dyn TextNormalizer,
    thresholds: BucketThresholds,
}

impl<'n> MatchClassifier<'n> {
    pub fn new(normalizer: &'n dyn TextNormalizer, thresholds: BucketThresholds) -> Self {
        Self {
            normalizer,
            thresholds,
        }
    }

    /// Normalize a query the same way candidates are normalized
    pub fn normalize_query(&self, query: &str) -> String {
        self.normalizer.normalize(query, true)
    }

    /// Classify `candidates` against a raw query
    pub fn classify<I>(&self, query: &str, candidates: I) -> Classification
    where
        I: IntoIterator<Item = Candidate>,
    {
        let query_clean = self.normalize_query(query);
        // Without a deadline the scan cannot time out
        self.classify_normalized(&query_clean, candidates, None)
            .unwrap_or_default()
    }

    /// Classify against an already-normalized query, stopping at `deadline`
    ///
    /// Candidates must arrive in window-size-then-position order: the best
    /// match is only replaced on a strictly lower distance.
    pub fn classify_normalized<I>(
        &self,
        query_clean: &str,
        candidates: I,
        deadline: Option<Instant>,
    ) -> Result<Classification, QueryError>
    where
        I: IntoIterator<Item = Candidate>,
    {
        let mut state = Classification::default();

        for (scanned, candidate) in candidates.into_iter().enumerate() {
            if let Some(deadline) = deadline {
                if scanned % DEADLINE_CHECK_INTERVAL == 0 && Instant::now() >= deadline {
                    return Err(QueryError::TimedOut);
                }
            }

            let candidate_clean = self.normalizer.normalize(&candidate.text, true);

            // Skip the full DP when the candidate can neither land in a
            // bucket nor beat the current best.
            let lower_bound = length_lower_bound(&candidate_clean, query_clean);
            if lower_bound > self.thresholds.far
                && state.best_distance().is_some_and(|best| lower_bound >= best)
            {
                continue;
            }

            let distance = edit_distance(&candidate_clean, query_clean);
            self.observe(&mut state, &candidate, distance);
        }

        Ok(state.into_disjoint())
    }

    fn observe(&self, state: &mut Classification, candidate: &Candidate, distance: usize) {
        match self.thresholds.bucket(distance) {
            Bucket::Near => {
                state.near.insert(sanitize(&candidate.text).to_string());
            }
            Bucket::Far => {
                state.far.insert(sanitize(&candidate.text).to_string());
            }
            Bucket::Exact | Bucket::Reject => {}
        }

        if state.best_distance().map_or(true, |best| distance < best) {
            state.best = Some(BestMatch {
                text: sanitize(&candidate.text).to_string(),
                distance,
                start: candidate.start,
                size: candidate.size,
            });
        }
    }
}

/// Classify with the default normalizer and the distance-1/distance-2 buckets
pub fn classify<I>(query: &str, candidates: I) -> Classification
where
    I: IntoIterator<Item = Candidate>,
{
    let normalizer = Normalizer::default();
    MatchClassifier::new(&normalizer, BucketThresholds::default()).classify(query, candidates)
}
