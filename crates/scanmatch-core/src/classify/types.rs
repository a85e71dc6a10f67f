//! Classification types

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Distance bucket of a scored candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bucket {
    /// Distance 0
    Exact,
    /// 1..=near edits
    Near,
    /// near+1..=far edits
    Far,
    /// Further than `far`
    Reject,
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Near => write!(f, "near"),
            Self::Far => write!(f, "far"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Upper distance bounds of the near and far buckets
///
/// The defaults (1 and 2) produce the distance-1 and distance-2 sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketThresholds {
    pub near: usize,
    pub far: usize,
}

impl Default for BucketThresholds {
    fn default() -> Self {
        Self { near: 1, far: 2 }
    }
}

impl BucketThresholds {
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.near == 0 || self.near >= self.far {
            return Err(SearchError::InvalidThresholds {
                near: self.near,
                far: self.far,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn bucket(&self, distance: usize) -> Bucket {
        match distance {
            0 => Bucket::Exact,
            d if d <= self.near => Bucket::Near,
            d if d <= self.far => Bucket::Far,
            _ => Bucket::Reject,
        }
    }
}

/// The lowest-distance candidate seen so far
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestMatch {
    /// Sanitized original-form text
    pub text: String,
    pub distance: usize,
    /// Word index of the window start
    pub start: usize,
    /// Window size in words
    pub size: usize,
}

/// Accumulated state of one query's scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub best: Option<BestMatch>,
    /// Sanitized matches in the near bucket
    pub near: BTreeSet<String>,
    /// Sanitized matches in the far bucket
    pub far: BTreeSet<String>,
}

impl Classification {
    pub fn best_distance(&self) -> Option<usize> {
        self.best.as_ref().map(|b| b.distance)
    }

    /// Combine with the classification of the candidates that follow this one
    ///
    /// `later` only replaces the best match on a strictly lower distance, so
    /// merging consecutive ranges in scan order keeps the first-seen winner.
    pub fn merge(mut self, later: Classification) -> Classification {
        let replace = match (&self.best, &later.best) {
            (None, Some(_)) => true,
            (Some(ours), Some(theirs)) => theirs.distance < ours.distance,
            _ => false,
        };
        if replace {
            self.best = later.best;
        }
        self.near.extend(later.near);
        self.far.extend(later.far);
        self.into_disjoint()
    }

    /// Drop far-bucket entries that also landed in the near bucket
    pub(crate) fn into_disjoint(mut self) -> Self {
        if !self.near.is_empty() {
            let near = &self.near;
            self.far.retain(|s| !near.contains(s));
        }
        self
    }
}
