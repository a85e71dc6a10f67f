//! Search options

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::classify::BucketThresholds;
use crate::error::SearchError;
use crate::normalize::NormalizeOptions;
use crate::window::WindowSizes;

/// Options for a batch search
///
/// Defaults reproduce the reference behavior: 1-3 word windows, distance-1
/// and distance-2 buckets, one worker per available core, no deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub window_sizes: WindowSizes,
    /// Requested worker count (`None` = available parallelism)
    pub workers: Option<usize>,
    pub thresholds: BucketThresholds,
    /// Batch deadline in milliseconds, measured from batch start
    pub deadline_ms: Option<u64>,
    /// Scan each window size of a query as its own unit of work
    pub split_windows: bool,
    pub normalization: NormalizeOptions,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            window_sizes: WindowSizes::default(),
            workers: None,
            thresholds: BucketThresholds::default(),
            deadline_ms: None,
            split_windows: false,
            normalization: NormalizeOptions::default(),
        }
    }
}

impl SearchOptions {
    pub fn validate(&self) -> Result<(), SearchError> {
        self.window_sizes.validate()?;
        self.thresholds.validate()?;
        Ok(())
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_window_sizes(mut self, window_sizes: WindowSizes) -> Self {
        self.window_sizes = window_sizes;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = Some(deadline.as_millis() as u64);
        self
    }

    pub fn with_split_windows(mut self, split_windows: bool) -> Self {
        self.split_windows = split_windows;
        self
    }
}
