//! Search configuration loading.
//!
//! Layers, lowest precedence first:
//! 1. `SearchOptions::default()`
//! 2. JSON config file
//! 3. Environment variables (`SCANMATCH_WORKERS`, `SCANMATCH_MAX_WINDOW`,
//!    `SCANMATCH_DEADLINE_MS`)
//! 4. Command-line overrides

use std::path::Path;
use std::str::FromStr;

use scanmatch_core::{SearchOptions, SubstitutionTable};
use tracing::debug;

use crate::error::{Error, Result};

/// Requested worker count
pub const ENV_WORKERS: &str = "SCANMATCH_WORKERS";
/// Largest window size, in words
pub const ENV_MAX_WINDOW: &str = "SCANMATCH_MAX_WINDOW";
/// Batch deadline in milliseconds
pub const ENV_DEADLINE_MS: &str = "SCANMATCH_DEADLINE_MS";

/// Command-line level overrides. `None` leaves the lower layer in place.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub workers: Option<usize>,
    pub min_window: Option<usize>,
    pub max_window: Option<usize>,
    pub deadline_ms: Option<u64>,
    pub split_windows: bool,
    pub ocr_digits: bool,
}

impl Overrides {
    pub fn apply(&self, mut options: SearchOptions) -> SearchOptions {
        if let Some(workers) = self.workers {
            options.workers = Some(workers);
        }
        if let Some(min) = self.min_window {
            options.window_sizes.min = min;
        }
        if let Some(max) = self.max_window {
            options.window_sizes.max = max;
        }
        if let Some(deadline_ms) = self.deadline_ms {
            options.deadline_ms = Some(deadline_ms);
        }
        if self.split_windows {
            options.split_windows = true;
        }
        if self.ocr_digits {
            options.normalization.substitution = SubstitutionTable::ocr_digits();
        }
        options
    }
}

/// Read options from a JSON file; missing fields take their defaults
pub fn load_file(path: &Path) -> Result<SearchOptions> {
    let raw = std::fs::read_to_string(path)?;
    let options = serde_json::from_str(&raw)?;
    debug!(path = %path.display(), "loaded search options");
    Ok(options)
}

/// Apply environment overrides read through `lookup`
pub fn apply_env<F>(mut options: SearchOptions, lookup: F) -> Result<SearchOptions>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(workers) = parse_var(&lookup, ENV_WORKERS)? {
        options.workers = Some(workers);
    }
    if let Some(max) = parse_var(&lookup, ENV_MAX_WINDOW)? {
        options.window_sizes.max = max;
    }
    if let Some(deadline_ms) = parse_var(&lookup, ENV_DEADLINE_MS)? {
        options.deadline_ms = Some(deadline_ms);
    }
    Ok(options)
}

/// Resolve the full option stack and validate it
pub fn resolve(config: Option<&Path>, overrides: &Overrides) -> Result<SearchOptions> {
    let options = match config {
        Some(path) => load_file(path)?,
        None => SearchOptions::default(),
    };
    let options = apply_env(options, |key| std::env::var(key).ok())?;
    let options = overrides.apply(options);
    options.validate()?;
    Ok(options)
}

/// Split a comma-separated query list, dropping blank entries
pub fn parse_queries(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{}: invalid value {:?}", key, raw))),
    }
}
