//! Search report types

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::Classification;
use crate::error::QueryError;

/// Wall-clock diagnostics for one query unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTiming {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_us: u64,
}

/// Result of one query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Sanitized text of the lowest-distance candidate
    pub closest_match: Option<String>,
    pub best_distance: Option<usize>,
    /// Sanitized candidates in the near bucket, lexicographically ordered
    pub distance1_matches: BTreeSet<String>,
    /// Sanitized candidates in the far bucket, lexicographically ordered
    pub distance2_matches: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<QueryTiming>,
    /// Set when this query's unit failed; the other fields are then empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<QueryError>,
}

impl MatchResult {
    pub fn from_classification(classification: Classification, timing: Option<QueryTiming>) -> Self {
        let best_distance = classification.best_distance();
        Self {
            closest_match: classification.best.map(|b| b.text),
            best_distance,
            distance1_matches: classification.near,
            distance2_matches: classification.far,
            timing,
            error: None,
        }
    }

    pub fn failed(error: QueryError, timing: Option<QueryTiming>) -> Self {
        Self {
            timing,
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// One query and its result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryEntry {
    pub query: String,
    pub result: MatchResult,
}

/// How many workers a batch asked for and got
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerAllocation {
    pub requested: usize,
    pub granted: usize,
    pub available: usize,
}

impl WorkerAllocation {
    pub fn was_clamped(&self) -> bool {
        self.requested != self.granted
    }
}

/// Results of a batch, in input query order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    pub entries: Vec<QueryEntry>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_us: u64,
    pub workers: WorkerAllocation,
}

impl SearchReport {
    /// Result of the first entry for `query`
    pub fn get(&self, query: &str) -> Option<&MatchResult> {
        self.entries
            .iter()
            .find(|e| e.query == query)
            .map(|e| &e.result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MatchResult)> {
        self.entries.iter().map(|e| (e.query.as_str(), &e.result))
    }

    pub fn queries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.query.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of queries that carry an error marker
    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|e| !e.result.is_ok()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::BestMatch;

    fn report(queries: &[&str]) -> SearchReport {
        let now = Utc::now();
        SearchReport {
            entries: queries
                .iter()
                .map(|q| QueryEntry {
                    query: q.to_string(),
                    result: MatchResult::default(),
                })
                .collect(),
            started_at: now,
            finished_at: now,
            duration_us: 0,
            workers: WorkerAllocation {
                requested: 1,
                granted: 1,
                available: 1,
            },
        }
    }

    #[test]
    fn test_from_classification() {
        let classification = Classification {
            best: Some(BestMatch {
                text: "qick".to_string(),
                distance: 1,
                start: 1,
                size: 1,
            }),
            near: ["qick".to_string()].into_iter().collect(),
            far: BTreeSet::new(),
        };
        let result = MatchResult::from_classification(classification, None);
        assert_eq!(result.closest_match.as_deref(), Some("qick"));
        assert_eq!(result.best_distance, Some(1));
        assert!(result.is_ok());
    }

    #[test]
    fn test_failed_result_is_empty() {
        let result = MatchResult::failed(QueryError::TimedOut, None);
        assert!(!result.is_ok());
        assert!(result.closest_match.is_none());
        assert!(result.distance1_matches.is_empty());
    }

    #[test]
    fn test_get_returns_first_duplicate() {
        let mut r = report(&["dose", "dose"]);
        r.entries[0].result.closest_match = Some("first".to_string());
        assert_eq!(
            r.get("dose").and_then(|m| m.closest_match.as_deref()),
            Some("first")
        );
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn test_error_marker_serialization() {
        let result = MatchResult::failed(QueryError::Processing("boom".to_string()), None);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"]["kind"], "processing");
        assert_eq!(json["error"]["detail"], "boom");
        assert!(json.get("timing").is_none());
    }

    #[test]
    fn test_clamp_flag() {
        let allocation = WorkerAllocation {
            requested: 64,
            granted: 4,
            available: 8,
        };
        assert!(allocation.was_clamped());
    }
}
