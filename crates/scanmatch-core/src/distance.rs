//! Distance scorer
//!
//! Classic Levenshtein distance on Unicode scalar values (unit-cost insert,
//! delete, substitute), delegated to `strsim`.

use strsim::levenshtein;

/// Minimum number of single-character edits turning `a` into `b`
#[inline]
pub fn edit_distance(a: &str, b: &str) -> usize {
    levenshtein(a, b)
}

/// Cheap lower bound: the distance is at least the difference in length
#[inline]
pub fn length_lower_bound(a: &str, b: &str) -> usize {
    a.chars().count().abs_diff(b.chars().count())
}
