//! Document and window generator
//!
//! A [`Document`] is the whitespace-split word sequence of the searched text.
//! [`Candidates`] lazily enumerates every contiguous word window, smallest
//! window size first and leftmost position first within a size. That order is
//! the tie-break order of the classifier and must not change.

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Immutable word sequence shared read-only by every query of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    words: Vec<String>,
}

impl Document {
    /// Split raw text on whitespace
    pub fn from_text(text: &str) -> Self {
        Self {
            words: text.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn from_words(words: Vec<String>) -> Self {
        Self { words }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Fresh candidate stream over all requested window sizes
    pub fn candidates(&self, sizes: WindowSizes) -> Candidates<'_> {
        Candidates::new(&self.words, sizes.min, sizes.max)
    }

    /// Candidate stream for a single window size
    pub fn candidates_of_size(&self, size: usize) -> Candidates<'_> {
        Candidates::new(&self.words, size, size)
    }
}

/// Inclusive range of window sizes, in words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSizes {
    pub min: usize,
    pub max: usize,
}

impl WindowSizes {
    pub fn new(min: usize, max: usize) -> Result<Self, SearchError> {
        let sizes = Self { min, max };
        sizes.validate()?;
        Ok(sizes)
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.min == 0 || self.min > self.max {
            return Err(SearchError::InvalidWindowSizes {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Window sizes in ascending order
    pub fn iter(&self) -> std::ops::RangeInclusive<usize> {
        self.min..=self.max
    }

    /// Sizes that fit in a document of `len` words, in ascending order
    pub fn feasible(&self, len: usize) -> std::ops::RangeInclusive<usize> {
        self.min..=self.max.min(len)
    }
}

impl Default for WindowSizes {
    fn default() -> Self {
        Self { min: 1, max: 3 }
    }
}

/// A contiguous span of document words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Original-form text, words joined with single spaces
    pub text: String,
    /// Index of the first word
    pub start: usize,
    /// Number of words
    pub size: usize,
}

/// Lazy, finite candidate stream
///
/// Borrowing the word slice keeps the document untouched, so any number of
/// streams can scan it concurrently.
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    words: &'a [String],
    size: usize,
    max: usize,
    start: usize,
}

impl<'a> Candidates<'a> {
    fn new(words: &'a [String], min: usize, max: usize) -> Self {
        Self {
            words,
            size: min.max(1),
            // Windows wider than the document yield nothing
            max: max.min(words.len()),
            start: 0,
        }
    }
}

impl Iterator for Candidates<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Self::Item> {
        while self.size <= self.max {
            if self.start + self.size <= self.words.len() {
                let start = self.start;
                self.start += 1;
                return Some(Candidate {
                    text: self.words[start..start + self.size].join(" "),
                    start,
                    size: self.size,
                });
            }
            // Size exhausted (or larger than the document)
            self.size += 1;
            self.start = 0;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.words.len();
        let mut remaining = 0;
        for size in self.size..=self.max {
            if size > len {
                break;
            }
            let total = len - size + 1;
            remaining += if size == self.size {
                total.saturating_sub(self.start)
            } else {
                total
            };
        }
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Candidates<'_> {}

impl FusedIterator for Candidates<'_> {}
