//! Normalizer - canonical comparison form for tokens and phrases
//!
//! Normalization order:
//! 1. Collapse whitespace runs and trim
//! 2. Strip one leading list-numbering prefix (`"12. "`), if enabled
//! 3. Lower-case
//! 4. Drop every character that is neither alphanumeric nor whitespace
//!    (whitespace too, unless spaces are preserved)
//! 5. Apply the injected character substitution table
//! 6. Re-collapse so words are separated by exactly one space
//!
//! The output only contains lower-case alphanumerics and single spaces,
//! which makes `normalize` idempotent.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref LIST_NUMBERING: Regex = Regex::new(r"^\d+\.\s*").unwrap();
}

/// Immutable character map applied after case folding
///
/// Every target must be a lower-case alphanumeric that is not itself a
/// source, otherwise a second normalization pass could change the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(char, char)>", into = "Vec<(char, char)>")]
pub struct SubstitutionTable {
    pairs: Vec<(char, char)>,
}

impl SubstitutionTable {
    /// Build a table, rejecting mappings that would break idempotence
    pub fn new(pairs: impl IntoIterator<Item = (char, char)>) -> Result<Self, SearchError> {
        let mut table: Vec<(char, char)> = Vec::new();
        for (from, to) in pairs {
            if table.iter().any(|(f, _)| *f == from) {
                continue;
            }
            table.push((from, to));
        }

        for &(from, to) in &table {
            let lowercase_stable = to.to_lowercase().eq(std::iter::once(to));
            let chained = table.iter().any(|(f, _)| *f == to);
            if !to.is_alphanumeric() || !lowercase_stable || chained {
                return Err(SearchError::InvalidSubstitution { from, to });
            }
        }

        Ok(Self { pairs: table })
    }

    /// Legacy OCR digit repair: `1 -> i`, `0 -> o`, `5 -> s`
    pub fn ocr_digits() -> Self {
        Self {
            pairs: vec![('1', 'i'), ('0', 'o'), ('5', 's')],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[inline]
    fn apply(&self, c: char) -> char {
        self.pairs
            .iter()
            .find(|(from, _)| *from == c)
            .map_or(c, |(_, to)| *to)
    }
}

impl TryFrom<Vec<(char, char)>> for SubstitutionTable {
    type Error = SearchError;

    fn try_from(pairs: Vec<(char, char)>) -> Result<Self, Self::Error> {
        Self::new(pairs)
    }
}

impl From<SubstitutionTable> for Vec<(char, char)> {
    fn from(table: SubstitutionTable) -> Self {
        table.pairs
    }
}

/// Normalization settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Strip a single leading `"<digits>. "` prefix (list-numbering noise)
    pub strip_list_numbering: bool,
    /// Character substitutions applied after case folding (empty by default)
    pub substitution: SubstitutionTable,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            strip_list_numbering: true,
            substitution: SubstitutionTable::default(),
        }
    }
}

/// Normalization strategy shared read-only by every worker of a batch
pub trait TextNormalizer: Send + Sync {
    fn normalize(&self, text: &str, preserve_spaces: bool) -> String;
}

/// Pure, shareable normalizer
///
/// Holds its resources explicitly so callers can inject a different
/// substitution strategy without touching global state.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalize `text` for distance scoring
    pub fn normalize(&self, text: &str, preserve_spaces: bool) -> String {
        let collapsed = WHITESPACE.replace_all(text.trim(), " ");
        let body = if self.options.strip_list_numbering {
            LIST_NUMBERING.replace(&collapsed, "")
        } else {
            collapsed
        };
        let lowered = body.to_lowercase();

        let mut out = String::with_capacity(lowered.len());
        let mut pending_space = false;
        for c in lowered.chars() {
            if c.is_whitespace() {
                pending_space = preserve_spaces;
                continue;
            }
            if !c.is_alphanumeric() {
                continue;
            }
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(self.options.substitution.apply(c));
        }
        out
    }
}

impl TextNormalizer for Normalizer {
    fn normalize(&self, text: &str, preserve_spaces: bool) -> String {
        Normalizer::normalize(self, text, preserve_spaces)
    }
}

/// Normalize with default options
pub fn normalize(text: &str, preserve_spaces: bool) -> String {
    Normalizer::default().normalize(text, preserve_spaces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_strip_punctuation() {
        assert_eq!(normalize("Invoice Numbr:", true), "invoice numbr");
        assert_eq!(normalize("Invoice Numbr:", false), "invoicenumbr");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  the \t quick\n\nfox  ", true), "the quick fox");
    }

    #[test]
    fn test_punctuation_between_words_does_not_leave_double_space() {
        assert_eq!(normalize("a - b", true), "a b");
        assert_eq!(normalize("a - b", true), normalize("a b", true));
    }

    #[test]
    fn test_strips_list_numbering_once() {
        assert_eq!(normalize("12. Paracetamol", true), "paracetamol");
        assert_eq!(normalize("1. 2. dose", true), "2 dose");
        assert_eq!(normalize("   3.   Item", true), "item");
    }

    #[test]
    fn test_list_numbering_can_be_disabled() {
        let normalizer = Normalizer::new(NormalizeOptions {
            strip_list_numbering: false,
            ..Default::default()
        });
        assert_eq!(normalizer.normalize("12. Paracetamol", true), "12 paracetamol");
    }

    #[test]
    fn test_digits_kept_without_substitution() {
        assert_eq!(normalize("examp1e", true), "examp1e");
    }

    #[test]
    fn test_ocr_digit_substitution() {
        let normalizer = Normalizer::new(NormalizeOptions {
            substitution: SubstitutionTable::ocr_digits(),
            ..Default::default()
        });
        assert_eq!(normalizer.normalize("Th1s 5can 0k", true), "this scan ok");
    }

    #[test]
    fn test_substitution_rejects_chains() {
        let err = SubstitutionTable::new([('1', 'l'), ('l', 'i')]).unwrap_err();
        assert_eq!(err, SearchError::InvalidSubstitution { from: '1', to: 'l' });
    }

    #[test]
    fn test_substitution_rejects_non_alphanumeric_target() {
        assert!(SubstitutionTable::new([('1', '!')]).is_err());
        assert!(SubstitutionTable::new([('1', 'I')]).is_err());
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert_eq!(normalize("", true), "");
        assert_eq!(normalize("?!:;,", true), "");
        assert_eq!(normalize("   ", false), "");
    }

    #[test]
    fn test_unicode_letters_survive() {
        assert_eq!(normalize("Café Größe", true), "café größe");
    }

    #[test]
    fn test_idempotent_samples() {
        let samples = [
            "",
            "...",
            "1. 2. 3. x",
            "Th1s is an examp1e document scannd for test1ng.",
            "  A -- B :: C  ",
            "İstanbul",
        ];
        for s in samples {
            for preserve in [true, false] {
                let once = normalize(s, preserve);
                assert_eq!(normalize(&once, preserve), once, "input: {:?}", s);
            }
        }
    }
}
