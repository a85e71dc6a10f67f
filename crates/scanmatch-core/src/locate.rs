//! Occurrence lookup in raw text
//!
//! - [`first_within`]: first single word within an edit budget of a term
//! - [`contexts`]: every whole-word occurrence of a term, with surrounding text

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::distance::edit_distance;
use crate::normalize::TextNormalizer;
use crate::sanitize::sanitize;
use crate::window::Document;

/// Default number of characters kept on each side of an occurrence
pub const DEFAULT_CONTEXT_CHARS: usize = 50;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// First word of `document` whose normalized distance to `term` is at most
/// `max_distance`, in document order
pub fn first_within<'d>(
    document: &'d Document,
    term: &str,
    max_distance: usize,
    normalizer: &dyn TextNormalizer,
) -> Option<&'d str> {
    let term_clean = normalizer.normalize(term, true);
    document
        .words()
        .iter()
        .find(|word| edit_distance(&normalizer.normalize(word, true), &term_clean) <= max_distance)
        .map(|word| sanitize(word))
}

/// One occurrence of a term in the raw text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordContext {
    /// Occurrence as written in the text
    pub matched: String,
    /// Byte offsets of the occurrence
    pub start: usize,
    pub end: usize,
    /// Whitespace-collapsed snippet, with `...` where it was cut
    pub context: String,
}

/// Case-insensitive whole-word occurrences of `term`, in text order
///
/// The term is matched literally. Returns nothing for a blank term.
pub fn contexts(text: &str, term: &str, context_chars: usize) -> Vec<KeywordContext> {
    let term = term.trim();
    if term.is_empty() {
        return Vec::new();
    }

    // \b only anchors next to word characters
    let escaped = regex::escape(term);
    let lead = if term.starts_with(is_word_char) { r"\b" } else { "" };
    let tail = if term.ends_with(is_word_char) { r"\b" } else { "" };
    let pattern = match RegexBuilder::new(&format!("{}{}{}", lead, escaped, tail))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(e) => {
            tracing::warn!(term, error = %e, "could not build occurrence pattern");
            return Vec::new();
        }
    };

    pattern
        .find_iter(text)
        .map(|m| KeywordContext {
            matched: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
            context: extract_context(text, m.start(), m.end(), context_chars),
        })
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Text around `start..end`, snapped to character boundaries
fn extract_context(text: &str, start: usize, end: usize, context_chars: usize) -> String {
    let ctx_start = text[..start]
        .char_indices()
        .rev()
        .nth(context_chars.saturating_sub(1))
        .map_or(0, |(i, _)| i);
    let ctx_start = if context_chars == 0 { start } else { ctx_start };

    let ctx_end = text[end..]
        .char_indices()
        .nth(context_chars)
        .map_or(text.len(), |(i, _)| end + i);

    let mut context = String::new();
    if ctx_start > 0 {
        context.push_str("...");
    }
    context.push_str(&WHITESPACE.replace_all(&text[ctx_start..ctx_end], " "));
    if ctx_end < text.len() {
        context.push_str("...");
    }
    context
}
