//! Match sanitizer - display cleanup for accepted matches
//!
//! Only applied to values placed in results, never to scoring input.

/// Punctuation removed from the end of a surfaced match
pub const TRAILING_PUNCTUATION: [char; 5] = [':', ';', ',', '!', '?'];

/// Remove a trailing run of `: ; , ! ?` (and whitespace around it), then trim
///
/// Case and internal punctuation are preserved.
pub fn sanitize(text: &str) -> &str {
    text.trim_end_matches(|c: char| TRAILING_PUNCTUATION.contains(&c) || c.is_whitespace())
        .trim()
}
