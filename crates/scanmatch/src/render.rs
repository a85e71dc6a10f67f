//! Report rendering

use std::collections::BTreeSet;
use std::fmt::Write;

use scanmatch_core::{KeywordContext, MatchResult, SearchReport};

use crate::error::Result;

/// Output format for a search report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// Render a report in the requested format
pub fn render(report: &SearchReport, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(render_text(report)),
        Format::Json => render_json(report),
    }
}

/// Human-readable rendering, one block per query
pub fn render_text(report: &SearchReport) -> String {
    let mut out = String::new();
    for (query, result) in report.iter() {
        let _ = writeln!(out, "Search: {}", query);
        write_result(&mut out, result);
        out.push('\n');
    }
    out
}

/// Pretty-printed JSON rendering of the whole report
pub fn render_json(report: &SearchReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Occurrence listing for `--context`
pub fn render_contexts(term: &str, found: &[KeywordContext]) -> String {
    let mut out = String::new();
    if found.is_empty() {
        let _ = writeln!(out, "No occurrences of {:?}", term);
        return out;
    }
    for occurrence in found {
        let _ = writeln!(out, "Found: {}", occurrence.matched);
        let _ = writeln!(out, "Context: {}", occurrence.context);
        out.push_str("---\n");
    }
    out
}

fn write_result(out: &mut String, result: &MatchResult) {
    if let Some(error) = &result.error {
        let _ = writeln!(out, "  Error: {}", error);
        return;
    }
    // A window of bare punctuation sanitizes to ""
    match (result.closest_match.as_deref(), result.best_distance) {
        (Some(best), Some(distance)) if !best.is_empty() => {
            let _ = writeln!(out, "  Closest Match: {} (distance {})", best, distance);
        }
        _ => out.push_str("  Closest Match: N/A\n"),
    }
    let _ = writeln!(out, "  Levenshtein-1 Matches: {}", join(&result.distance1_matches));
    let _ = writeln!(out, "  Levenshtein-2 Matches: {}", join(&result.distance2_matches));
}

fn join(matches: &BTreeSet<String>) -> String {
    let shown: Vec<&str> = matches
        .iter()
        .map(String::as_str)
        .filter(|m| !m.is_empty())
        .collect();
    if shown.is_empty() {
        "None".to_string()
    } else {
        shown.join(", ")
    }
}
