//! End-to-end batch tests for SearchEngine

use std::collections::BTreeSet;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use scanmatch_core::{
    Document, EmptyInput, Normalizer, QueryError, SearchEngine, SearchError, SearchOptions,
    TextNormalizer, WindowSizes,
};

const OCR_SAMPLE: &str = "Th1s is an examp1e document scannd for test1ng. \
    The qick brown fx jumps over the lazy dog. Invoice numbr: 123456";

fn engine(workers: usize) -> SearchEngine {
    SearchEngine::new(SearchOptions::default().with_workers(workers)).unwrap()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_digit_typo_within_one() {
    let report = engine(1)
        .run_batch("Th1s is an examp1e document scannd for test1ng.", &["example"])
        .unwrap();
    let result = report.get("example").unwrap();
    assert_eq!(result.closest_match.as_deref(), Some("examp1e"));
    assert_eq!(result.best_distance, Some(1));
    assert!(result.distance1_matches.contains("examp1e"));
}

#[test]
fn test_missing_letter() {
    let report = engine(2)
        .run_batch("The qick brown fx jumps over the lazy dog.", &["quick"])
        .unwrap();
    let result = report.get("quick").unwrap();
    assert_eq!(result.closest_match.as_deref(), Some("qick"));
    assert_eq!(result.distance1_matches, set(&["qick"]));
}

#[test]
fn test_trailing_colon_sanitized() {
    let report = engine(1).run_batch("Invoice numbr: 123456", &["number"]).unwrap();
    let result = report.get("number").unwrap();
    assert_eq!(result.closest_match.as_deref(), Some("numbr"));
    assert_eq!(result.best_distance, Some(1));
    assert!(result.distance1_matches.iter().all(|m| !m.ends_with(':')));
}

#[test]
fn test_empty_text_rejected_before_dispatch() {
    let err = engine(4).run_batch("", &["quick", "dog"]).unwrap_err();
    assert_eq!(err, SearchError::EmptyInput(EmptyInput::Text));
}

#[test]
fn test_query_longer_than_document() {
    let report = engine(1)
        .run_batch("lazy dog", &["the very lazy brown dog"])
        .unwrap();
    let result = report.get("the very lazy brown dog").unwrap();
    // Only 1- and 2-word windows exist; the best one is still reported
    assert_eq!(result.closest_match.as_deref(), Some("lazy dog"));
    assert!(result.distance1_matches.is_empty());
    assert!(result.distance2_matches.is_empty());
}

#[test]
fn test_document_shorter_than_smallest_window() {
    let options = SearchOptions::default().with_window_sizes(WindowSizes::new(3, 4).unwrap());
    let engine = SearchEngine::new(options).unwrap();
    let report = engine.run_batch("lazy dog", &["lazy dog"]).unwrap();
    let result = report.get("lazy dog").unwrap();
    assert!(result.is_ok());
    assert_eq!(result.closest_match, None);
    assert_eq!(result.best_distance, None);
}

#[test]
fn test_empty_document_rejected() {
    let err = engine(1)
        .run_document(&Document::default(), &["anything"])
        .unwrap_err();
    assert_eq!(err, SearchError::EmptyInput(EmptyInput::Text));
}

#[test]
fn test_punctuation_only_text_yields_empty_results() {
    let report = engine(1).run_batch("... ;; !!", &["anything"]).unwrap();
    let result = report.get("anything").unwrap();
    assert!(result.is_ok());
    // Every candidate normalizes to "", so the best is the first window
    assert_eq!(result.closest_match.as_deref(), Some("..."));
}

#[test]
fn test_results_independent_of_worker_count() {
    let queries = [
        "example", "quick", "fox", "number", "invoice", "testing", "lazy dog", "document scanned",
    ];
    let baseline = engine(1).run_batch(OCR_SAMPLE, &queries).unwrap();

    for workers in [2, 3, 8, 64] {
        let report = engine(workers).run_batch(OCR_SAMPLE, &queries).unwrap();
        assert_eq!(report.len(), baseline.len());
        for ((qa, ra), (qb, rb)) in baseline.iter().zip(report.iter()) {
            assert_eq!(qa, qb);
            assert_eq!(ra.closest_match, rb.closest_match, "query {}", qa);
            assert_eq!(ra.best_distance, rb.best_distance, "query {}", qa);
            assert_eq!(ra.distance1_matches, rb.distance1_matches, "query {}", qa);
            assert_eq!(ra.distance2_matches, rb.distance2_matches, "query {}", qa);
        }
    }
}

#[test]
fn test_duplicate_queries_each_get_an_entry() {
    let report = engine(2).run_batch(OCR_SAMPLE, &["fox", "fox"]).unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report.entries[0].result.closest_match, report.entries[1].result.closest_match);
}

#[test]
fn test_many_queries_keep_input_order() {
    let queries: Vec<String> = (0..200).map(|i| format!("word{}", i)).collect();
    let text: String = (0..200).rev().map(|i| format!("word{} ", i)).collect();
    let report = engine(8).run_batch(&text, &queries).unwrap();

    let order: Vec<&str> = report.queries().collect();
    let expected: Vec<&str> = queries.iter().map(String::as_str).collect();
    assert_eq!(order, expected);
    for (query, result) in report.iter() {
        assert_eq!(result.closest_match.as_deref(), Some(query));
        assert_eq!(result.best_distance, Some(0));
    }
}

/// Normalizer that panics on one poisoned input
struct PoisonedNormalizer {
    inner: Normalizer,
}

impl TextNormalizer for PoisonedNormalizer {
    fn normalize(&self, text: &str, preserve_spaces: bool) -> String {
        if text.contains("boom") {
            panic!("poisoned input: {}", text);
        }
        self.inner.normalize(text, preserve_spaces)
    }
}

#[test]
fn test_panicking_query_is_isolated() {
    let engine = engine(4).with_normalizer(Arc::new(PoisonedNormalizer {
        inner: Normalizer::default(),
    }));
    let report = engine
        .run_batch("The qick brown fx jumps", &["quick", "boom", "brown"])
        .unwrap();

    assert_eq!(report.len(), 3);
    assert_eq!(report.failures(), 1);

    let failed = report.get("boom").unwrap();
    match &failed.error {
        Some(QueryError::Processing(message)) => assert!(message.contains("poisoned input")),
        other => panic!("expected processing error, got {:?}", other),
    }
    assert_eq!(failed.closest_match, None);

    assert_eq!(report.get("quick").unwrap().closest_match.as_deref(), Some("qick"));
    assert_eq!(report.get("brown").unwrap().closest_match.as_deref(), Some("brown"));
}

#[test]
fn test_ocr_digit_table_changes_scores() {
    let options = SearchOptions {
        normalization: scanmatch_core::NormalizeOptions {
            substitution: scanmatch_core::SubstitutionTable::ocr_digits(),
            ..Default::default()
        },
        ..Default::default()
    };
    let repaired = SearchEngine::new(options)
        .unwrap()
        .run_batch("Th1s 5can", &["this scan"])
        .unwrap();
    let result = repaired.get("this scan").unwrap();
    assert_eq!(result.closest_match.as_deref(), Some("Th1s 5can"));
    assert_eq!(result.best_distance, Some(0));

    // Without the table both digits cost an edit
    let plain = engine(1).run_batch("Th1s 5can", &["this scan"]).unwrap();
    let result = plain.get("this scan").unwrap();
    assert_eq!(result.closest_match.as_deref(), Some("Th1s 5can"));
    assert_eq!(result.best_distance, Some(2));
    assert_eq!(result.distance2_matches, set(&["Th1s 5can"]));
}

#[test]
fn test_report_serializes_to_json() {
    let report = engine(1).run_batch("Invoice numbr: 123456", &["number"]).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    let entry = &json["entries"][0];
    assert_eq!(entry["query"], "number");
    assert_eq!(entry["result"]["closest_match"], "numbr");
    assert_eq!(entry["result"]["distance1_matches"][0], "numbr");
    assert!(entry["result"].get("error").is_none());
    assert_eq!(json["workers"]["granted"], 1);
}
