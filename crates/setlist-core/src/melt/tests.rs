//! Tests for setlist melting

use super::*;
use crate::model::UNKNOWN;

fn record(start: u64, end: u64, title: &str, artist: &str) -> RecognitionRecord {
    RecognitionRecord::new(start, end, title, artist, format!("segment_{}.wav", start))
}

fn run(title: &str, artist: &str, start: u64, end: u64) -> Run {
    Run {
        track_title: title.to_string(),
        artist: artist.to_string(),
        start,
        end,
    }
}

#[test]
fn test_melt_merges_consecutive_matches() {
    let records = vec![
        record(0, 60, "A", "X"),
        record(60, 120, "A", "X"),
        record(120, 180, "B", "Y"),
    ];

    let runs = melt(&records);

    assert_eq!(runs, vec![run("A", "X", 0, 120), run("B", "Y", 120, 180)]);
}

#[test]
fn test_melt_single_record() {
    let records = vec![record(0, 60, "A", "X")];
    assert_eq!(melt(&records), vec![run("A", "X", 0, 60)]);
}

#[test]
fn test_melt_empty_input_yields_no_runs() {
    let records: Vec<RecognitionRecord> = Vec::new();
    assert!(melt(&records).is_empty());
}

#[test]
fn test_melt_all_distinct() {
    let records: Vec<_> = (0..5)
        .map(|i| record(i * 60, (i + 1) * 60, &format!("T{}", i), "X"))
        .collect();

    let runs = melt(&records);

    assert_eq!(runs.len(), records.len());
    for (run, rec) in runs.iter().zip(&records) {
        assert_eq!(run.start, rec.segment_start);
        assert_eq!(run.end, rec.segment_end);
    }
}

#[test]
fn test_melt_merges_consecutive_unknowns() {
    let records = vec![
        record(0, 60, "A", "X"),
        record(60, 120, UNKNOWN, UNKNOWN),
        record(120, 180, UNKNOWN, UNKNOWN),
        record(180, 240, "A", "X"),
    ];

    let runs = melt(&records);

    assert_eq!(
        runs,
        vec![
            run("A", "X", 0, 60),
            run(UNKNOWN, UNKNOWN, 60, 180),
            run("A", "X", 180, 240),
        ]
    );
}

#[test]
fn test_melt_comparison_is_case_sensitive_and_needs_both_fields() {
    let records = vec![
        record(0, 60, "A", "X"),
        record(60, 120, "a", "X"),
        record(120, 180, "a", "Y"),
    ];

    assert_eq!(melt(&records).len(), 3);
}

#[test]
fn test_melt_is_idempotent_over_runs() {
    let records = vec![
        record(0, 60, "A", "X"),
        record(60, 120, "A", "X"),
        record(120, 180, "B", "Y"),
        record(180, 240, UNKNOWN, UNKNOWN),
        record(240, 300, "B", "Y"),
        record(300, 360, "B", "Y"),
    ];

    let runs = melt(&records);
    let as_records: Vec<_> = runs
        .iter()
        .map(|r| RecognitionRecord::new(r.start, r.end, &r.track_title, &r.artist, ""))
        .collect();

    assert_eq!(melt(&as_records), runs);
}

#[test]
fn test_melt_runs_cover_input_without_gaps() {
    let titles = ["A", "A", "B", "B", "B", "C", "A", "A"];
    let records: Vec<_> = titles
        .iter()
        .enumerate()
        .map(|(i, t)| record(i as u64 * 30, (i as u64 + 1) * 30, t, "X"))
        .collect();

    let runs = melt(&records);

    assert_eq!(runs.first().unwrap().start, 0);
    assert_eq!(runs.last().unwrap().end, 240);
    for pair in runs.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
        assert_ne!(
            (&pair[0].track_title, &pair[0].artist),
            (&pair[1].track_title, &pair[1].artist)
        );
    }
}
