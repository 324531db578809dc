// piiguard-core/src/merge.rs
//! Canonicalizes arbitrary span lists into sorted, non-overlapping form.
//!
//! Detectors emit candidates in table/match order, and two detectors may
//! cover the same region with duplicate or overlapping spans; none of that is
//! an error here. The merger sweeps left to right and reconciles every
//! collision, preferring the longer constituent's type.
//!
//! License: MIT OR APACHE 2.0

use crate::span::Span;

/// Merges overlapping spans; prefers longer spans; keeps the type of the longer.
///
/// Spans are sorted by `(start ascending, length descending)` with a stable
/// sort, so candidates with equal start *and* equal length keep their
/// first-seen order — for heuristic output that is capability-table order,
/// making the tie-break deterministic. The sweep is inclusive at the touch
/// point: a span starting exactly at the current end is merged, not kept
/// separate.
///
/// Inputs are never mutated; the output is a fresh list of new spans that is
/// sorted, pairwise non-overlapping, and covers exactly the union of input
/// positions. Merging is idempotent.
pub fn merge_spans(spans: &[Span]) -> Vec<Span> {
    if spans.is_empty() {
        return Vec::new();
    }

    let mut ordered: Vec<&Span> = spans.iter().collect();
    ordered.sort_by(|a, b| a.start.cmp(&b.start).then(b.len().cmp(&a.len())));

    let mut merged: Vec<Span> = Vec::new();
    let mut cur = ordered[0].clone();
    for s in &ordered[1..] {
        if s.start <= cur.end {
            if s.len() > cur.len() {
                // The incoming span is longer: it donates end, text, and type.
                cur.end = s.end;
                cur.text = s.text.clone();
                cur.pii_type = s.pii_type;
            } else {
                cur.end = cur.end.max(s.end);
            }
        } else {
            merged.push(cur);
            cur = (*s).clone();
        }
    }
    merged.push(cur);
    merged
}
