// piiguard-core/src/agreement.rs
//! Agreement analysis between two independently produced span lists.
//!
//! In hybrid mode the heuristic and semantic detectors each emit a raw span
//! list; this module classifies each candidate as mutually confirmed or
//! single-source. The tally is a side-channel quality/drift signal only: it
//! feeds telemetry and never alters the merged span set or the redacted text.
//!
//! License: MIT OR APACHE 2.0

use crate::span::{spans_overlap, Span};

/// Per-request agreement counters between the heuristic and semantic passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgreementTally {
    /// Candidates confirmed by an overlapping, same-typed span from the
    /// other detector.
    pub agree: u64,
    /// Heuristic candidates with no semantic confirmation.
    pub heuristic_only: u64,
    /// Semantic candidates with no heuristic confirmation.
    pub semantic_only: u64,
}

/// Compares two raw span lists.
///
/// A heuristic span *agrees* when any semantic span overlaps it (half-open
/// predicate) with the same type; otherwise it counts as heuristic-only. The
/// semantic pass mirrors this independently, so a region covered by several
/// spans may be counted more than once. That double-count is accepted
/// behavior, not deduplicated.
pub fn compare(heuristic: &[Span], semantic: &[Span]) -> AgreementTally {
    let mut tally = AgreementTally::default();

    for hs in heuristic {
        let confirmed = semantic
            .iter()
            .any(|ss| spans_overlap(hs, ss) && hs.pii_type == ss.pii_type);
        if confirmed {
            tally.agree += 1;
        } else {
            tally.heuristic_only += 1;
        }
    }

    for ss in semantic {
        let confirmed = heuristic
            .iter()
            .any(|hs| spans_overlap(ss, hs) && hs.pii_type == ss.pii_type);
        if !confirmed {
            tally.semantic_only += 1;
        }
    }

    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::PiiType;

    fn span(ty: PiiType, start: usize, end: usize) -> Span {
        Span::new(ty, start, end, "x".repeat(end - start))
    }

    #[test]
    fn test_overlapping_same_type_agrees() {
        let heuristic = vec![span(PiiType::Email, 0, 5)];
        let semantic = vec![span(PiiType::Email, 2, 8)];
        let tally = compare(&heuristic, &semantic);
        assert_eq!(tally, AgreementTally { agree: 1, heuristic_only: 0, semantic_only: 0 });
    }

    #[test]
    fn test_overlapping_different_type_is_single_source_both_ways() {
        let heuristic = vec![span(PiiType::Email, 0, 5)];
        let semantic = vec![span(PiiType::Phone, 2, 8)];
        let tally = compare(&heuristic, &semantic);
        assert_eq!(tally, AgreementTally { agree: 0, heuristic_only: 1, semantic_only: 1 });
    }

    #[test]
    fn test_touching_spans_do_not_agree() {
        // [0,5) and [5,9) merely touch; the half-open predicate says no overlap.
        let heuristic = vec![span(PiiType::Email, 0, 5)];
        let semantic = vec![span(PiiType::Email, 5, 9)];
        let tally = compare(&heuristic, &semantic);
        assert_eq!(tally, AgreementTally { agree: 0, heuristic_only: 1, semantic_only: 1 });
    }

    #[test]
    fn test_disjoint_lists() {
        let heuristic = vec![span(PiiType::Email, 0, 5), span(PiiType::Ssn, 10, 19)];
        let semantic = vec![span(PiiType::Ipv4, 30, 40)];
        let tally = compare(&heuristic, &semantic);
        assert_eq!(tally, AgreementTally { agree: 0, heuristic_only: 2, semantic_only: 1 });
    }

    #[test]
    fn test_double_counting_is_accepted() {
        // Two heuristic spans both overlap one semantic span: both agree.
        let heuristic = vec![span(PiiType::Email, 0, 5), span(PiiType::Email, 3, 9)];
        let semantic = vec![span(PiiType::Email, 2, 7)];
        let tally = compare(&heuristic, &semantic);
        assert_eq!(tally.agree, 2);
        assert_eq!(tally.semantic_only, 0);
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(compare(&[], &[]), AgreementTally::default());
    }
}
