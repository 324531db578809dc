// piiguard-core/tests/engine_integration_tests.rs
use std::sync::Arc;

use async_trait::async_trait;
use piiguard_core::{
    AgreementTally, DetectionConfig, DetectionMode, PiiGuardError, PiiType, RedactionEngine,
    SemanticDetector, SemanticError, SemanticFailurePolicy, Span,
};

/// A semantic detector that returns a fixed span list.
struct StubDetector {
    spans: Vec<Span>,
}

#[async_trait]
impl SemanticDetector for StubDetector {
    async fn detect(
        &self,
        _text: &str,
        _model_hint: Option<&str>,
    ) -> Result<Vec<Span>, SemanticError> {
        Ok(self.spans.clone())
    }
}

/// A semantic detector that always fails upstream.
struct FailingDetector;

#[async_trait]
impl SemanticDetector for FailingDetector {
    async fn detect(
        &self,
        _text: &str,
        _model_hint: Option<&str>,
    ) -> Result<Vec<Span>, SemanticError> {
        Err(SemanticError::Upstream("backend outage".to_string()))
    }
}

fn engine_with(detector: impl SemanticDetector + 'static) -> RedactionEngine {
    RedactionEngine::new(DetectionConfig::default())
        .unwrap()
        .with_semantic(Arc::new(detector))
}

#[tokio::test]
async fn test_hybrid_merges_both_sources() {
    let text = "Contact me at a@b.com or 192.168.1.1";
    // The stub confirms the email but contributes nothing new.
    let engine = engine_with(StubDetector {
        spans: vec![Span::new(PiiType::Email, 14, 21, "a@b.com")],
    });

    let outcome = engine.redact(text, DetectionMode::Hybrid, None).await.unwrap();
    assert_eq!(
        outcome.redacted_text,
        "Contact me at [REDACTED:EMAIL] or [REDACTED:IPV4]"
    );
    assert_eq!(outcome.stats.heuristic_spans, 2);
    assert_eq!(outcome.stats.semantic_spans, 1);
    assert_eq!(outcome.stats.merged_spans, 2);
    assert_eq!(
        outcome.agreement,
        Some(AgreementTally { agree: 1, heuristic_only: 1, semantic_only: 0 })
    );
}

#[tokio::test]
async fn test_hybrid_agreement_on_overlapping_same_type() {
    // Heuristic finds EMAIL[0,9); the stub overlaps it with the same type.
    let text = "ab@cd.com xyz";
    let engine = engine_with(StubDetector {
        spans: vec![Span::new(PiiType::Email, 3, 11, &text[3..11])],
    });

    let outcome = engine.redact(text, DetectionMode::Hybrid, None).await.unwrap();
    assert_eq!(
        outcome.agreement,
        Some(AgreementTally { agree: 1, heuristic_only: 0, semantic_only: 0 })
    );
    // The two overlapping spans merge into one covering [0,11).
    assert_eq!(outcome.stats.merged_spans, 1);
    assert_eq!(outcome.redacted_text, "[REDACTED:EMAIL]yz");
}

#[tokio::test]
async fn test_semantic_mode_ignores_heuristic_findings() {
    let text = "mail a@b.com, call 555-867-5309";
    let engine = engine_with(StubDetector {
        spans: vec![Span::new(PiiType::Phone, 19, 31, &text[19..31])],
    });

    let outcome = engine.redact(text, DetectionMode::Semantic, None).await.unwrap();
    assert_eq!(outcome.redacted_text, "mail a@b.com, call [REDACTED:PHONE]");
    assert_eq!(outcome.stats.heuristic_spans, 0);
    assert_eq!(outcome.stats.semantic_spans, 1);
    assert!(outcome.agreement.is_none());
}

#[tokio::test]
async fn test_hallucinated_semantic_offsets_are_clipped() {
    let text = "short text";
    let engine = engine_with(StubDetector {
        spans: vec![Span::new(PiiType::Email, 6, 10_000, "hallucinated")],
    });

    let outcome = engine.redact(text, DetectionMode::Semantic, None).await.unwrap();
    assert_eq!(outcome.spans.len(), 1);
    assert_eq!(outcome.spans[0].end, text.len());
    assert_eq!(outcome.spans[0].text, "text");
    assert_eq!(outcome.redacted_text, "short [REDACTED:EMAIL]");
}

#[tokio::test]
async fn test_semantic_failure_fails_request_by_default() {
    let engine = engine_with(FailingDetector);
    let err = engine
        .redact("a@b.com", DetectionMode::Hybrid, None)
        .await
        .unwrap_err();
    assert!(matches!(err, PiiGuardError::Semantic(SemanticError::Upstream(_))));
}

#[tokio::test]
async fn test_hybrid_degrades_to_heuristic_when_configured() {
    let config = DetectionConfig {
        on_semantic_failure: SemanticFailurePolicy::DegradeToHeuristic,
        ..Default::default()
    };
    let engine = RedactionEngine::new(config)
        .unwrap()
        .with_semantic(Arc::new(FailingDetector));

    let outcome = engine
        .redact("Contact me at a@b.com", DetectionMode::Hybrid, None)
        .await
        .unwrap();
    assert_eq!(outcome.redacted_text, "Contact me at [REDACTED:EMAIL]");
    assert_eq!(outcome.stats.semantic_spans, 0);
    // No second raw list survived, so no agreement tally is reported.
    assert!(outcome.agreement.is_none());
}

#[tokio::test]
async fn test_semantic_mode_degrade_falls_back_to_heuristic() {
    let config = DetectionConfig {
        on_semantic_failure: SemanticFailurePolicy::DegradeToHeuristic,
        ..Default::default()
    };
    let engine = RedactionEngine::new(config)
        .unwrap()
        .with_semantic(Arc::new(FailingDetector));

    let outcome = engine
        .redact("ssn 123-45-6789", DetectionMode::Semantic, None)
        .await
        .unwrap();
    assert_eq!(outcome.redacted_text, "ssn [REDACTED:SSN]");
    assert_eq!(outcome.stats.heuristic_spans, 1);
}

#[tokio::test]
async fn test_semantic_mode_without_detector_is_an_error() {
    let engine = RedactionEngine::new(DetectionConfig::default()).unwrap();
    let err = engine
        .redact("a@b.com", DetectionMode::Semantic, None)
        .await
        .unwrap_err();
    assert!(matches!(err, PiiGuardError::SemanticUnavailable(_)));
}

#[tokio::test]
async fn test_heuristic_mode_works_without_detector() {
    let engine = RedactionEngine::new(DetectionConfig::default()).unwrap();
    let outcome = engine
        .redact("a@b.com", DetectionMode::Heuristic, None)
        .await
        .unwrap();
    assert_eq!(outcome.redacted_text, "[REDACTED:EMAIL]");
}

#[tokio::test]
async fn test_empty_text_skips_detectors_entirely() {
    // The failing detector would error if invoked; empty input short-circuits.
    let engine = engine_with(FailingDetector);
    let outcome = engine.redact("", DetectionMode::Hybrid, None).await.unwrap();
    assert_eq!(outcome.redacted_text, "");
    assert_eq!(outcome.chars_redacted, 0);
    assert!(outcome.spans.is_empty());
}

#[tokio::test]
async fn test_custom_token_template() {
    let config = DetectionConfig {
        token_template: "<{type}>".to_string(),
        ..Default::default()
    };
    let engine = RedactionEngine::new(config).unwrap();
    let outcome = engine
        .redact("mail a@b.com now", DetectionMode::Heuristic, None)
        .await
        .unwrap();
    assert_eq!(outcome.redacted_text, "mail <EMAIL> now");
}

#[tokio::test]
async fn test_luhn_valid_card_redacted_invalid_left_alone() {
    let engine = RedactionEngine::new(DetectionConfig::default()).unwrap();

    let valid = engine.redact_heuristic("card 4111111111111111 ok");
    assert_eq!(valid.redacted_text, "card [REDACTED:CREDIT_CARD] ok");

    let invalid = engine.redact_heuristic("card 4111111111111112 ok");
    assert!(!invalid.spans.iter().any(|s| s.pii_type == PiiType::CreditCard));
}
