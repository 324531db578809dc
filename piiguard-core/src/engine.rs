// piiguard-core/src/engine.rs
//! The detection/redaction orchestrator.
//!
//! `RedactionEngine` wires the four pure primitives (heuristic detection,
//! span merging, agreement analysis, redaction) to the asynchronous semantic
//! detector seam and the metrics sink, and owns the fixed combination policy:
//! heuristic-only redacts the merged heuristic spans, semantic-only the
//! merged semantic spans, and hybrid the merge of both raw lists with the
//! agreement tally emitted as a telemetry side channel.
//!
//! The heuristic path is synchronous and never fails; only the semantic and
//! hybrid paths can, and those honor the configured failure policy. The
//! engine holds no mutable state across requests, so identical inputs always
//! produce identical outputs.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;
use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::agreement::{compare, AgreementTally};
use crate::config::{DetectionConfig, SemanticFailurePolicy};
use crate::detectors::heuristic::HeuristicDetector;
use crate::detectors::semantic::SemanticDetector;
use crate::errors::PiiGuardError;
use crate::merge::merge_spans;
use crate::metrics::{DetectionMethod, MetricsSink, NoopMetrics};
use crate::redact::redact;
use crate::span::{canonical_sample_hash, sanitize_spans, Span};

/// Which detectors feed the redaction for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMode {
    Heuristic,
    Semantic,
    Hybrid,
}

impl DetectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMode::Heuristic => "heuristic",
            DetectionMode::Semantic => "semantic",
            DetectionMode::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-merge span counts for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedactionStats {
    pub heuristic_spans: usize,
    pub semantic_spans: usize,
    pub merged_spans: usize,
}

/// The result of one detection/redaction request.
#[derive(Debug, Clone)]
pub struct RedactionOutcome {
    pub mode: DetectionMode,
    pub redacted_text: String,
    /// The merged, non-overlapping spans that were redacted.
    pub spans: Vec<Span>,
    /// Sum of original span lengths removed from the text.
    pub chars_redacted: usize,
    pub stats: RedactionStats,
    /// Present only for hybrid requests where both detectors ran.
    pub agreement: Option<AgreementTally>,
}

/// Orchestrates detectors, merger, and redactor for one configuration.
///
/// The engine is `Send + Sync` and safe for unlimited parallel use: its only
/// shared state is the read-only compiled pattern table and the injected
/// collaborators.
pub struct RedactionEngine {
    config: DetectionConfig,
    heuristic: HeuristicDetector,
    semantic: Option<Arc<dyn SemanticDetector>>,
    metrics: Arc<dyn MetricsSink>,
}

impl RedactionEngine {
    /// Creates an engine with no semantic detector and a no-op metrics sink.
    pub fn new(config: DetectionConfig) -> Result<Self, PiiGuardError> {
        config.validate();
        let heuristic = HeuristicDetector::with_config(&config)?;
        Ok(Self {
            config,
            heuristic,
            semantic: None,
            metrics: Arc::new(NoopMetrics),
        })
    }

    /// Installs a semantic detector, enabling the semantic and hybrid modes.
    pub fn with_semantic(mut self, detector: Arc<dyn SemanticDetector>) -> Self {
        self.semantic = Some(detector);
        self
    }

    /// Installs a metrics sink shared by the engine and its detectors.
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.heuristic.set_metrics(Arc::clone(&metrics));
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Heuristic-only detection and redaction. Synchronous and infallible.
    pub fn redact_heuristic(&self, text: &str) -> RedactionOutcome {
        if text.is_empty() {
            return self.empty_outcome(DetectionMode::Heuristic, text);
        }
        let heuristic_spans = self.heuristic.detect(text);
        self.finish(DetectionMode::Heuristic, text, heuristic_spans, Vec::new(), None)
    }

    /// Runs detection and redaction in the requested mode.
    ///
    /// `model_hint` is forwarded verbatim to the semantic detector. The
    /// heuristic mode cannot fail; semantic and hybrid can, subject to the
    /// configured [`SemanticFailurePolicy`]. In hybrid mode the heuristic
    /// scan and the semantic call are joined concurrently.
    pub async fn redact(
        &self,
        text: &str,
        mode: DetectionMode,
        model_hint: Option<&str>,
    ) -> Result<RedactionOutcome, PiiGuardError> {
        if text.is_empty() {
            return Ok(self.empty_outcome(mode, text));
        }

        match mode {
            DetectionMode::Heuristic => Ok(self.redact_heuristic(text)),
            DetectionMode::Semantic => {
                let detector = self.require_semantic(mode)?;
                match detector.detect(text, model_hint).await {
                    Ok(raw) => {
                        let semantic_spans = self.accept_semantic_spans(text, raw);
                        Ok(self.finish(mode, text, Vec::new(), semantic_spans, None))
                    }
                    Err(e) => self.degrade_or_fail(mode, text, None, e),
                }
            }
            DetectionMode::Hybrid => {
                let detector = self.require_semantic(mode)?;
                let (heuristic_spans, semantic_result) =
                    tokio::join!(async { self.heuristic.detect(text) }, detector.detect(text, model_hint));

                match semantic_result {
                    Ok(raw) => {
                        let semantic_spans = self.accept_semantic_spans(text, raw);
                        let agreement = compare(&heuristic_spans, &semantic_spans);
                        Ok(self.finish(mode, text, heuristic_spans, semantic_spans, Some(agreement)))
                    }
                    Err(e) => self.degrade_or_fail(mode, text, Some(heuristic_spans), e),
                }
            }
        }
    }

    fn require_semantic(
        &self,
        mode: DetectionMode,
    ) -> Result<&Arc<dyn SemanticDetector>, PiiGuardError> {
        self.semantic
            .as_ref()
            .ok_or_else(|| PiiGuardError::SemanticUnavailable(mode.to_string()))
    }

    /// Clips and re-anchors semantic spans, then records their detection
    /// counters. External offsets are untrusted even when the implementation
    /// claims to have resolved them already.
    fn accept_semantic_spans(&self, text: &str, raw: Vec<Span>) -> Vec<Span> {
        let spans = sanitize_spans(text, raw);
        for span in &spans {
            self.metrics.record_detection(DetectionMethod::Semantic, span.pii_type);
        }
        spans
    }

    fn degrade_or_fail(
        &self,
        mode: DetectionMode,
        text: &str,
        heuristic_spans: Option<Vec<Span>>,
        error: crate::detectors::semantic::SemanticError,
    ) -> Result<RedactionOutcome, PiiGuardError> {
        match self.config.on_semantic_failure {
            SemanticFailurePolicy::Fail => Err(error.into()),
            SemanticFailurePolicy::DegradeToHeuristic => {
                warn!("Semantic detection failed in {} mode, degrading to heuristic: {}", mode, error);
                let heuristic_spans =
                    heuristic_spans.unwrap_or_else(|| self.heuristic.detect(text));
                // No agreement tally on the degraded path: there is no second
                // raw list to compare against.
                Ok(self.finish(mode, text, heuristic_spans, Vec::new(), None))
            }
        }
    }

    fn empty_outcome(&self, mode: DetectionMode, text: &str) -> RedactionOutcome {
        RedactionOutcome {
            mode,
            redacted_text: text.to_string(),
            spans: Vec::new(),
            chars_redacted: 0,
            stats: RedactionStats::default(),
            agreement: None,
        }
    }

    fn finish(
        &self,
        mode: DetectionMode,
        text: &str,
        heuristic_spans: Vec<Span>,
        semantic_spans: Vec<Span>,
        agreement: Option<AgreementTally>,
    ) -> RedactionOutcome {
        let stats = RedactionStats {
            heuristic_spans: heuristic_spans.len(),
            semantic_spans: semantic_spans.len(),
            merged_spans: 0,
        };

        let mut combined = heuristic_spans;
        combined.extend(semantic_spans);
        let merged = merge_spans(&combined);

        let (redacted_text, chars_redacted) =
            redact(text, &merged, &self.config.token_template);

        for span in &merged {
            self.metrics.record_redaction(span.pii_type);
            if log::log_enabled!(log::Level::Debug) {
                log::debug!(
                    "Redacted {} span [{}, {}) sample_hash={}",
                    span.pii_type,
                    span.start,
                    span.end,
                    canonical_sample_hash(span.pii_type.as_str(), &span.text)
                );
            }
        }
        self.metrics.record_chars_redacted(chars_redacted);
        self.metrics.record_spans_per_request(merged.len());
        if let Some(tally) = &agreement {
            self.metrics.record_agreement(tally);
        }

        RedactionOutcome {
            mode,
            redacted_text,
            chars_redacted,
            stats: RedactionStats { merged_spans: merged.len(), ..stats },
            spans: merged,
            agreement,
        }
    }
}
