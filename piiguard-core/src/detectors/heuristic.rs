// piiguard-core/src/detectors/heuristic.rs
//! The pattern-based heuristic PII detector.
//!
//! Scans text with the fixed, ordered capability table, applies programmatic
//! validators, and emits candidate spans. Detection is pure and deterministic:
//! the only side effect is a fire-and-forget per-type counter on the injected
//! metrics sink, which never influences the returned spans.
//!
//! License: MIT OR APACHE 2.0

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::DetectionConfig;
use crate::errors::PiiGuardError;
use crate::metrics::{DetectionMethod, MetricsSink, NoopMetrics};
use crate::patterns::{get_or_compile_patterns, CompiledPattern, CompiledPatterns};
use crate::span::{clip_span, log_span_debug, PiiType, Span};
use crate::validators;

/// Pattern-based PII detector over the shared compiled capability table.
pub struct HeuristicDetector {
    patterns: Arc<CompiledPatterns>,
    disabled_types: HashSet<PiiType>,
    metrics: Arc<dyn MetricsSink>,
}

impl HeuristicDetector {
    /// Creates a detector with the default configuration and a no-op metrics sink.
    pub fn new() -> Result<Self, PiiGuardError> {
        Self::with_config(&DetectionConfig::default())
    }

    /// Creates a detector honoring the config's disabled-type filter.
    pub fn with_config(config: &DetectionConfig) -> Result<Self, PiiGuardError> {
        Ok(Self {
            patterns: get_or_compile_patterns()?,
            disabled_types: config.disabled_types.iter().copied().collect(),
            metrics: Arc::new(NoopMetrics),
        })
    }

    /// Replaces the metrics sink. Detection output is identical regardless of
    /// the sink installed.
    pub fn set_metrics(&mut self, metrics: Arc<dyn MetricsSink>) {
        self.metrics = metrics;
    }

    fn run_programmatic_validator(&self, pattern: &CompiledPattern, candidate: &str) -> bool {
        if !pattern.programmatic_validation {
            return true;
        }
        match pattern.pii_type {
            PiiType::CreditCard => validators::is_valid_credit_card_programmatically(candidate),
            PiiType::Ipv4 => validators::is_valid_ipv4_programmatically(candidate),
            _ => true,
        }
    }

    /// Finds all PII candidates in `text`.
    ///
    /// Emission order is table order, then match order within each type; it is
    /// *not* globally sorted by position. Callers needing position order must
    /// sort (the merger does).
    pub fn detect(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();

        for pattern in &self.patterns.patterns {
            if self.disabled_types.contains(&pattern.pii_type) {
                continue;
            }
            for m in pattern.regex.find_iter(text) {
                // Regex offsets are already in range; clip anyway so the
                // invariant holds for every span the detector ever emits.
                let (start, end) = clip_span(m.start(), m.end(), text);
                let candidate = &text[start..end];

                if !self.run_programmatic_validator(pattern, candidate) {
                    continue;
                }

                let span = Span::new(pattern.pii_type, start, end, candidate);
                self.metrics.record_detection(DetectionMethod::Heuristic, pattern.pii_type);
                log_span_debug(module_path!(), &span);
                spans.push(span);
            }
        }

        spans
    }
}
