// piiguard-core/src/metrics.rs
//! Fire-and-forget metrics for the detection/redaction pipeline.
//!
//! Metrics are a collaborator, not a dependency: every sink call is
//! non-blocking with respect to correctness, and the engine behaves
//! identically with the no-op sink installed. The Prometheus-backed sink
//! exposes the pipeline's counters and histograms for scraping by the
//! surrounding service.
//!
//! License: MIT OR APACHE 2.0

use prometheus::{
    Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

use crate::agreement::AgreementTally;
use crate::span::PiiType;

/// Which detector produced a detection event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    Heuristic,
    Semantic,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::Heuristic => "heuristic",
            DetectionMethod::Semantic => "semantic",
        }
    }
}

/// A sink for pipeline telemetry.
///
/// All methods default to no-ops so implementations only override what they
/// record. Implementations must never fail or block: a missing or broken sink
/// leaves detection, merge, and redaction output unchanged.
pub trait MetricsSink: Send + Sync {
    /// A detector accepted a candidate span.
    fn record_detection(&self, _method: DetectionMethod, _pii_type: PiiType) {}

    /// A merged span was redacted from the output.
    fn record_redaction(&self, _pii_type: PiiType) {}

    /// Total original characters removed for one request.
    fn record_chars_redacted(&self, _count: usize) {}

    /// Number of merged spans produced for one request.
    fn record_spans_per_request(&self, _count: usize) {}

    /// Agreement tally between the two raw detector passes.
    fn record_agreement(&self, _tally: &AgreementTally) {}
}

/// The default sink: records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {}

/// Global metrics registry.
static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Global pipeline metrics instance.
static METRICS: OnceLock<PiiMetrics> = OnceLock::new();

/// Get or create the global registry.
fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Prometheus metrics for the PII pipeline.
#[derive(Debug, Clone)]
pub struct PiiMetrics {
    detections_total: CounterVec,
    redactions_total: CounterVec,
    chars_redacted_total: Counter,
    spans_per_request: Histogram,
    agreement_total: CounterVec,
}

impl PiiMetrics {
    /// Get the global metrics instance, initializing if needed.
    ///
    /// # Panics
    ///
    /// Panics if metric registration fails (should only happen on first call).
    pub fn global() -> &'static Self {
        METRICS.get_or_init(|| Self::new(registry()).expect("Failed to register metrics"))
    }

    /// Create new metrics registered with the given registry.
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let detections_total = CounterVec::new(
            Opts::new("pii_detections_total", "PII entities detected"),
            &["method", "type"],
        )?;
        registry.register(Box::new(detections_total.clone()))?;

        let redactions_total = CounterVec::new(
            Opts::new("pii_redactions_total", "PII redactions applied"),
            &["type"],
        )?;
        registry.register(Box::new(redactions_total.clone()))?;

        let chars_redacted_total = Counter::with_opts(Opts::new(
            "pii_chars_redacted_total",
            "Characters redacted from request text",
        ))?;
        registry.register(Box::new(chars_redacted_total.clone()))?;

        let spans_per_request = Histogram::with_opts(
            HistogramOpts::new("pii_spans_per_request", "PII spans per request").buckets(vec![
                0.0, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0, 34.0, 55.0,
            ]),
        )?;
        registry.register(Box::new(spans_per_request.clone()))?;

        let agreement_total = CounterVec::new(
            Opts::new(
                "pii_method_agreement_total",
                "Agreement between heuristic and semantic detectors",
            ),
            &["agreement"],
        )?;
        registry.register(Box::new(agreement_total.clone()))?;

        Ok(Self {
            detections_total,
            redactions_total,
            chars_redacted_total,
            spans_per_request,
            agreement_total,
        })
    }
}

impl MetricsSink for PiiMetrics {
    fn record_detection(&self, method: DetectionMethod, pii_type: PiiType) {
        self.detections_total
            .with_label_values(&[method.as_str(), pii_type.as_str()])
            .inc();
    }

    fn record_redaction(&self, pii_type: PiiType) {
        self.redactions_total
            .with_label_values(&[pii_type.as_str()])
            .inc();
    }

    fn record_chars_redacted(&self, count: usize) {
        self.chars_redacted_total.inc_by(count as f64);
    }

    fn record_spans_per_request(&self, count: usize) {
        self.spans_per_request.observe(count as f64);
    }

    fn record_agreement(&self, tally: &AgreementTally) {
        if tally.agree > 0 {
            self.agreement_total
                .with_label_values(&["agree"])
                .inc_by(tally.agree as f64);
        }
        if tally.heuristic_only > 0 {
            self.agreement_total
                .with_label_values(&["heuristic_only"])
                .inc_by(tally.heuristic_only as f64);
        }
        if tally.semantic_only > 0 {
            self.agreement_total
                .with_label_values(&["semantic_only"])
                .inc_by(tally.semantic_only as f64);
        }
    }
}

/// Gathers the global registry's metrics in the Prometheus text format.
pub fn gather_metrics() -> String {
    let metric_families = registry().gather();
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prometheus_sink_records() {
        let registry = Registry::new();
        let metrics = PiiMetrics::new(&registry).unwrap();

        metrics.record_detection(DetectionMethod::Heuristic, PiiType::Email);
        metrics.record_detection(DetectionMethod::Heuristic, PiiType::Email);
        metrics.record_redaction(PiiType::Email);
        metrics.record_chars_redacted(7);
        metrics.record_spans_per_request(2);

        let count = metrics
            .detections_total
            .with_label_values(&["heuristic", "EMAIL"])
            .get();
        assert_eq!(count as u64, 2);
        assert_eq!(metrics.chars_redacted_total.get() as u64, 7);
    }

    #[test]
    fn test_agreement_labels() {
        let registry = Registry::new();
        let metrics = PiiMetrics::new(&registry).unwrap();
        let tally = AgreementTally { agree: 3, heuristic_only: 1, semantic_only: 0 };
        metrics.record_agreement(&tally);

        assert_eq!(metrics.agreement_total.with_label_values(&["agree"]).get() as u64, 3);
        assert_eq!(
            metrics.agreement_total.with_label_values(&["heuristic_only"]).get() as u64,
            1
        );
        // Zero tallies are not emitted at all.
        assert_eq!(
            metrics.agreement_total.with_label_values(&["semantic_only"]).get() as u64,
            0
        );
    }

    #[test]
    fn test_noop_sink_is_inert() {
        let sink = NoopMetrics;
        sink.record_detection(DetectionMethod::Semantic, PiiType::Ssn);
        sink.record_spans_per_request(100);
    }
}
