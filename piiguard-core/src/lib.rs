// piiguard-core/src/lib.rs
//! # PIIGuard Core Library
//!
//! `piiguard-core` provides the fundamental, platform-independent logic for
//! detecting and redacting personally identifiable information (PII) in free
//! text. It combines a fast pattern-based detector with an optional external
//! semantic detector and reconciles their outputs into one consistent,
//! non-overlapping set of redactions.
//!
//! The library is designed to be pure and deterministic: given the same text
//! and candidate spans it always produces the same redacted output, holds no
//! shared mutable state across requests, and performs no caching beyond the
//! read-only compiled pattern table. It does not guarantee exhaustive PII
//! recall; it guarantees deterministic, bounded, auditable behavior for
//! whatever candidates its detectors produce.
//!
//! ## Modules
//!
//! * `span`: Core `Span`/`PiiType` data model, offset clipping, and PII-safe logging helpers.
//! * `patterns`: The fixed, ordered detection capability table and its compiled cache.
//! * `validators`: Programmatic false-positive filters (Luhn checksum, IPv4 range checks).
//! * `detectors`: The heuristic pattern scanner and the semantic-detector capability trait.
//! * `merge`: Canonicalization of overlapping span lists into sorted, non-overlapping form.
//! * `agreement`: Cross-detector agreement tallies (observability only).
//! * `redact`: Token-template rendering and text rewriting.
//! * `engine`: The orchestrator tying detection, merging, and redaction together.
//! * `metrics`: Fire-and-forget telemetry sink trait with a Prometheus implementation.
//! * `config`: YAML-loadable engine configuration.
//! * `errors`: The library's structured error type.
//!
//! ## Usage Example
//!
//! ```rust
//! use piiguard_core::{DetectionConfig, RedactionEngine};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     // 1. Build an engine from the default configuration.
//!     let engine = RedactionEngine::new(DetectionConfig::default())?;
//!
//!     // 2. Redact using the heuristic detector only. This path is
//!     //    synchronous and never fails.
//!     let outcome = engine.redact_heuristic("Contact me at a@b.com or 192.168.1.1");
//!
//!     assert_eq!(
//!         outcome.redacted_text,
//!         "Contact me at [REDACTED:EMAIL] or [REDACTED:IPV4]"
//!     );
//!     assert_eq!(outcome.chars_redacted, 18);
//!     Ok(())
//! }
//! ```
//!
//! Hybrid mode additionally needs a [`SemanticDetector`] implementation
//! installed via [`RedactionEngine::with_semantic`]; the heuristic scan and
//! the semantic call then run concurrently and their raw span lists are
//! merged before redaction, with an [`AgreementTally`] emitted as telemetry.
//!
//! ## Error Handling
//!
//! The heuristic path is infallible. Semantic detection failures surface as
//! typed [`SemanticError`] values, distinct from "no PII found", and the
//! engine either fails the request or degrades to heuristic-only detection
//! per the configured [`SemanticFailurePolicy`]. Out-of-range offsets from
//! any detector are clipped, never thrown.
//!
//! ## Design Principles
//!
//! * **Pluggable detectors:** The `SemanticDetector` trait decouples the core
//!   from any particular backend; the core never branches on backend identity.
//! * **Immutable spans:** Detectors and the merger emit fresh values rather
//!   than aliasing or mutating inputs.
//! * **Telemetry never steers:** Metrics and agreement tallies are side
//!   channels; output is identical with the no-op sink installed.
//!
//! ---
//! License: MIT OR Apache-2.0

// All modules must be declared before they can be used.
pub mod agreement;
pub mod config;
pub mod detectors;
pub mod engine;
pub mod errors;
pub mod merge;
pub mod metrics;
pub mod patterns;
pub mod redact;
pub mod span;
pub mod validators;

/// Re-exports the core span data model.
pub use span::{
    canonical_sample_hash, clip_span, redact_sensitive, sanitize_spans, spans_overlap, PiiType,
    Span,
};

/// Re-exports the public configuration types.
pub use config::{DetectionConfig, SemanticFailurePolicy, DEFAULT_TOKEN_TEMPLATE};

/// Re-exports the custom error type for clear error reporting.
pub use errors::PiiGuardError;

/// Re-exports the orchestrating engine and its result types.
pub use engine::{DetectionMode, RedactionEngine, RedactionOutcome, RedactionStats};

/// Re-exports the detector implementations and the semantic capability seam.
pub use detectors::heuristic::HeuristicDetector;
pub use detectors::semantic::{
    resolve_raw_spans, spans_from_payload, RawSpan, SemanticDetector, SemanticError,
};

/// Re-exports the pure span-list primitives.
pub use agreement::{compare, AgreementTally};
pub use merge::merge_spans;
pub use redact::{format_token, redact};

/// Re-exports the telemetry seam.
pub use metrics::{gather_metrics, DetectionMethod, MetricsSink, NoopMetrics, PiiMetrics};

/// Re-exports the compiled pattern table types for advanced usage.
pub use patterns::{
    compile_patterns, get_or_compile_patterns, CompiledPattern, CompiledPatterns, PatternRule,
    MAX_PATTERN_LENGTH, PATTERN_TABLE,
};
