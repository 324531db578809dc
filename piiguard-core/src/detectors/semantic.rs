// piiguard-core/src/detectors/semantic.rs
//! The semantic-detector capability seam.
//!
//! A semantic detector is an external collaborator (typically an LLM backend)
//! that extracts PII spans from free text. The core consumes its result
//! contract only: invocation mechanics such as retries, timeouts, and
//! authentication belong to the implementing wrapper, not here. Offsets
//! returned by a backend are untrusted and are clipped and re-anchored before
//! the rest of the pipeline ever sees them.
//!
//! License: MIT OR APACHE 2.0

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::span::{clip_span, PiiType, Span};

/// Typed failure modes of a semantic detection call.
///
/// Distinct from "no PII found", which is an `Ok` result with an empty span
/// list. Orchestrators may degrade to heuristic-only detection or fail the
/// whole operation on these; the core supports both policies.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SemanticError {
    #[error("Semantic detector timed out")]
    Timeout,

    #[error("Semantic detector returned a malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Semantic detector upstream failure: {0}")]
    Upstream(String),
}

/// An external PII detector behind a uniform capability interface.
///
/// One implementation per backend; the core never branches on which backend
/// sits behind the trait. Implementations should funnel raw provider output
/// through [`spans_from_payload`] so every backend shares the same
/// untrusted-offset handling.
#[async_trait]
pub trait SemanticDetector: Send + Sync {
    /// Extracts PII spans from `text`.
    ///
    /// Returned offsets must be 0-based, end-exclusive, into the exact `text`
    /// passed in. They are still treated as untrusted by the caller and
    /// clipped defensively.
    async fn detect(&self, text: &str, model_hint: Option<&str>)
        -> Result<Vec<Span>, SemanticError>;
}

/// A single span as produced on the wire by a semantic backend.
///
/// `text` is optional and ignored on resolution: the authoritative content is
/// always re-captured from the request text, since a model may hallucinate
/// both offsets and substrings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSpan {
    #[serde(rename = "type")]
    pub pii_type: PiiType,
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub text: Option<String>,
}

/// The wire payload shape: `{"spans": [{type, start, end, text?}, ...]}`.
#[derive(Debug, Deserialize)]
struct SpanPayload {
    #[serde(default)]
    spans: Vec<RawSpan>,
}

/// Resolves raw wire spans against the exact request text.
///
/// Negative offsets clamp to zero, offsets past the end clamp to the text
/// length, and everything snaps to `char` boundaries. Spans that collapse to
/// an empty interval are dropped.
pub fn resolve_raw_spans(text: &str, raw: Vec<RawSpan>) -> Vec<Span> {
    raw.into_iter()
        .filter_map(|r| {
            let start = usize::try_from(r.start).unwrap_or(0);
            let end = usize::try_from(r.end).unwrap_or(0);
            let (start, end) = clip_span(start, end, text);
            if start == end {
                return None;
            }
            Some(Span::new(r.pii_type, start, end, &text[start..end]))
        })
        .collect()
}

/// Decodes a backend JSON payload into resolved spans.
///
/// This is the shared funnel for all backend implementations: parse the
/// `{"spans": [...]}` document, then clip and re-anchor every span against
/// `text`. A payload that is not valid JSON for the contract yields
/// [`SemanticError::MalformedPayload`].
pub fn spans_from_payload(text: &str, payload: &str) -> Result<Vec<Span>, SemanticError> {
    let parsed: SpanPayload = serde_json::from_str(payload)
        .map_err(|e| SemanticError::MalformedPayload(e.to_string()))?;
    Ok(resolve_raw_spans(text, parsed.spans))
}
