// piiguard-core/src/span.rs
//! Core data structures for PII spans and utilities for handling
//! sensitive matched content within the `piiguard-core` library.
//!
//! License: MIT OR APACHE 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

use lazy_static::lazy_static;
use sha2::{Digest, Sha256};

lazy_static! {
    /// A static boolean that is initialized once to determine if PII is allowed in debug logs.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("PIIGUARD_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// The closed set of PII categories the engine can detect.
///
/// Wire names are SCREAMING_SNAKE_CASE to match the semantic detector
/// contract (`"CREDIT_CARD"`, `"IPV4"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PiiType {
    Email,
    Phone,
    Ssn,
    CreditCard,
    Ipv4,
    Ipv6,
    Iban,
    Date,
}

impl PiiType {
    /// Returns the canonical wire/display name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            PiiType::Email => "EMAIL",
            PiiType::Phone => "PHONE",
            PiiType::Ssn => "SSN",
            PiiType::CreditCard => "CREDIT_CARD",
            PiiType::Ipv4 => "IPV4",
            PiiType::Ipv6 => "IPV6",
            PiiType::Iban => "IBAN",
            PiiType::Date => "DATE",
        }
    }
}

impl fmt::Display for PiiType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single PII candidate: a typed, half-open `[start, end)` interval over the
/// original text plus the substring captured at detection time.
///
/// Offsets are byte offsets into the UTF-8 input and always fall on `char`
/// boundaries. Spans are read-only values once emitted; the merger constructs
/// new spans rather than mutating its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "type")]
    pub pii_type: PiiType,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Span {
    pub fn new(pii_type: PiiType, start: usize, end: usize, text: impl Into<String>) -> Self {
        Self { pii_type, start, end, text: text.into() }
    }

    /// Length of the covered interval in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Snaps `idx` down to the nearest `char` boundary of `text`.
fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    if idx >= text.len() {
        return text.len();
    }
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Clips a `(start, end)` offset pair into `[0, text.len()]` and onto `char`
/// boundaries, so that slicing `&text[start..end]` cannot panic.
///
/// Offsets sourced from an external detector are untrusted and may point past
/// the end of the text or into the middle of a multi-byte character. A pair
/// that inverts after clipping collapses to an empty interval at `start`.
pub fn clip_span(start: usize, end: usize, text: &str) -> (usize, usize) {
    let s = floor_char_boundary(text, start.min(text.len()));
    let e = floor_char_boundary(text, end.min(text.len()));
    (s, e.max(s))
}

/// Half-open interval overlap between two spans.
pub fn spans_overlap(a: &Span, b: &Span) -> bool {
    !(a.end <= b.start || b.end <= a.start)
}

/// Re-anchors externally produced spans against the exact request text.
///
/// Each span's offsets are clipped and boundary-snapped, and its `text` is
/// re-captured from the input so that downstream consumers never see a
/// hallucinated substring. Spans that collapse to nothing are dropped.
pub fn sanitize_spans(text: &str, spans: Vec<Span>) -> Vec<Span> {
    spans
        .into_iter()
        .filter_map(|sp| {
            let (start, end) = clip_span(sp.start, sp.end, text);
            if start == end {
                return None;
            }
            Some(Span::new(sp.pii_type, start, end, &text[start..end]))
        })
        .collect()
}

/// Produces a loggable stand-in for sensitive matched content.
pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

/// Emits a debug log line for a detected span without leaking PII by default.
pub fn log_span_debug(module_path: &str, span: &Span) {
    log::debug!(
        "{} Detected span: Type='{}', [{}, {}), Content='{}'",
        module_path,
        span.pii_type,
        span.start,
        span.end,
        get_loggable_content(&span.text)
    );
}

/// Stable hash of a matched snippet, usable in logs and telemetry in place of
/// the raw content.
pub fn canonical_sample_hash(type_name: &str, snippet: &str) -> String {
    let normalized = snippet
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut hasher = Sha256::new();
    hasher.update(type_name.as_bytes());
    hasher.update(b":");
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}
