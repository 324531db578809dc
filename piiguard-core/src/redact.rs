// piiguard-core/src/redact.rs
//! Rewrites text by substituting merged spans with type-tagged tokens.
//!
//! The redactor expects spans that have already passed through the merger;
//! because merging is idempotent it re-merges defensively rather than
//! trusting the caller. Token rendering goes through `tinytemplate` with a
//! literal fallback, so redaction itself can never fail.
//!
//! License: MIT OR APACHE 2.0

use tinytemplate::{format_unescaped, TinyTemplate};

use crate::merge::merge_spans;
use crate::span::{PiiType, Span};

/// Renders the redaction token for `pii_type` from `token_template`.
///
/// The template carries a single `{type}` placeholder. A template without the
/// placeholder renders as its literal text (no type information, by
/// contract), and a template that fails to parse or render also falls back to
/// the literal template text rather than failing.
pub fn format_token(token_template: &str, pii_type: PiiType) -> String {
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&format_unescaped);
    if tt.add_template("token", token_template).is_err() {
        return token_template.to_string();
    }
    let ctx = serde_json::json!({ "type": pii_type.as_str() });
    tt.render("token", &ctx)
        .unwrap_or_else(|_| token_template.to_string())
}

/// Replaces each span of `text` with a type-tagged token.
///
/// Returns the redacted text and the total number of original characters
/// removed (the sum of merged span lengths — token lengths do not count).
/// `redact(text, &[], _)` returns `(text, 0)` for any text.
///
/// Note that the operation is not idempotent on its own output: emitted
/// tokens are plain text and are not protected from re-matching.
pub fn redact(text: &str, spans: &[Span], token_template: &str) -> (String, usize) {
    if spans.is_empty() {
        return (text.to_string(), 0);
    }
    let merged = merge_spans(spans);

    let mut out = String::with_capacity(text.len());
    let mut last = 0usize;
    let mut chars_redacted = 0usize;
    for sp in &merged {
        out.push_str(&text[last..sp.start]);
        out.push_str(&format_token(token_template, sp.pii_type));
        chars_redacted += sp.end - sp.start;
        last = sp.end;
    }
    out.push_str(&text[last..]);

    (out, chars_redacted)
}
