// piiguard-core/src/patterns.rs
//! The fixed detection pattern table and its compiled form.
//!
//! This module owns the ordered capability table `(type, pattern, validator?)`
//! that drives heuristic detection, and provides a thread-safe, cached
//! mechanism to compile it into `CompiledPatterns` shared across all
//! detectors. Table order is load-bearing: it fixes the emission order of
//! detected spans, which in turn fixes merge tie-breaks for equal-length
//! overlapping candidates.
//!
//! License: MIT OR APACHE 2.0

use std::sync::Arc;

use log::debug;
use once_cell::sync::OnceCell;
use regex::{Regex, RegexBuilder};

use crate::errors::PiiGuardError;
use crate::span::PiiType;

/// Maximum allowed length for a pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// A single entry of the detection capability table.
#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    /// The PII type this pattern detects.
    pub pii_type: PiiType,
    /// The regex source for this type's conservative pattern.
    pub pattern: &'static str,
    /// Whether candidates require programmatic validation before acceptance.
    pub programmatic_validation: bool,
}

/// The ordered capability table. Conservative regexes to limit false
/// positives; credit cards and IPv4 candidates are additionally validated
/// programmatically.
pub const PATTERN_TABLE: &[PatternRule] = &[
    PatternRule {
        pii_type: PiiType::Email,
        pattern: r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
        programmatic_validation: false,
    },
    PatternRule {
        pii_type: PiiType::Ssn,
        pattern: r"\b\d{3}-?\d{2}-?\d{4}\b",
        programmatic_validation: false,
    },
    PatternRule {
        pii_type: PiiType::Ipv4,
        pattern: r"\b(?:\d{1,3}\.){3}\d{1,3}\b",
        programmatic_validation: true,
    },
    PatternRule {
        pii_type: PiiType::Ipv6,
        pattern: r"\b(?:[A-Fa-f0-9]{1,4}:){2,7}[A-Fa-f0-9]{1,4}\b",
        programmatic_validation: false,
    },
    PatternRule {
        pii_type: PiiType::Iban,
        pattern: r"\b[A-Z]{2}\d{2}[A-Z0-9]{11,30}\b",
        programmatic_validation: false,
    },
    PatternRule {
        pii_type: PiiType::Date,
        pattern: r"\b(0?[1-9]|1[0-2])[/-](0?[1-9]|[12]\d|3[01])[/-](19|20)\d{2}\b",
        programmatic_validation: false,
    },
    // US-like phone; avoids short digit runs.
    PatternRule {
        pii_type: PiiType::Phone,
        pattern: r"(?:\+?1[ .-]?)?(?:\(?\d{3}\)?[ .-]?){1}\d{3}[ .-]?\d{4}\b",
        programmatic_validation: false,
    },
    // 13-19 digits with optional separators, Luhn-checked by the validator.
    PatternRule {
        pii_type: PiiType::CreditCard,
        pattern: r"\b(?:\d[ -]*?){13,19}\b",
        programmatic_validation: true,
    },
];

/// A single compiled detection pattern, ready for efficient matching.
#[derive(Debug)]
pub struct CompiledPattern {
    /// The PII type this pattern detects.
    pub pii_type: PiiType,
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    /// Whether matches require programmatic validation before acceptance.
    pub programmatic_validation: bool,
}

/// The full compiled capability table, in table order.
#[derive(Debug)]
pub struct CompiledPatterns {
    pub patterns: Vec<CompiledPattern>,
}

/// A process-wide cache for the compiled table. The table is fixed, so a
/// single slot suffices.
static COMPILED_PATTERNS: OnceCell<Arc<CompiledPatterns>> = OnceCell::new();

/// Compiles the capability table into `CompiledPatterns`.
///
/// This is the low-level function that performs the actual regex compilation;
/// most callers want [`get_or_compile_patterns`] instead.
pub fn compile_patterns() -> Result<CompiledPatterns, PiiGuardError> {
    debug!("Starting compilation of {} detection patterns.", PATTERN_TABLE.len());

    let mut patterns = Vec::with_capacity(PATTERN_TABLE.len());
    for rule in PATTERN_TABLE {
        if rule.pattern.len() > MAX_PATTERN_LENGTH {
            return Err(PiiGuardError::PatternLengthExceeded(
                rule.pii_type.as_str().to_string(),
                rule.pattern.len(),
                MAX_PATTERN_LENGTH,
            ));
        }

        let regex = RegexBuilder::new(rule.pattern)
            .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
            .build()
            .map_err(|e| {
                PiiGuardError::PatternCompilation(rule.pii_type.as_str().to_string(), e)
            })?;

        debug!("Pattern for '{}' compiled successfully.", rule.pii_type);
        patterns.push(CompiledPattern {
            pii_type: rule.pii_type,
            regex,
            programmatic_validation: rule.programmatic_validation,
        });
    }

    debug!("Finished compiling patterns. Total compiled: {}.", patterns.len());
    Ok(CompiledPatterns { patterns })
}

/// Gets the shared `CompiledPatterns` instance, compiling on first use.
///
/// Returns an `Arc` so detectors can share the compiled table cheaply across
/// threads without recompilation.
pub fn get_or_compile_patterns() -> Result<Arc<CompiledPatterns>, PiiGuardError> {
    COMPILED_PATTERNS
        .get_or_try_init(|| compile_patterns().map(Arc::new))
        .map(Arc::clone)
}
