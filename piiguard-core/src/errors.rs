// piiguard-core/src/errors.rs
//! Custom error types for the piiguard-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//! Note that validator failures and out-of-range offsets are *not* errors:
//! candidates failing validation are silently dropped and bad offsets are
//! clipped upstream.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

use crate::detectors::semantic::SemanticError;

/// This enum represents all possible error types in the `piiguard-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions. This prevents them from
/// matching all variants exhaustively, thus avoiding breaking changes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PiiGuardError {
    #[error("Failed to compile detection pattern for '{0}': {1}")]
    PatternCompilation(String, regex::Error),

    #[error("Pattern for '{0}': length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Semantic detection failed: {0}")]
    Semantic(#[from] SemanticError),

    #[error("Detection mode '{0}' requires a semantic detector, but none is configured")]
    SemanticUnavailable(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
