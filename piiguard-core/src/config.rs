// piiguard-core/src/config.rs
//! Configuration management for `piiguard-core`.
//!
//! The detection pattern table itself is fixed (see [`crate::patterns`]);
//! configuration covers the knobs around it: which PII types are active, the
//! redaction token template, and how a semantic-detector failure is handled.
//! Configs deserialize from YAML and fall back to sensible defaults.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::span::PiiType;

/// The default redaction token template. The `{type}` placeholder is
/// substituted with the detected PII type name.
pub const DEFAULT_TOKEN_TEMPLATE: &str = "[REDACTED:{type}]";

/// Policy applied when the semantic detector fails during a semantic or
/// hybrid request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticFailurePolicy {
    /// Fail the whole operation with a typed error.
    #[default]
    Fail,
    /// Log the failure and degrade to heuristic-only detection.
    DegradeToHeuristic,
}

/// Top-level configuration for the detection/redaction engine.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// PII types to skip during heuristic detection. Disabling a type does
    /// not disturb the emission order of the remaining table entries.
    pub disabled_types: Vec<PiiType>,
    /// Token template with a single `{type}` placeholder.
    pub token_template: String,
    /// What to do when the semantic detector fails.
    pub on_semantic_failure: SemanticFailurePolicy,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            disabled_types: Vec::new(),
            token_template: DEFAULT_TOKEN_TEMPLATE.to_string(),
            on_semantic_failure: SemanticFailurePolicy::default(),
        }
    }
}

impl DetectionConfig {
    /// Loads a detection config from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading detection config from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: DetectionConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate();
        Ok(config)
    }

    /// Sanity-checks the config, logging warnings for suspicious but legal
    /// settings. A template without the `{type}` placeholder is allowed (it
    /// is emitted literally, dropping type information from the output).
    pub fn validate(&self) {
        if !self.token_template.contains("{type}") {
            warn!(
                "Token template '{}' has no {{type}} placeholder; redaction tokens will carry no type information.",
                self.token_template
            );
        }
        if self.disabled_types.len() >= crate::patterns::PATTERN_TABLE.len() {
            warn!("All detection types are disabled; heuristic detection will find nothing.");
        }
    }

    /// Returns true when heuristic detection should scan for `pii_type`.
    pub fn is_enabled(&self, pii_type: PiiType) -> bool {
        !self.disabled_types.contains(&pii_type)
    }
}
