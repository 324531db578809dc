// piiguard-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

use piiguard_core::{
    DetectionConfig, PiiType, RedactionEngine, SemanticFailurePolicy, DEFAULT_TOKEN_TEMPLATE,
};

#[test_log::test]
fn test_load_from_file() -> Result<()> {
    let yaml_content = r#"
disabled_types:
  - DATE
  - PHONE
token_template: "[PII:{type}]"
on_semantic_failure: degrade_to_heuristic
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;

    let config = DetectionConfig::load_from_file(file.path())?;
    assert_eq!(config.disabled_types, vec![PiiType::Date, PiiType::Phone]);
    assert_eq!(config.token_template, "[PII:{type}]");
    assert_eq!(config.on_semantic_failure, SemanticFailurePolicy::DegradeToHeuristic);
    Ok(())
}

#[test]
fn test_missing_fields_fall_back_to_defaults() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"disabled_types: [IBAN]\n")?;

    let config = DetectionConfig::load_from_file(file.path())?;
    assert_eq!(config.disabled_types, vec![PiiType::Iban]);
    assert_eq!(config.token_template, DEFAULT_TOKEN_TEMPLATE);
    assert_eq!(config.on_semantic_failure, SemanticFailurePolicy::Fail);
    Ok(())
}

#[test]
fn test_unknown_pii_type_is_rejected() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"disabled_types: [PASSPORT]\n")?;

    assert!(DetectionConfig::load_from_file(file.path()).is_err());
    Ok(())
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(DetectionConfig::load_from_file("/nonexistent/piiguard.yaml").is_err());
}

#[test_log::test]
fn test_configured_engine_honors_disabled_types() -> Result<()> {
    let config = DetectionConfig {
        disabled_types: vec![PiiType::Email],
        ..Default::default()
    };
    let engine = RedactionEngine::new(config)?;
    let outcome = engine.redact_heuristic("Contact me at a@b.com or 192.168.1.1");
    assert_eq!(outcome.redacted_text, "Contact me at a@b.com or [REDACTED:IPV4]");
    Ok(())
}
