use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use stat_verify_core::*;
use std::path::PathBuf;

// ===== VerificationSettings Tests =====

#[test]
fn test_settings_default() {
    let settings = VerificationSettings::default();

    assert_eq!(settings.absolute_tolerance, 1e-6);
    assert_eq!(settings.token_delimiter, ',');
    assert_eq!(settings.row_delimiter, '\n');
    assert_eq!(settings.max_concurrency, 4);
    assert_eq!(settings.fixtures_path, None);
    assert!(settings.clone().validated().is_ok());
}

#[test]
fn test_settings_partial_deserialization_uses_defaults() {
    let settings: VerificationSettings = serde_json::from_value(json!({
        "absolute_tolerance": 0.0001,
        "fixtures_path": "fixtures/custom.json"
    }))
    .unwrap();

    assert_eq!(settings.absolute_tolerance, 0.0001);
    assert_eq!(settings.token_delimiter, ',');
    assert_eq!(settings.max_concurrency, 4);
    assert_eq!(
        settings.fixtures_path,
        Some(PathBuf::from("fixtures/custom.json"))
    );
}

#[test]
fn test_settings_tolerance() {
    let settings = VerificationSettings {
        absolute_tolerance: 1e-4,
        ..VerificationSettings::default()
    };
    assert_eq!(settings.tolerance().unwrap().value(), 1e-4);
}

#[rstest]
#[case(-0.1)]
#[case(1.5)]
fn test_settings_tolerance_out_of_range(#[case] tolerance: f64) {
    let settings = VerificationSettings {
        absolute_tolerance: tolerance,
        ..VerificationSettings::default()
    };
    assert!(matches!(
        settings.validated(),
        Err(CoreError::Validation(_))
    ));
}

#[rstest]
#[case(0)]
#[case(257)]
fn test_settings_concurrency_out_of_range(#[case] max_concurrency: usize) {
    let settings = VerificationSettings {
        max_concurrency,
        ..VerificationSettings::default()
    };
    assert!(settings.validated().is_err());
}

#[rstest]
#[case('1')]
#[case('e')]
#[case('.')]
#[case('-')]
#[case('+')]
fn test_delimiter_inside_number_is_rejected(#[case] delimiter: char) {
    let settings = VerificationSettings {
        token_delimiter: delimiter,
        ..VerificationSettings::default()
    };
    match settings.validated() {
        Err(CoreError::Configuration(message)) => {
            assert!(message.starts_with("token_delimiter"), "{}", message)
        }
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_delimiters_must_differ() {
    let settings = VerificationSettings {
        token_delimiter: ';',
        row_delimiter: ';',
        ..VerificationSettings::default()
    };
    assert_eq!(
        settings.validated().unwrap_err().to_string(),
        "Configuration error: token_delimiter and row_delimiter must differ"
    );
}

#[rstest]
#[case(';', '|')]
#[case('\t', '\n')]
#[case(' ', ';')]
fn test_custom_delimiters_accepted(#[case] token: char, #[case] row: char) {
    let settings = VerificationSettings {
        token_delimiter: token,
        row_delimiter: row,
        ..VerificationSettings::default()
    };
    assert!(settings.validated().is_ok());
}
