use pretty_assertions::assert_eq;
use serde_json::json;
use stat_verify_core::{
    fields, ComputedResult, CoreError, MismatchKind, VerificationSettings,
};
use stat_verify_engine::{
    names, verify_fixture, Fixture, FixtureTable, TestEngine, VerificationReport,
    VerificationStatus, STANDARD_CATALOG,
};
use std::io::Write;

fn fixture(data: serde_json::Value, expected: serde_json::Value) -> Fixture {
    Fixture {
        data,
        expected_result: serde_json::from_value(expected).unwrap(),
    }
}

// ===== Fixture Table Tests =====

#[test]
fn test_embedded_fixtures_load() {
    let table = FixtureTable::embedded().unwrap();
    assert_eq!(table.len(), 21);
    assert!(table.get(names::SHAPIRO_WILK).is_some());
    assert!(table.get(names::TWO_WAY_ANOVA).is_none());
}

#[test]
fn test_every_implemented_test_has_a_fixture() {
    let table = FixtureTable::embedded().unwrap();
    for entry in STANDARD_CATALOG.iter().filter(|e| e.provider.is_some()) {
        assert!(table.get(entry.identifier).is_some(), "no fixture for {}", entry.identifier);
    }
}

#[test]
fn test_fixture_identifiers_are_sorted() {
    let table = FixtureTable::embedded().unwrap();
    let ids: Vec<String> = table.identifiers().map(|id| id.to_string()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[test]
fn test_embedded_fixture_contents() {
    let table = FixtureTable::embedded().unwrap();
    let adf = table.get(names::ADF).unwrap();
    assert_eq!(adf.data, json!([1.2, 1.5, 1.8, 2.0, 2.5]));
    let critical = adf
        .expected_result
        .get(fields::CRITICAL_VALUES)
        .and_then(|v| v.as_mapping())
        .unwrap();
    assert_eq!(critical.len(), 3);
    assert_eq!(critical["5%"].as_number(), Some(-4.474365));
}

#[test]
fn test_logistic_fixture_is_the_converged_solution() {
    let engine = TestEngine::standard();
    let table = FixtureTable::embedded().unwrap();
    let current = table.get(names::LOGISTIC_REGRESSION).unwrap();
    assert!(verify_fixture(&engine, names::LOGISTIC_REGRESSION, current).passed());

    let superseded = fixture(
        current.data.clone(),
        json!({"coefficients": [[0.701610]], "intercept": [-0.655680]}),
    );
    let report = verify_fixture(&engine, names::LOGISTIC_REGRESSION, &superseded);
    assert_eq!(report.status_label(), "failed");
}

#[test]
fn test_subset() {
    let table = FixtureTable::embedded().unwrap();
    let subset = table.subset(&[names::PEARSON, names::KENDALL]).unwrap();
    assert_eq!(subset.len(), 2);
    assert!(subset.get(names::PEARSON).is_some());
}

#[test]
fn test_subset_unknown_identifier() {
    let table = FixtureTable::embedded().unwrap();
    let err = table.subset(&["Nonexistent Test"]).unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
    assert_eq!(err.to_string(), "Not found: no fixture for 'Nonexistent Test'");
}

#[test]
fn test_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"Pearson Correlation": {{"data": {{"X": [1, 2, 3], "Y": [2, 4, 6]}},
            "expected_result": {{"correlation_coefficient": 1.0}}}}}}"#
    )
    .unwrap();

    let table = FixtureTable::from_path(file.path()).unwrap();
    assert_eq!(table.len(), 1);
}

#[test]
fn test_load_prefers_configured_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{}}").unwrap();

    let settings = VerificationSettings {
        fixtures_path: Some(file.path().to_path_buf()),
        ..VerificationSettings::default()
    };
    assert!(FixtureTable::load(&settings).unwrap().is_empty());
    assert_eq!(
        FixtureTable::load(&VerificationSettings::default()).unwrap().len(),
        21
    );
}

#[test]
fn test_from_path_missing_file() {
    let err = FixtureTable::from_path("/nonexistent/fixtures.json").unwrap_err();
    assert!(matches!(err, CoreError::Io(_)));
}

#[test]
fn test_malformed_fixture_json() {
    let err = FixtureTable::from_json_str(r#"{"Pearson Correlation": {"data": [1]}}"#).unwrap_err();
    assert!(matches!(err, CoreError::Serialization(_)));
}

#[test]
fn test_fixture_table_round_trips_through_json() {
    let table = FixtureTable::embedded().unwrap();
    let json = serde_json::to_string(&table).unwrap();
    assert_eq!(FixtureTable::from_json_str(&json).unwrap(), table);
}

// ===== Verification Tests =====

#[test]
fn test_every_embedded_fixture_passes() {
    let engine = TestEngine::standard();
    let table = FixtureTable::embedded().unwrap();

    let failures: Vec<VerificationReport> = table
        .iter()
        .map(|(id, fixture)| verify_fixture(&engine, id.as_str(), fixture))
        .filter(|report| !report.passed())
        .collect();
    assert!(failures.is_empty(), "{:#?}", failures);
}

#[test]
fn test_failed_verification_lists_mismatches() {
    let engine = TestEngine::standard();
    let fixture = fixture(
        json!({"Contingency Table": [[10, 20], [30, 40]]}),
        json!({"statistic": 0.5, "p_value": 0.504036, "expected_frequencies": [1.0]}),
    );

    let report = verify_fixture(&engine, names::CHI_SQUARED, &fixture);
    assert!(!report.passed());
    assert_eq!(report.status_label(), "failed");
    match &report.status {
        VerificationStatus::Failed { mismatches } => {
            let summary: Vec<(&str, MismatchKind)> =
                mismatches.iter().map(|m| (m.path.as_str(), m.kind)).collect();
            assert_eq!(
                summary,
                vec![
                    ("expected_frequencies", MismatchKind::Missing),
                    ("statistic", MismatchKind::OutOfTolerance),
                ]
            );
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(report.computed.is_some());
}

#[test]
fn test_execution_error_is_reported_as_errored() {
    let engine = TestEngine::standard();
    let fixture = fixture(json!({"Predictors": [[1], [2]], "Response": [1]}), json!({}));

    let report = verify_fixture(&engine, names::LINEAR_REGRESSION, &fixture);
    assert_eq!(
        report.status,
        VerificationStatus::Errored {
            code: "row_count_mismatch".to_string(),
            message: "invalid input for 'Linear Regression': predictors have 2 rows but the response has 1 values".to_string(),
        }
    );
    assert!(report.computed.is_none());
}

#[test]
fn test_unimplemented_fixture_is_errored() {
    let engine = TestEngine::standard();
    let fixture = fixture(json!({"a": [1], "b": [2]}), json!({}));
    let report = verify_fixture(&engine, names::TWO_WAY_ANOVA, &fixture);
    assert_eq!(report.status_label(), "errored");
}

#[test]
fn test_report_serialization() {
    let report = VerificationReport {
        test: names::PEARSON.into(),
        status: VerificationStatus::Passed,
        computed: Some(ComputedResult::new().with_field(fields::P_VALUE, 0.0)),
    };
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({"test": "Pearson Correlation", "status": "passed", "computed": {"p_value": 0.0}})
    );

    let errored = VerificationReport::errored(names::KPSS, "computation_error", "boom");
    assert_eq!(
        serde_json::to_value(&errored).unwrap(),
        json!({
            "test": names::KPSS,
            "status": "errored",
            "code": "computation_error",
            "message": "boom"
        })
    );
}
