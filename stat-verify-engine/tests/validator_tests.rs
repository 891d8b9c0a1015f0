use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use stat_verify_core::{NamedSample, ShapeDescriptor, ShapeError, ValidatedInput};
use stat_verify_engine::InputValidator;

const XY: ShapeDescriptor = ShapeDescriptor::paired("X", "Y");
const SAMPLES: ShapeDescriptor = ShapeDescriptor::pair("Sample 1", "Sample 2");
const TABLE: ShapeDescriptor = ShapeDescriptor::Matrix {
    label: "Contingency Table",
};
const REGRESSION: ShapeDescriptor = ShapeDescriptor::PredictorResponse {
    predictors: "Predictors",
    response: "Response",
};

fn validate(shape: ShapeDescriptor, raw: Value) -> Result<ValidatedInput, ShapeError> {
    InputValidator::default().validate(&shape, &raw)
}

// ===== Single Sequence Tests =====

#[rstest]
#[case(json!([1.2, 1.8, 2.5]))]
#[case(json!(["1.2", "1.8", "2.5"]))]
#[case(json!("1.2, 1.8, 2.5"))]
#[case(json!("1.2,1.8,,2.5,"))]
#[case(json!("1.2\n1.8\n2.5"))]
#[case(json!([1.2, " 1.8 ", 2.5]))]
fn test_sequence_forms_are_equivalent(#[case] raw: Value) {
    let input = validate(ShapeDescriptor::SingleSequence, raw).unwrap();
    assert_eq!(input, ValidatedInput::Sequence(vec![1.2, 1.8, 2.5]));
}

#[test]
fn test_sequence_keeps_order() {
    let input = validate(ShapeDescriptor::SingleSequence, json!([3, 1, 2])).unwrap();
    assert_eq!(input.sequence(), Some(&[3.0, 1.0, 2.0][..]));
}

#[test]
fn test_sequence_parse_error_names_token() {
    let err = validate(ShapeDescriptor::SingleSequence, json!("1.2, abc, 2.5")).unwrap_err();
    assert_eq!(
        err,
        ShapeError::Parse {
            field: "data".to_string(),
            token: "abc".to_string()
        }
    );
    assert_eq!(err.code(), "parse_error");
}

#[rstest]
#[case(json!(["1.0", "NaN"]), "NaN")]
#[case(json!("1.0, inf"), "inf")]
#[case(json!([1.0, true]), "true")]
#[case(json!([1.0, null]), "null")]
#[case(json!([1.0, ""]), "")]
fn test_sequence_rejects_non_finite_and_non_numeric_tokens(#[case] raw: Value, #[case] token: &str) {
    match validate(ShapeDescriptor::SingleSequence, raw) {
        Err(ShapeError::Parse { token: found, .. }) => assert_eq!(found, token),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[rstest]
#[case(json!([]))]
#[case(json!(""))]
#[case(json!(" , ,"))]
fn test_empty_sequence_is_rejected(#[case] raw: Value) {
    let err = validate(ShapeDescriptor::SingleSequence, raw).unwrap_err();
    assert_eq!(
        err,
        ShapeError::Empty {
            field: "data".to_string()
        }
    );
}

#[test]
fn test_nested_list_in_sequence_is_a_structure_error() {
    let err = validate(ShapeDescriptor::SingleSequence, json!([1.0, [2.0]])).unwrap_err();
    assert_eq!(err.code(), "structure_error");
}

#[test]
fn test_object_is_not_a_sequence() {
    let err = validate(ShapeDescriptor::SingleSequence, json!({"a": [1]})).unwrap_err();
    assert!(matches!(err, ShapeError::Structure { .. }));
}

#[test]
fn test_custom_delimiters() {
    let validator = InputValidator::new(';', '|');
    let input = validator
        .validate(&ShapeDescriptor::SingleSequence, &json!("1;2|3"))
        .unwrap();
    assert_eq!(input, ValidatedInput::Sequence(vec![1.0, 2.0, 3.0]));

    let err = validator
        .validate(&ShapeDescriptor::SingleSequence, &json!("1,2"))
        .unwrap_err();
    assert!(matches!(err, ShapeError::Parse { .. }));
}

// ===== Named Pair Tests =====

#[test]
fn test_pair_uses_declared_labels() {
    let input = validate(SAMPLES, json!({"Sample 2": [4, 5], "Sample 1": [1, 2, 3]})).unwrap();
    assert_eq!(
        input,
        ValidatedInput::Pair(
            NamedSample::new("Sample 1", vec![1.0, 2.0, 3.0]),
            NamedSample::new("Sample 2", vec![4.0, 5.0]),
        )
    );
}

#[test]
fn test_pair_missing_label() {
    let err = validate(SAMPLES, json!({"Sample 1": [1, 2], "Sample2": [3, 4]})).unwrap_err();
    assert_eq!(
        err,
        ShapeError::MissingField {
            field: "Sample 2".to_string()
        }
    );
}

#[test]
fn test_pair_extra_label() {
    let err = validate(XY, json!({"X": [1, 2], "Y": [3, 4], "Z": [5, 6]})).unwrap_err();
    assert_eq!(
        err,
        ShapeError::UnexpectedField {
            field: "Z".to_string()
        }
    );
}

#[test]
fn test_paired_samples_need_equal_lengths() {
    let err = validate(XY, json!({"X": [1, 2, 3], "Y": [3, 4]})).unwrap_err();
    assert_eq!(
        err,
        ShapeError::LengthMismatch {
            first: "X".to_string(),
            first_len: 3,
            second: "Y".to_string(),
            second_len: 2,
        }
    );
}

#[test]
fn test_unpaired_samples_may_differ_in_length() {
    assert!(validate(SAMPLES, json!({"Sample 1": [1], "Sample 2": [3, 4]})).is_ok());
}

#[test]
fn test_pair_empty_sample() {
    let err = validate(XY, json!({"X": [], "Y": [1]})).unwrap_err();
    assert_eq!(
        err,
        ShapeError::Empty {
            field: "X".to_string()
        }
    );
}

#[test]
fn test_pair_requires_mapping() {
    let err = validate(XY, json!([[1, 2], [3, 4]])).unwrap_err();
    assert!(matches!(err, ShapeError::Structure { .. }));
}

// ===== Named Groups Tests =====

#[test]
fn test_groups_are_ordered_by_label() {
    let input = validate(
        ShapeDescriptor::groups(2),
        json!({"b": [2, 3], "a": "1, 2", "c": [5]}),
    )
    .unwrap();
    let labels: Vec<&str> = match &input {
        ValidatedInput::Groups(groups) => groups.iter().map(|g| g.label.as_str()).collect(),
        other => panic!("unexpected {:?}", other),
    };
    assert_eq!(labels, vec!["a", "b", "c"]);
    assert_eq!(input.groups().unwrap()[0], &[1.0, 2.0][..]);
}

#[rstest]
#[case(json!({}), 0)]
#[case(json!({"only": [1, 2, 3]}), 1)]
fn test_too_few_groups(#[case] raw: Value, #[case] found: usize) {
    let err = validate(ShapeDescriptor::groups(2), raw).unwrap_err();
    assert_eq!(err, ShapeError::TooFewGroups { required: 2, found });
}

#[test]
fn test_group_parse_error_names_group() {
    let err = validate(ShapeDescriptor::groups(2), json!({"a": [1], "b": ["x"]})).unwrap_err();
    assert_eq!(
        err,
        ShapeError::Parse {
            field: "b".to_string(),
            token: "x".to_string()
        }
    );
}

// ===== Matrix Tests =====

#[rstest]
#[case(json!({"Contingency Table": [[10, 20], [30, 40]]}))]
#[case(json!([[10, 20], [30, 40]]))]
#[case(json!("10, 20\n30, 40"))]
#[case(json!(["10, 20", "30, 40"]))]
#[case(json!({"Contingency Table": "10,20\n\n30,40\n"}))]
fn test_matrix_forms_are_equivalent(#[case] raw: Value) {
    let input = validate(TABLE, raw).unwrap();
    assert_eq!(
        input,
        ValidatedInput::Matrix(vec![vec![10.0, 20.0], vec![30.0, 40.0]])
    );
}

#[test]
fn test_ragged_matrix() {
    let err = validate(TABLE, json!([[1, 2, 3], [4, 5, 6], [7, 8]])).unwrap_err();
    assert_eq!(
        err,
        ShapeError::RaggedRow {
            field: "Contingency Table".to_string(),
            row: 2,
            expected: 3,
            found: 2,
        }
    );
    assert_eq!(err.code(), "ragged_row");
}

#[rstest]
#[case(json!([]))]
#[case(json!([[]]))]
#[case(json!(""))]
fn test_empty_matrix(#[case] raw: Value) {
    let err = validate(TABLE, raw).unwrap_err();
    assert!(matches!(err, ShapeError::Empty { .. }), "{:?}", err);
}

#[test]
fn test_matrix_row_must_be_a_list() {
    let err = validate(TABLE, json!([[1, 2], 3])).unwrap_err();
    assert_eq!(
        err,
        ShapeError::Structure {
            field: "Contingency Table[1]".to_string(),
            expected: "a row of numbers".to_string(),
            found: "number".to_string(),
        }
    );
}

#[test]
fn test_matrix_wrong_label() {
    let err = validate(TABLE, json!({"Table": [[1, 2]]})).unwrap_err();
    assert_eq!(
        err,
        ShapeError::MissingField {
            field: "Contingency Table".to_string()
        }
    );
}

// ===== Predictor / Response Tests =====

#[test]
fn test_predictor_response_accepted() {
    let input = validate(
        REGRESSION,
        json!({"Predictors": [[1, 2], [2, 3], [3, 4]], "Response": [2, 3, 4]}),
    )
    .unwrap();
    let (predictors, response) = input.predictor_response().unwrap();
    assert_eq!(predictors.len(), 3);
    assert_eq!(predictors[1], vec![2.0, 3.0]);
    assert_eq!(response, &[2.0, 3.0, 4.0][..]);
}

#[test]
fn test_flat_predictors_are_one_column() {
    let input = validate(REGRESSION, json!({"Predictors": [1, 2, 3], "Response": [0, 1, 1]})).unwrap();
    let (predictors, _) = input.predictor_response().unwrap();
    assert_eq!(predictors, &[vec![1.0], vec![2.0], vec![3.0]][..]);
}

#[test]
fn test_text_predictors() {
    let input = validate(
        REGRESSION,
        json!({"Predictors": "1, 2\n2, 3\n3, 4", "Response": "2, 3, 4"}),
    )
    .unwrap();
    let (predictors, response) = input.predictor_response().unwrap();
    assert_eq!(predictors[2], vec![3.0, 4.0]);
    assert_eq!(response.len(), 3);
}

#[test]
fn test_row_count_mismatch() {
    let err = validate(
        REGRESSION,
        json!({"Predictors": [[1, 2], [2, 3], [3, 4]], "Response": [2, 3]}),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ShapeError::RowCountMismatch {
            predictors: 3,
            response: 2
        }
    );
    assert_eq!(err.code(), "row_count_mismatch");
}

#[test]
fn test_ragged_predictors() {
    let err = validate(
        REGRESSION,
        json!({"Predictors": [[1, 2], [2], [3, 4]], "Response": [2, 3, 4]}),
    )
    .unwrap_err();
    assert!(matches!(err, ShapeError::RaggedRow { row: 1, .. }));
}

#[test]
fn test_missing_response() {
    let err = validate(REGRESSION, json!({"Predictors": [[1], [2]]})).unwrap_err();
    assert_eq!(
        err,
        ShapeError::MissingField {
            field: "Response".to_string()
        }
    );
}

// ===== Purity Tests =====

#[test]
fn test_validation_does_not_modify_input() {
    let raw = json!({"X": "1, 2, 3", "Y": [3, 2, 1]});
    let before = raw.clone();
    let first = InputValidator::default().validate(&XY, &raw).unwrap();
    let second = InputValidator::default().validate(&XY, &raw).unwrap();
    assert_eq!(raw, before);
    assert_eq!(first, second);
}

#[test]
fn test_error_messages_are_readable() {
    let err = validate(TABLE, json!([[1, 2], [3]])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "row 1 of 'Contingency Table' has 1 columns, expected 2"
    );
}
