use stat_verify_core::{
    AbsoluteTolerance, ComparisonOutcome, ComputedResult, ExpectedResult, FieldMismatch,
    MismatchKind, ResultValue,
};

/// Structural, tolerance-aware comparison of a computed result against a reference.
///
/// Only fields present in `expected` are checked; extra fields in `actual` are
/// ignored. Numbers match within `tolerance`, sequences index by index, mappings
/// key by key, text exactly. Mismatches are reported in field-path order.
pub fn compare(
    expected: &ExpectedResult,
    actual: &ComputedResult,
    tolerance: AbsoluteTolerance,
) -> ComparisonOutcome {
    let mut mismatches = Vec::new();
    for (name, expected_value) in expected.fields() {
        match actual.get(name) {
            Some(actual_value) => walk(name, expected_value, actual_value, tolerance, &mut mismatches),
            None => mismatches.push(missing(name.to_string(), expected_value)),
        }
    }
    ComparisonOutcome::from_mismatches(mismatches)
}

/// Compare two standalone values; `path` prefixes every reported mismatch
pub fn compare_values(
    path: &str,
    expected: &ResultValue,
    actual: &ResultValue,
    tolerance: AbsoluteTolerance,
) -> Vec<FieldMismatch> {
    let mut mismatches = Vec::new();
    walk(path, expected, actual, tolerance, &mut mismatches);
    mismatches
}

fn walk(
    path: &str,
    expected: &ResultValue,
    actual: &ResultValue,
    tolerance: AbsoluteTolerance,
    out: &mut Vec<FieldMismatch>,
) {
    match (expected, actual) {
        (ResultValue::Number(e), ResultValue::Number(a)) => {
            if !tolerance.accepts(*e, *a) {
                out.push(mismatch(path, MismatchKind::OutOfTolerance, expected, actual));
            }
        }
        (ResultValue::Sequence(e), ResultValue::Sequence(a)) => {
            if e.len() != a.len() {
                out.push(mismatch(path, MismatchKind::LengthMismatch, expected, actual));
                return;
            }
            for (index, (e, a)) in e.iter().zip(a).enumerate() {
                walk(&format!("{}[{}]", path, index), e, a, tolerance, out);
            }
        }
        (ResultValue::Mapping(e), ResultValue::Mapping(a)) => {
            for (key, e) in e {
                let child = format!("{}.{}", path, key);
                match a.get(key) {
                    Some(a) => walk(&child, e, a, tolerance, out),
                    None => out.push(missing(child, e)),
                }
            }
        }
        (ResultValue::Text(e), ResultValue::Text(a)) => {
            if e != a {
                out.push(mismatch(path, MismatchKind::ValueMismatch, expected, actual));
            }
        }
        _ => out.push(mismatch(path, MismatchKind::TypeMismatch, expected, actual)),
    }
}

fn mismatch(
    path: &str,
    kind: MismatchKind,
    expected: &ResultValue,
    actual: &ResultValue,
) -> FieldMismatch {
    FieldMismatch {
        path: path.to_string(),
        kind,
        expected: expected.clone(),
        actual: Some(actual.clone()),
    }
}

fn missing(path: String, expected: &ResultValue) -> FieldMismatch {
    FieldMismatch {
        path,
        kind: MismatchKind::Missing,
        expected: expected.clone(),
        actual: None,
    }
}
