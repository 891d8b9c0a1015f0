use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use stat_verify_providers::ranking::rank_average;
use stat_verify_providers::*;

// ===== Reference Values =====

#[test]
fn test_reference_normality_values() {
    let shapiro = shapiro_wilk(&[1.2, 1.8, 2.5, 2.3, 2.1]).unwrap();
    assert_abs_diff_eq!(shapiro.statistic, 0.943245, epsilon = 1e-6);

    let anderson = anderson_darling(&[1.2, 1.5, 1.8, 2.0, 2.2]).unwrap();
    assert_eq!(anderson.critical_values.len(), anderson.significance_levels.len());
}

#[test]
fn test_reference_stationarity_values() {
    let adf = augmented_dickey_fuller(&[1.2, 1.5, 1.8, 2.0, 2.5]).unwrap();
    assert_abs_diff_eq!(adf.statistic, 0.683604, epsilon = 1e-6);

    let level = kpss(&[1.0, 1.1, 1.2, 1.3, 1.4]).unwrap();
    assert_abs_diff_eq!(level.statistic, 0.371429, epsilon = 1e-6);
    let labels: Vec<&str> = level.critical_values.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(labels, vec!["10%", "5%", "2.5%", "1%"]);
}

#[test]
fn test_chi_squared_reference() {
    let result = chi_squared_contingency(&[vec![10.0, 20.0], vec![30.0, 40.0]]).unwrap();
    assert_abs_diff_eq!(result.statistic, 0.446429, epsilon = 1e-6);
    assert_abs_diff_eq!(result.p_value, 0.504036, epsilon = 1e-6);
}

// ===== Error Reporting =====

#[test]
fn test_errors_render_procedure_names() {
    let err = shapiro_wilk(&[1.0]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Shapiro-Wilk requires at least 3 observations, got 1"
    );

    let err = logistic_regression(&[vec![1.0]], &[1.0]).unwrap_err();
    assert!(err.to_string().contains("two response classes"));
}

#[test]
fn test_non_finite_input_is_rejected() {
    assert!(matches!(
        shapiro_wilk(&[1.0, f64::NAN, 2.0, 3.0]),
        Err(StatsError::InvalidArgument(_))
    ));
    assert!(matches!(
        pearson(&[1.0, 2.0, f64::INFINITY], &[1.0, 2.0, 3.0]),
        Err(StatsError::InvalidArgument(_))
    ));
}

// ===== Properties =====

fn sample(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1000.0f64..1000.0, len)
}

proptest! {
    #[test]
    fn prop_ranks_sum_to_triangular_number(values in sample(1..40)) {
        let n = values.len() as f64;
        let total: f64 = rank_average(&values).iter().sum();
        prop_assert!((total - n * (n + 1.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn prop_p_values_are_probabilities(first in sample(3..25), second in sample(3..25)) {
        for result in [
            student_t(&first, &second),
            mann_whitney_u(&first, &second),
            kolmogorov_smirnov_2samp(&first, &second),
        ] {
            if let Ok(result) = result {
                prop_assert!((0.0..=1.0).contains(&result.p_value));
            }
        }
    }

    #[test]
    fn prop_correlations_are_bounded(pairs in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 3..30)) {
        let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        for result in [pearson(&x, &y), spearman(&x, &y), kendall_tau(&x, &y)] {
            if let Ok(result) = result {
                prop_assert!((-1.0..=1.0).contains(&result.coefficient));
                prop_assert!((0.0..=1.0).contains(&result.p_value));
            }
        }
    }

    #[test]
    fn prop_shapiro_wilk_statistic_in_unit_interval(values in sample(3..60)) {
        if let Ok(result) = shapiro_wilk(&values) {
            prop_assert!(result.statistic > 0.0 && result.statistic <= 1.0);
            prop_assert!((0.0..=1.0).contains(&result.p_value));
        }
    }

    #[test]
    fn prop_linear_regression_recovers_exact_line(
        slope in -10.0f64..10.0,
        intercept in -10.0f64..10.0,
        xs in prop::collection::btree_set(-50i32..50, 3..20),
    ) {
        let predictors: Vec<Vec<f64>> = xs.iter().map(|x| vec![f64::from(*x)]).collect();
        let response: Vec<f64> = xs.iter().map(|x| slope * f64::from(*x) + intercept).collect();
        let fit = linear_regression(&predictors, &response).unwrap();
        prop_assert!((fit.coefficients[0] - slope).abs() < 1e-6);
        prop_assert!((fit.intercept - intercept).abs() < 1e-6);
    }
}
