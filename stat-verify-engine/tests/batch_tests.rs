use serde_json::json;
use stat_verify_core::{
    fields, ComputedResult, ResultSchema, ShapeDescriptor, ValidatedInput, VerificationSettings,
};
use stat_verify_engine::{
    names, BatchVerifier, Fixture, FixtureTable, TestEngine, TestRegistry, VerificationStatus,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

// ===== Batch Run Tests =====

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_embedded_fixtures_all_pass() {
    let verifier = BatchVerifier::new(TestEngine::standard());
    let table = FixtureTable::embedded().unwrap();

    let summary = verifier.run(&table).await;

    assert_eq!(summary.total(), table.len());
    assert!(summary.all_passed(), "{:#?}", summary.reports);
    assert_eq!(summary.passed_count(), table.len());
    assert_eq!(summary.failed_count(), 0);
    assert_eq!(summary.errored_count(), 0);
    assert!(summary.finished_at >= summary.started_at);
}

#[tokio::test]
async fn test_reports_follow_identifier_order() {
    let verifier = BatchVerifier::new(TestEngine::standard()).with_max_concurrency(3);
    let table = FixtureTable::embedded().unwrap();

    let summary = verifier.run(&table).await;
    let reported: Vec<&str> = summary.reports.iter().map(|r| r.test.as_str()).collect();
    let expected: Vec<&str> = table.identifiers().map(|id| id.as_str()).collect();
    assert_eq!(reported, expected);
}

#[tokio::test]
async fn test_mixed_outcomes_are_counted() {
    let table = FixtureTable::default()
        .insert(
            names::PEARSON,
            Fixture {
                data: json!({"X": [1, 2, 3, 4, 5], "Y": [2, 4, 6, 8, 10]}),
                expected_result: ComputedResult::new().with_field(fields::CORRELATION_COEFFICIENT, 1.0),
            },
        )
        .insert(
            names::SPEARMAN,
            Fixture {
                data: json!({"X": [1, 2, 3, 4, 5], "Y": [5, 4, 3, 2, 1]}),
                expected_result: ComputedResult::new().with_field(fields::CORRELATION_COEFFICIENT, 1.0),
            },
        )
        .insert(
            "Nonexistent Test",
            Fixture {
                data: json!([1, 2, 3]),
                expected_result: ComputedResult::new(),
            },
        );

    let summary = BatchVerifier::new(TestEngine::standard()).run(&table).await;

    assert_eq!(summary.total(), 3);
    assert_eq!(summary.passed_count(), 1);
    assert_eq!(summary.failed_count(), 1);
    assert_eq!(summary.errored_count(), 1);
    assert!(!summary.all_passed());

    let unknown = summary
        .reports
        .iter()
        .find(|r| r.test.as_str() == "Nonexistent Test")
        .unwrap();
    assert!(matches!(
        &unknown.status,
        VerificationStatus::Errored { code, .. } if code == "unknown_test"
    ));
}

#[tokio::test]
async fn test_empty_table() {
    let summary = BatchVerifier::new(TestEngine::standard())
        .run(&FixtureTable::default())
        .await;
    assert_eq!(summary.total(), 0);
    assert!(summary.all_passed());
}

// ===== Concurrency Tests =====

fn slow_provider(
    running: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
) -> impl Fn(&ValidatedInput) -> anyhow::Result<ComputedResult> + Send + Sync + 'static {
    move |_: &ValidatedInput| {
        let now = running.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        running.fetch_sub(1, Ordering::SeqCst);
        Ok(ComputedResult::new()
            .with_field(fields::STATISTIC, 0.0)
            .with_field(fields::P_VALUE, 1.0))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_is_bounded() {
    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let mut registry = TestRegistry::empty();
    let mut table = FixtureTable::default();
    for i in 0..8 {
        let id = format!("Slow Test {}", i);
        registry = registry.register(
            id.as_str(),
            ShapeDescriptor::SingleSequence,
            ResultSchema::Hypothesis,
            slow_provider(Arc::clone(&running), Arc::clone(&peak)),
        );
        table = table.insert(
            id,
            Fixture {
                data: json!([1.0, 2.0]),
                expected_result: ComputedResult::new(),
            },
        );
    }

    let verifier = BatchVerifier::new(TestEngine::new(registry)).with_max_concurrency(2);
    let summary = verifier.run(&table).await;

    assert!(summary.all_passed(), "{:#?}", summary.reports);
    assert_eq!(summary.total(), 8);
    let peak = peak.load(Ordering::SeqCst);
    assert!((1..=2).contains(&peak), "peak concurrency {}", peak);
    assert_eq!(running.load(Ordering::SeqCst), 0);
}

#[test]
fn test_max_concurrency_is_at_least_one() {
    let verifier = BatchVerifier::new(TestEngine::standard()).with_max_concurrency(0);
    assert_eq!(verifier.max_concurrency(), 1);
}

#[test]
fn test_from_settings() {
    let settings = VerificationSettings {
        max_concurrency: 7,
        ..VerificationSettings::default()
    };
    let verifier = BatchVerifier::from_settings(TestEngine::standard(), &settings);
    assert_eq!(verifier.max_concurrency(), 7);
}
