use chrono::{DateTime, Utc};
use serde::Serialize;
use stat_verify_core::{VerificationSettings, DEFAULT_MAX_CONCURRENCY};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::executor::TestEngine;
use crate::fixtures::FixtureTable;
use crate::verification::{verify_fixture, VerificationReport, VerificationStatus};

/// Reports of one batch run, in identifier order
#[derive(Debug, Clone, Serialize)]
pub struct VerificationSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub reports: Vec<VerificationReport>,
}

impl VerificationSummary {
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn passed_count(&self) -> usize {
        self.count(|s| matches!(s, VerificationStatus::Passed))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|s| matches!(s, VerificationStatus::Failed { .. }))
    }

    pub fn errored_count(&self) -> usize {
        self.count(|s| matches!(s, VerificationStatus::Errored { .. }))
    }

    pub fn all_passed(&self) -> bool {
        self.reports.iter().all(VerificationReport::passed)
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    fn count(&self, predicate: impl Fn(&VerificationStatus) -> bool) -> usize {
        self.reports.iter().filter(|r| predicate(&r.status)).count()
    }
}

/// Runs every fixture of a table through the engine with bounded concurrency.
///
/// Each verification is CPU-bound, so it runs on the blocking pool; a semaphore
/// caps how many run at once.
#[derive(Debug, Clone)]
pub struct BatchVerifier {
    engine: TestEngine,
    max_concurrency: usize,
}

impl BatchVerifier {
    pub fn new(engine: TestEngine) -> Self {
        Self {
            engine,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    pub fn from_settings(engine: TestEngine, settings: &VerificationSettings) -> Self {
        Self::new(engine).with_max_concurrency(settings.max_concurrency)
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub fn engine(&self) -> &TestEngine {
        &self.engine
    }

    pub async fn run(&self, fixtures: &FixtureTable) -> VerificationSummary {
        let started_at = Utc::now();
        tracing::info!(
            "Verifying {} fixtures (concurrency {})",
            fixtures.len(),
            self.max_concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut handles = Vec::with_capacity(fixtures.len());

        for (identifier, fixture) in fixtures.iter() {
            let semaphore = Arc::clone(&semaphore);
            let engine = self.engine.clone();
            let test = identifier.clone();
            let fixture = fixture.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                tokio::task::spawn_blocking(move || verify_fixture(&engine, test.as_str(), &fixture))
                    .await
            });

            handles.push((identifier.clone(), handle));
        }

        let mut reports = Vec::with_capacity(handles.len());
        for (identifier, handle) in handles {
            let report = match handle.await {
                Ok(Ok(report)) => report,
                Ok(Err(e)) | Err(e) => VerificationReport::errored(
                    identifier,
                    "task_failed",
                    format!("verification task failed: {}", e),
                ),
            };
            reports.push(report);
        }

        let summary = VerificationSummary {
            started_at,
            finished_at: Utc::now(),
            reports,
        };
        tracing::info!(
            "Verification finished: {} passed, {} failed, {} errored",
            summary.passed_count(),
            summary.failed_count(),
            summary.errored_count()
        );
        summary
    }
}
