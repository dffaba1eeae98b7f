//! Suite runner
//!
//! Owns the acquire → probe → assert → release sequence for every case, so
//! session teardown runs on each exit path in exactly one place.

use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::ProbeTuning;
use crate::session::SessionProvider;
use crate::suite::cases::SmokeCase;
use crate::suite::report::{CaseReport, CaseStatus, SuiteReport};

/// Smoke-test suite runner
#[derive(Debug)]
pub struct SmokeSuite {
    provider: Arc<dyn SessionProvider>,
    tuning: ProbeTuning,
}

impl SmokeSuite {
    /// Create a suite over a session provider
    pub fn new(provider: Arc<dyn SessionProvider>, tuning: ProbeTuning) -> Self {
        Self { provider, tuning }
    }

    /// Run every case, each against its own fresh session
    ///
    /// Cases run sequentially but are fully independent; no result or state
    /// carries over from one to the next.
    pub async fn run_all(&self) -> SuiteReport {
        let start = Instant::now();
        let mut cases = Vec::with_capacity(SmokeCase::ALL.len());

        info!("Running {} smoke case(s)", SmokeCase::ALL.len());

        for case in SmokeCase::ALL {
            cases.push(self.run_case(case).await);
        }

        SuiteReport::from_cases(cases, start.elapsed().as_millis() as u64)
    }

    /// Run a single case
    pub async fn run_case(&self, case: SmokeCase) -> CaseReport {
        let start = Instant::now();
        let status = self.execute(case).await;

        match &status {
            CaseStatus::Passed => info!("{}: {}", case.name(), status.label()),
            CaseStatus::Failed { message } => {
                warn!("{}: {} - {}", case.name(), status.label(), message)
            }
            CaseStatus::Error { message } => {
                warn!("{}: {} - {}", case.name(), status.label(), message)
            }
        }

        CaseReport {
            name: case.name().to_string(),
            status,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Scoped acquisition: release runs on success, assertion failure, and
    /// probe error alike
    async fn execute(&self, case: SmokeCase) -> CaseStatus {
        let session = match self.provider.acquire().await {
            Ok(session) => session,
            Err(e) => {
                return CaseStatus::Error {
                    message: e.to_string(),
                }
            }
        };

        let outcome = case.run(session.as_ref(), &self.tuning).await;

        session.release().await;

        match outcome {
            Ok(status) => status,
            Err(e) => CaseStatus::Error {
                message: e.to_string(),
            },
        }
    }
}
