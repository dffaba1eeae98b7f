//! Suite result types

use serde::Serialize;

/// Outcome of a single case
///
/// Assertion failures and setup/probe errors are kept apart: a failure means
/// the page was reached and the condition did not hold, an error means the
/// case never got a usable answer.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CaseStatus {
    /// Probe condition held
    Passed,
    /// Probe condition did not hold
    Failed {
        /// Assertion message
        message: String,
    },
    /// Session acquisition or probe query failed
    Error {
        /// Error description
        message: String,
    },
}

impl CaseStatus {
    /// Whether the case passed
    pub fn is_passed(&self) -> bool {
        matches!(self, CaseStatus::Passed)
    }

    /// Whether the case failed its assertion
    pub fn is_failed(&self) -> bool {
        matches!(self, CaseStatus::Failed { .. })
    }

    /// Whether the case errored before asserting
    pub fn is_error(&self) -> bool {
        matches!(self, CaseStatus::Error { .. })
    }

    /// Short label for log lines
    pub fn label(&self) -> &'static str {
        match self {
            CaseStatus::Passed => "PASS",
            CaseStatus::Failed { .. } => "FAIL",
            CaseStatus::Error { .. } => "ERROR",
        }
    }
}

/// Result of running a single case
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    /// Case name
    pub name: String,
    /// Case outcome
    #[serde(flatten)]
    pub status: CaseStatus,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

/// Result of running the whole suite
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    /// Number of cases run
    pub total: usize,
    /// Cases that passed
    pub passed: usize,
    /// Cases that failed their assertion
    pub failed: usize,
    /// Cases that errored before asserting
    pub errored: usize,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
    /// Per-case results
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    /// Aggregate per-case reports
    pub fn from_cases(cases: Vec<CaseReport>, duration_ms: u64) -> Self {
        let passed = cases.iter().filter(|c| c.status.is_passed()).count();
        let failed = cases.iter().filter(|c| c.status.is_failed()).count();
        let errored = cases.iter().filter(|c| c.status.is_error()).count();

        Self {
            total: cases.len(),
            passed,
            failed,
            errored,
            duration_ms,
            cases,
        }
    }

    /// Whether every case passed
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(status: CaseStatus) -> CaseReport {
        CaseReport {
            name: "case".to_string(),
            status,
            duration_ms: 1,
        }
    }

    #[test]
    fn test_aggregation() {
        let suite = SuiteReport::from_cases(
            vec![
                report(CaseStatus::Passed),
                report(CaseStatus::Failed {
                    message: "nope".to_string(),
                }),
                report(CaseStatus::Error {
                    message: "boom".to_string(),
                }),
            ],
            12,
        );

        assert_eq!(suite.total, 3);
        assert_eq!(suite.passed, 1);
        assert_eq!(suite.failed, 1);
        assert_eq!(suite.errored, 1);
        assert!(!suite.all_passed());
    }

    #[test]
    fn test_all_passed() {
        let suite = SuiteReport::from_cases(vec![report(CaseStatus::Passed)], 1);
        assert!(suite.all_passed());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_value(CaseStatus::Failed {
            message: "2 >= 3 not met".to_string(),
        })
        .unwrap();

        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["message"], "2 >= 3 not met");
    }
}
