//! The smoke-test suite
//!
//! Five independent cases, each an acquire → probe → assert → release
//! sequence, plus the sequential runner and the pass/fail report.

pub mod cases;
pub mod report;
pub mod runner;

pub use cases::{SmokeCase, SKILLS_FAILURE_MESSAGE};
pub use report::{CaseReport, CaseStatus, SuiteReport};
pub use runner::SmokeSuite;
