//! Session lifecycle traits
//!
//! The automation boundary the suite runs against: real implementations drive
//! a browser over CDP, mock implementations answer from canned page data and
//! count lifecycle calls.

use crate::probe::Predicate;
use async_trait::async_trait;

/// Session provider trait
///
/// Acquisition creates a fresh browser page already navigated to the target
/// URL. Failures (browser unreachable, target creation failure, navigation
/// failure) are not retried; they are fatal to the single case that asked.
#[async_trait]
pub trait SessionProvider: Send + Sync + std::fmt::Debug {
    /// Acquire a fresh session pointed at the target
    async fn acquire(&self) -> Result<Box<dyn PageSession>, crate::Error>;
}

/// Page session trait
///
/// A live page handle supporting the probe queries. `release` must be called
/// exactly once per acquired session, on every exit path.
#[async_trait]
pub trait PageSession: Send + Sync + std::fmt::Debug {
    /// Session ID
    fn id(&self) -> &str;

    /// Read the document title
    async fn title(&self) -> Result<String, crate::Error>;

    /// Count elements matching a predicate
    async fn count(&self, predicate: &Predicate) -> Result<usize, crate::Error>;

    /// Release browser resources
    ///
    /// Never fails: a release racing a browser that already exited is logged
    /// and swallowed, so it can never mask the case outcome.
    async fn release(&self);
}
