//! Portfolio-Smoke: browser smoke-test suite over the Chrome DevTools Protocol
//!
//! This library drives a real Chrome/Chromium instance against a deployed
//! portfolio website and asserts the presence of a handful of page elements.

pub mod error;
pub mod config;

pub mod cdp;
pub mod probe;
pub mod session;
pub mod suite;

// Re-exports
pub use error::{Error, Result};

/// Portfolio-Smoke library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
