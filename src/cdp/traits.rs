//! CDP (Chrome DevTools Protocol) layer traits
//!
//! Abstract interfaces for CDP communication, with real WebSocket
//! implementations alongside and mocks in [`crate::cdp::mock`].

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// CDP response representation
#[derive(Debug, Clone)]
pub struct CdpResponse {
    /// Response ID (matches request ID)
    pub id: u64,
    /// Response result
    pub result: Option<Value>,
    /// Error if any
    pub error: Option<CdpError>,
}

/// CDP error representation
#[derive(Debug, Clone)]
pub struct CdpError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Additional error data
    pub data: Option<Value>,
}

/// CDP connection trait
///
/// Represents a WebSocket connection to a Chrome DevTools Protocol target.
#[async_trait]
pub trait CdpConnection: Send + Sync + std::fmt::Debug {
    /// Send a CDP command and wait for its response
    async fn send_command(&self, method: &str, params: Value) -> Result<CdpResponse, crate::Error>;

    /// Close the connection
    ///
    /// Closing an already-dead socket is not an error.
    async fn close(&self) -> Result<(), crate::Error>;

    /// Check if connection is active
    fn is_active(&self) -> bool;
}

/// How long to wait for a navigated page to finish loading
#[derive(Debug, Clone, Copy)]
pub struct NavigationWait {
    /// Overall budget in milliseconds
    pub timeout_ms: u64,
    /// Interval between document.readyState polls in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for NavigationWait {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            poll_interval_ms: 100,
        }
    }
}

/// CDP client trait
///
/// High-level client providing the typed operations the suite needs.
#[async_trait]
pub trait CdpClient: Send + Sync + std::fmt::Debug {
    /// Get the underlying connection
    fn connection(&self) -> Arc<dyn CdpConnection>;

    /// Navigate to a URL and wait for the document to load
    async fn navigate(&self, url: &str, wait: NavigationWait) -> Result<NavigationResult, crate::Error>;

    /// Evaluate JavaScript in the page
    async fn evaluate(&self, script: &str, await_promise: bool) -> Result<EvaluationResult, crate::Error>;

    /// Enable a CDP domain
    async fn enable_domain(&self, domain: &str) -> Result<(), crate::Error>;

    /// Call a raw CDP method (returns JSON Value)
    async fn call_method(&self, method: &str, params: Value) -> Result<Value, crate::Error>;
}

/// Navigation result
#[derive(Debug, Clone)]
pub struct NavigationResult {
    /// URL after navigation
    pub url: String,
    /// Whether document.readyState reached "complete" within the wait budget
    pub is_loaded: bool,
}

/// JavaScript evaluation result
#[derive(Debug, Clone)]
pub enum EvaluationResult {
    /// String value
    String(String),
    /// Number value
    Number(f64),
    /// Boolean value
    Bool(bool),
    /// Null value
    Null,
    /// Object/Array (as JSON)
    Object(Value),
}

impl EvaluationResult {
    /// Interpret the result as a non-negative count
    pub fn as_count(&self) -> Option<usize> {
        match self {
            EvaluationResult::Number(n) if *n >= 0.0 => Some(*n as usize),
            _ => None,
        }
    }

    /// Interpret the result as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EvaluationResult::String(s) => Some(s),
            _ => None,
        }
    }
}
