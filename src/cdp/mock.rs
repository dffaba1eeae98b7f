//! Mock CDP connection for testing
//!
//! Answers CDP commands from canned data so the client and session layers can
//! be exercised without a browser.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use crate::cdp::traits::{CdpConnection, CdpResponse};
use crate::Error;

/// Mock CDP connection
///
/// `Runtime.evaluate` answers are selected by substring match on the
/// expression, registered via [`MockCdpConnection::stub_evaluate`].
#[derive(Debug)]
pub struct MockCdpConnection {
    is_active: AtomicBool,
    next_id: AtomicU64,
    eval_stubs: Mutex<Vec<(String, serde_json::Value)>>,
    exception: Mutex<Option<String>>,
}

impl MockCdpConnection {
    /// Create a new mock CDP connection
    pub fn new() -> Self {
        Self {
            is_active: AtomicBool::new(true),
            next_id: AtomicU64::new(1),
            eval_stubs: Mutex::new(Vec::new()),
            exception: Mutex::new(None),
        }
    }

    /// Register an evaluation stub: expressions containing `needle` resolve
    /// to `value`
    pub fn stub_evaluate<S: Into<String>>(&self, needle: S, value: serde_json::Value) {
        self.eval_stubs
            .lock()
            .expect("stub lock poisoned")
            .push((needle.into(), value));
    }

    /// Make every non-readyState evaluation raise a page exception
    pub fn stub_exception<S: Into<String>>(&self, text: S) {
        *self.exception.lock().expect("stub lock poisoned") = Some(text.into());
    }

    fn remote_object_for(value: &serde_json::Value) -> serde_json::Value {
        let r#type = match value {
            serde_json::Value::String(_) => "string",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Null => "undefined",
            _ => "object",
        };
        serde_json::json!({ "type": r#type, "value": value })
    }

    fn evaluate_result(&self, params: &serde_json::Value) -> serde_json::Value {
        let expression = params
            .get("expression")
            .and_then(|v| v.as_str())
            .unwrap_or("");

        // Load polling always succeeds so navigation completes promptly.
        if expression.contains("document.readyState") {
            return serde_json::json!({
                "result": { "type": "string", "value": "complete" }
            });
        }

        if let Some(text) = self.exception.lock().expect("stub lock poisoned").as_ref() {
            return serde_json::json!({
                "result": { "type": "object" },
                "exceptionDetails": { "text": text }
            });
        }

        let stubs = self.eval_stubs.lock().expect("stub lock poisoned");
        for (needle, value) in stubs.iter() {
            if expression.contains(needle.as_str()) {
                return serde_json::json!({ "result": Self::remote_object_for(value) });
            }
        }

        serde_json::json!({
            "result": { "type": "string", "value": "mock result" }
        })
    }
}

impl Default for MockCdpConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CdpConnection for MockCdpConnection {
    async fn send_command(&self, method: &str, params: serde_json::Value) -> Result<CdpResponse, Error> {
        if !self.is_active.load(Ordering::Relaxed) {
            return Err(Error::cdp("Connection is closed"));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let result = match method {
            "Page.navigate" => serde_json::json!({
                "frameId": "mock-frame",
                "loaderId": "mock-loader",
                "frame": { "url": params.get("url").cloned().unwrap_or_default() }
            }),
            "Runtime.evaluate" => self.evaluate_result(&params),
            _ => serde_json::json!({}),
        };

        Ok(CdpResponse {
            id,
            result: Some(result),
            error: None,
        })
    }

    async fn close(&self) -> Result<(), Error> {
        self.is_active.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.is_active.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_connection_responds() {
        let conn = MockCdpConnection::new();
        assert!(conn.is_active());

        let response = conn
            .send_command("Runtime.evaluate", serde_json::json!({"expression": "1 + 1"}))
            .await
            .unwrap();
        assert!(response.result.is_some());
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_mock_connection_close() {
        let conn = MockCdpConnection::new();
        conn.close().await.unwrap();
        assert!(!conn.is_active());

        let err = conn
            .send_command("Page.enable", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cdp(_)));
    }

    #[tokio::test]
    async fn test_stubbed_evaluation() {
        let conn = MockCdpConnection::new();
        conn.stub_evaluate("title", serde_json::json!("Vivek's Portfolio"));

        let response = conn
            .send_command(
                "Runtime.evaluate",
                serde_json::json!({"expression": "document.title"}),
            )
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["result"]["value"], "Vivek's Portfolio");
        assert_eq!(result["result"]["type"], "string");
    }
}
