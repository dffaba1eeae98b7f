//! CDP client implementation
//!
//! High-level typed operations over a raw CDP connection: navigation with a
//! bounded load wait, and JavaScript evaluation.

use super::traits::*;
use super::types::{EvaluateParams, EvaluateResponse, NavigateParams, RemoteObject};
use crate::Error;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// CDP client implementation
#[derive(Debug, Clone)]
pub struct CdpClientImpl {
    /// Underlying CDP connection
    connection: Arc<dyn CdpConnection>,
}

impl CdpClientImpl {
    /// Create a new CDP client
    pub fn new(connection: Arc<dyn CdpConnection>) -> Self {
        Self { connection }
    }

    /// Parse remote object value to evaluation result
    fn parse_remote_object(obj: &RemoteObject) -> EvaluationResult {
        match obj.r#type.as_str() {
            "string" => {
                let value = obj
                    .value
                    .as_ref()
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                EvaluationResult::String(value)
            }
            "number" => {
                let value = obj.value.as_ref().and_then(|v| v.as_f64()).unwrap_or(0.0);
                EvaluationResult::Number(value)
            }
            "boolean" => {
                let value = obj.value.as_ref().and_then(|v| v.as_bool()).unwrap_or(false);
                EvaluationResult::Bool(value)
            }
            "undefined" | "null" => EvaluationResult::Null,
            "object" | "function" | "bigint" | "symbol" => {
                EvaluationResult::Object(obj.value.clone().unwrap_or(serde_json::Value::Null))
            }
            other => {
                debug!("Unknown remote object type '{}', treating as null", other);
                EvaluationResult::Null
            }
        }
    }

    /// Poll document.readyState until "complete" or the wait budget runs out
    async fn wait_for_load(&self, wait: NavigationWait) -> bool {
        let deadline = tokio::time::Instant::now()
            + tokio::time::Duration::from_millis(wait.timeout_ms);
        let poll_interval = tokio::time::Duration::from_millis(wait.poll_interval_ms.max(1));

        while tokio::time::Instant::now() < deadline {
            match self.evaluate("document.readyState", false).await {
                Ok(EvaluationResult::String(state)) if state == "complete" => {
                    return true;
                }
                Ok(EvaluationResult::String(state)) => {
                    debug!("document.readyState = {}", state);
                }
                Ok(_) => {
                    debug!("Unexpected document.readyState result type");
                }
                Err(e) => {
                    // Evaluation can fail mid-navigation while the execution
                    // context is being replaced; keep polling.
                    debug!("readyState poll failed: {}", e);
                }
            }

            tokio::time::sleep(poll_interval).await;
        }

        false
    }
}

#[async_trait]
impl CdpClient for CdpClientImpl {
    /// Get the underlying connection
    fn connection(&self) -> Arc<dyn CdpConnection> {
        Arc::clone(&self.connection)
    }

    /// Navigate to a URL and wait for the document to load
    async fn navigate(&self, url: &str, wait: NavigationWait) -> Result<NavigationResult, Error> {
        info!("Navigating to {}", url);

        let params = NavigateParams {
            url: url.to_string(),
        };

        let result = self
            .call_method("Page.navigate", serde_json::to_value(params)?)
            .await?;

        if let Some(error_text) = result.get("errorText").and_then(|v| v.as_str()) {
            if !error_text.is_empty() {
                return Err(Error::navigation_failed(format!("{}: {}", url, error_text)));
            }
        }

        let is_loaded = self.wait_for_load(wait).await;
        if !is_loaded {
            debug!("Page load wait budget exhausted for {}", url);
        }

        Ok(NavigationResult {
            url: result
                .get("frame")
                .and_then(|f| f.get("url"))
                .and_then(|u| u.as_str())
                .unwrap_or(url)
                .to_string(),
            is_loaded,
        })
    }

    /// Evaluate JavaScript in the page
    async fn evaluate(&self, script: &str, await_promise: bool) -> Result<EvaluationResult, Error> {
        debug!("Evaluating script: {}", script);

        let params = EvaluateParams {
            expression: script.to_string(),
            await_promise,
            return_by_value: true,
        };

        let result = self
            .call_method("Runtime.evaluate", serde_json::to_value(params)?)
            .await?;

        let eval_response: EvaluateResponse = serde_json::from_value(result)
            .map_err(|e| Error::cdp(format!("Failed to parse EvaluateResponse: {}", e)))?;

        if let Some(exception) = eval_response.exception_details {
            let description = exception
                .exception
                .and_then(|e| e.description)
                .or(exception.text)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(Error::query_failed(description));
        }

        Ok(Self::parse_remote_object(&eval_response.result))
    }

    /// Enable a CDP domain
    async fn enable_domain(&self, domain: &str) -> Result<(), Error> {
        debug!("Enabling domain: {}", domain);

        let method = format!("{}.enable", domain);
        let _ = self.call_method(&method, serde_json::json!({})).await?;

        Ok(())
    }

    /// Call a raw CDP method
    async fn call_method(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value, Error> {
        let response = self.connection.send_command(method, params).await?;

        response.result.ok_or_else(|| Error::cdp("No result in response"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdp::mock::MockCdpConnection;

    #[test]
    fn test_parse_remote_object_string() {
        let obj = RemoteObject {
            r#type: "string".to_string(),
            value: Some(serde_json::json!("test")),
            description: None,
        };

        let result = CdpClientImpl::parse_remote_object(&obj);
        assert!(matches!(result, EvaluationResult::String(s) if s == "test"));
    }

    #[test]
    fn test_parse_remote_object_number() {
        let obj = RemoteObject {
            r#type: "number".to_string(),
            value: Some(serde_json::json!(42.5)),
            description: None,
        };

        let result = CdpClientImpl::parse_remote_object(&obj);
        assert!(matches!(result, EvaluationResult::Number(n) if n == 42.5));
    }

    #[test]
    fn test_parse_remote_object_bool() {
        let obj = RemoteObject {
            r#type: "boolean".to_string(),
            value: Some(serde_json::json!(true)),
            description: None,
        };

        let result = CdpClientImpl::parse_remote_object(&obj);
        assert!(matches!(result, EvaluationResult::Bool(true)));
    }

    #[test]
    fn test_parse_remote_object_null() {
        let obj = RemoteObject {
            r#type: "undefined".to_string(),
            value: None,
            description: None,
        };

        let result = CdpClientImpl::parse_remote_object(&obj);
        assert!(matches!(result, EvaluationResult::Null));
    }

    #[tokio::test]
    async fn test_navigate_against_mock() {
        let connection = Arc::new(MockCdpConnection::new());
        let client = CdpClientImpl::new(connection);

        let result = client
            .navigate("https://example.com", NavigationWait::default())
            .await
            .unwrap();

        assert!(result.is_loaded);
        assert_eq!(result.url, "https://example.com");
    }

    #[tokio::test]
    async fn test_evaluate_number_against_mock() {
        let connection = Arc::new(MockCdpConnection::new());
        connection.stub_evaluate("document.getElementsByTagName", serde_json::json!(2.0));
        let client = CdpClientImpl::new(connection);

        let result = client
            .evaluate("document.getElementsByTagName('canvas').length", false)
            .await
            .unwrap();

        assert_eq!(result.as_count(), Some(2));
    }

    #[tokio::test]
    async fn test_evaluate_surfaces_exceptions() {
        let connection = Arc::new(MockCdpConnection::new());
        connection.stub_exception("boom");
        let client = CdpClientImpl::new(connection);

        let err = client.evaluate("throw new Error('boom')", false).await.unwrap_err();
        assert!(matches!(err, Error::QueryFailed(_)));
    }
}
