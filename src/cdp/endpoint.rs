//! Chrome debugging endpoint handle
//!
//! Wraps the HTTP side of the DevTools protocol: the version handshake that
//! proves a compatible browser is reachable, page target creation, and target
//! disposal.

use crate::Error;
use tracing::{debug, info, warn};

/// Browser identity reported by the debugging endpoint
#[derive(Debug, Clone)]
pub struct BrowserInfo {
    /// Product name (e.g., "Chrome/120.0.0.0")
    pub product: String,
    /// Protocol version
    pub protocol_version: String,
    /// User agent
    pub user_agent: String,
}

/// A page target created on the endpoint
#[derive(Debug, Clone)]
pub struct TargetHandle {
    /// Target ID (used for disposal)
    pub target_id: String,
    /// WebSocket URL for attaching a CDP connection
    pub ws_url: String,
}

/// Chrome debugging endpoint (e.g., "http://localhost:9222")
#[derive(Debug, Clone)]
pub struct DebugEndpoint {
    endpoint: String,
    http: reqwest::Client,
}

impl DebugEndpoint {
    /// Create a handle for a debugging endpoint
    ///
    /// Accepts either an http(s) or ws(s) URL; the WebSocket scheme is
    /// normalized to its HTTP equivalent.
    pub fn new<S: Into<String>>(endpoint: S) -> Result<Self, Error> {
        let endpoint = endpoint
            .into()
            .replace("ws://", "http://")
            .replace("wss://", "https://");
        let endpoint = endpoint.trim_end_matches('/').to_string();

        info!("Using Chrome debugging endpoint: {}", endpoint);

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { endpoint, http })
    }

    /// Fetch browser identity from the endpoint
    ///
    /// This is the environment handshake: failure means no compatible browser
    /// is reachable and nothing else can proceed.
    pub async fn version(&self) -> Result<BrowserInfo, Error> {
        let url = format!("{}/json/version", self.endpoint);
        debug!("Fetching browser version from {}", url);

        let response = self.http.get(&url).send().await.map_err(|e| {
            Error::setup(format!(
                r#"Failed to reach Chrome debugging endpoint at {}.
Please start Chrome with:
  macOS: /Applications/Google\ Chrome.app/Contents/MacOS/Google\ Chrome --remote-debugging-port=9222 --user-data-dir=/tmp/chrome-debug
  Linux: google-chrome --remote-debugging-port=9222 --user-data-dir=/tmp/chrome-debug
  Windows: chrome.exe --remote-debugging-port=9222 --user-data-dir=C:\chrome-debug
Original error: {}"#,
                self.endpoint, e
            ))
        })?;

        let version_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::setup(format!("Failed to parse version response: {}", e)))?;

        Ok(BrowserInfo {
            product: version_json
                .get("Browser")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
                .to_string(),
            protocol_version: version_json
                .get("Protocol-Version")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
                .to_string(),
            user_agent: version_json
                .get("User-Agent")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
                .to_string(),
        })
    }

    /// Create a new page target
    ///
    /// Uses the /json/new endpoint, which creates a page and returns its
    /// WebSocket URL directly.
    pub async fn create_page_target(&self, url: &str) -> Result<TargetHandle, Error> {
        let new_url = format!("{}/json/new?{}", self.endpoint, url);
        debug!("Creating page target via {}", new_url);

        let response = self
            .http
            .put(&new_url)
            .send()
            .await
            .map_err(|e| Error::setup(format!("Failed to create page target: {}", e)))?;

        let body = response
            .text()
            .await
            .map_err(|e| Error::setup(format!("Failed to read target response: {}", e)))?;

        let target_json: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            Error::setup(format!(
                "Failed to parse new target response: {} (response was: {})",
                e, body
            ))
        })?;

        let target_id = target_json
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::setup("No id in new target response"))?
            .to_string();

        let ws_url = target_json
            .get("webSocketDebuggerUrl")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::setup("No webSocketDebuggerUrl in new target response"))?
            .to_string();

        debug!("Created target {} with WebSocket URL {}", target_id, ws_url);

        Ok(TargetHandle { target_id, ws_url })
    }

    /// Close a page target
    ///
    /// Best effort: a target that already died with its browser is fine.
    pub async fn close_target(&self, target_id: &str) {
        let close_url = format!("{}/json/close/{}", self.endpoint, target_id);
        debug!("Closing page target via {}", close_url);

        match self.http.get(&close_url).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Target {} closed", target_id);
            }
            Ok(response) => {
                warn!("Target {} close returned status {}", target_id, response.status());
            }
            Err(e) => {
                warn!("Target {} close failed: {}", target_id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_normalization() {
        let endpoint = DebugEndpoint::new("ws://localhost:9222").unwrap();
        assert_eq!(endpoint.endpoint, "http://localhost:9222");

        let endpoint = DebugEndpoint::new("wss://remote.example.com:9222/").unwrap();
        assert_eq!(endpoint.endpoint, "https://remote.example.com:9222");

        let endpoint = DebugEndpoint::new("http://localhost:9222").unwrap();
        assert_eq!(endpoint.endpoint, "http://localhost:9222");
    }
}
