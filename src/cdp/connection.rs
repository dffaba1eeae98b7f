//! CDP WebSocket connection implementation
//!
//! JSON-RPC over a WebSocket to a Chrome DevTools Protocol target. Commands
//! are correlated to responses by ID through a pending-command map; a spawned
//! reader task owns the receive half of the socket.

use super::traits::{CdpConnection, CdpError as CdpErrorResponse, CdpResponse};
use super::types::{CdpNotification, CdpRequest, CdpRpcResponse};
use crate::Error;
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Per-command timeout tiers
#[derive(Debug, Clone)]
struct CdpTimeoutConfig {
    /// Default timeout for most commands (seconds)
    default_timeout_secs: u64,
    /// Timeout for page navigation commands (seconds)
    navigation_timeout_secs: u64,
    /// Timeout for JavaScript execution (seconds)
    execution_timeout_secs: u64,
}

impl Default for CdpTimeoutConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: 30,
            navigation_timeout_secs: 60,
            execution_timeout_secs: 30,
        }
    }
}

impl CdpTimeoutConfig {
    /// Get timeout duration for a specific command method
    fn get_timeout_for_command(&self, method: &str) -> tokio::time::Duration {
        let method_lower = method.to_lowercase();

        if method_lower.contains("navigate") || method_lower.contains("reload") {
            return tokio::time::Duration::from_secs(self.navigation_timeout_secs);
        }

        if method_lower.contains("runtime.evaluate") || method_lower.contains("runtime.call") {
            return tokio::time::Duration::from_secs(self.execution_timeout_secs);
        }

        tokio::time::Duration::from_secs(self.default_timeout_secs)
    }
}

/// Pending command response
#[derive(Debug)]
struct PendingCommand {
    /// Response channel sender
    sender: tokio::sync::oneshot::Sender<CdpResponse>,
    /// Command method (for logging)
    method: String,
}

/// CDP WebSocket connection implementation
#[derive(Debug)]
pub struct CdpWebSocketConnection {
    /// WebSocket URL
    url: String,
    /// Send half of the socket
    sink: Arc<Mutex<WsSink>>,
    /// Next command ID
    next_id: AtomicU64,
    /// Pending commands (ID -> response sender)
    pending_commands: Arc<Mutex<HashMap<u64, PendingCommand>>>,
    /// Is connection active
    is_active: Arc<AtomicBool>,
    /// Timeout configuration
    timeout_config: CdpTimeoutConfig,
}

impl CdpWebSocketConnection {
    /// Connect to a CDP target
    ///
    /// # Arguments
    /// * `url` - WebSocket URL (e.g., "ws://localhost:9222/devtools/page/ABC123")
    pub async fn new<S: Into<String>>(url: S) -> Result<Arc<Self>, Error> {
        let url = url.into();
        info!("Connecting to CDP target: {}", url);

        let (ws_stream, _) = connect_async(&url)
            .await
            .map_err(|e| Error::websocket(format!("Failed to connect to {}: {}", url, e)))?;

        let (sink, stream) = ws_stream.split();

        let connection = Arc::new(Self {
            url,
            sink: Arc::new(Mutex::new(sink)),
            next_id: AtomicU64::new(1),
            pending_commands: Arc::new(Mutex::new(HashMap::new())),
            is_active: Arc::new(AtomicBool::new(true)),
            timeout_config: CdpTimeoutConfig::default(),
        });

        connection.spawn_reader(stream);

        Ok(connection)
    }

    /// Spawn the reader task that dispatches responses to pending commands
    fn spawn_reader(&self, stream: WsStream) {
        let sink = Arc::clone(&self.sink);
        let pending_commands = Arc::clone(&self.pending_commands);
        let is_active = Arc::clone(&self.is_active);

        tokio::spawn(async move {
            Self::read_loop(stream, sink, &pending_commands, &is_active).await;

            // Wake every waiter; the dropped senders surface as channel-closed
            // errors in send_command.
            is_active.store(false, Ordering::SeqCst);
            let mut pending = pending_commands.lock().await;
            if !pending.is_empty() {
                warn!("Connection closed with {} command(s) in flight", pending.len());
            }
            pending.clear();
        });
    }

    /// Receive messages until the socket closes or errors
    async fn read_loop(
        mut stream: WsStream,
        sink: Arc<Mutex<WsSink>>,
        pending_commands: &Arc<Mutex<HashMap<u64, PendingCommand>>>,
        is_active: &Arc<AtomicBool>,
    ) {
        while is_active.load(Ordering::SeqCst) {
            let message = match stream.next().await {
                Some(Ok(msg)) => msg,
                Some(Err(e)) => {
                    warn!("WebSocket receive error: {}", e);
                    break;
                }
                None => {
                    debug!("WebSocket stream ended");
                    break;
                }
            };

            match message {
                Message::Text(text) => {
                    Self::dispatch_message(&text, pending_commands).await;
                }
                Message::Close(_) => {
                    debug!("WebSocket close frame received");
                    break;
                }
                Message::Ping(data) => {
                    let mut sink = sink.lock().await;
                    if let Err(e) = sink.send(Message::Pong(data)).await {
                        warn!("Failed to send pong: {}", e);
                    }
                }
                _ => {}
            }
        }
    }

    /// Route an incoming text frame to its pending command
    async fn dispatch_message(
        text: &str,
        pending_commands: &Arc<Mutex<HashMap<u64, PendingCommand>>>,
    ) {
        if let Ok(response) = serde_json::from_str::<CdpRpcResponse>(text) {
            let mut pending = pending_commands.lock().await;

            if let Some(pending_cmd) = pending.remove(&response.id) {
                debug!("Response for command {} ({})", response.id, pending_cmd.method);

                let cdp_response = CdpResponse {
                    id: response.id,
                    result: Some(response.result),
                    error: response.error.map(|e| CdpErrorResponse {
                        code: e.code,
                        message: e.message,
                        data: e.data,
                    }),
                };

                let _ = pending_cmd.sender.send(cdp_response);
            } else {
                warn!("Response for unknown command ID: {}", response.id);
            }
            return;
        }

        // Unsubscribed CDP events arrive on the same socket; log and drop them.
        if let Ok(notification) = serde_json::from_str::<CdpNotification>(text) {
            debug!("Ignoring CDP event: {}", notification.method);
            return;
        }

        warn!("Unknown message format: {}", text);
    }

    /// Target URL this connection is attached to
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CdpConnection for CdpWebSocketConnection {
    /// Send a CDP command and wait for its response
    async fn send_command(&self, method: &str, params: serde_json::Value) -> Result<CdpResponse, Error> {
        if !self.is_active.load(Ordering::SeqCst) {
            return Err(Error::websocket("Connection is not active"));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params: if params.is_null() { None } else { Some(params) },
        };

        let json = serde_json::to_string(&request)
            .map_err(|e| Error::cdp(format!("Failed to serialize request: {}", e)))?;

        debug!("Sending CDP command {}: {}", id, method);

        let (sender, receiver) = tokio::sync::oneshot::channel();

        {
            let mut pending = self.pending_commands.lock().await;
            pending.insert(
                id,
                PendingCommand {
                    sender,
                    method: method.to_string(),
                },
            );
        }

        {
            let mut sink = self.sink.lock().await;
            if let Err(e) = sink.send(Message::Text(json)).await {
                let mut pending = self.pending_commands.lock().await;
                pending.remove(&id);
                return Err(Error::websocket(format!("Failed to send command: {}", e)));
            }
        }

        let timeout_duration = self.timeout_config.get_timeout_for_command(method);

        match tokio::time::timeout(timeout_duration, receiver).await {
            Ok(Ok(response)) => {
                if let Some(error) = &response.error {
                    return Err(Error::cdp(format!(
                        "{} (code: {})",
                        error.message, error.code
                    )));
                }
                Ok(response)
            }
            Ok(Err(_)) => Err(Error::websocket(format!(
                "Command {} ({}) response channel closed",
                id, method
            ))),
            Err(_) => {
                let mut pending = self.pending_commands.lock().await;
                pending.remove(&id);
                Err(Error::timeout(format!("Command {} ({}) timed out", id, method)))
            }
        }
    }

    /// Close the connection
    ///
    /// Sends a close frame on a best-effort basis; failures on an
    /// already-dead socket are logged and swallowed.
    async fn close(&self) -> Result<(), Error> {
        info!("Closing CDP WebSocket connection to {}", self.url);

        self.is_active.store(false, Ordering::SeqCst);

        let mut sink = self.sink.lock().await;
        if let Err(e) = sink.send(Message::Close(None)).await {
            debug!("Close frame not delivered (socket already gone): {}", e);
        }

        Ok(())
    }

    /// Check if connection is active
    fn is_active(&self) -> bool {
        self.is_active.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_tiers() {
        let config = CdpTimeoutConfig::default();

        assert_eq!(
            config.get_timeout_for_command("Page.navigate"),
            tokio::time::Duration::from_secs(60)
        );
        assert_eq!(
            config.get_timeout_for_command("Runtime.evaluate"),
            tokio::time::Duration::from_secs(30)
        );
        assert_eq!(
            config.get_timeout_for_command("Page.enable"),
            tokio::time::Duration::from_secs(30)
        );
    }
}
