//! Chrome DevTools Protocol layer
//!
//! Everything the suite needs to remote-control a browser: endpoint discovery
//! over HTTP, JSON-RPC over WebSocket, and a typed client for navigation and
//! JavaScript evaluation.

pub mod client;
pub mod connection;
pub mod endpoint;
pub mod mock;
pub mod traits;
pub mod types;

pub use client::CdpClientImpl;
pub use connection::CdpWebSocketConnection;
pub use endpoint::DebugEndpoint;
pub use traits::{CdpClient, CdpConnection, EvaluationResult, NavigationWait};
