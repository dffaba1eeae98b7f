//! Live CDP-backed session implementation

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cdp::endpoint::DebugEndpoint;
use crate::cdp::{CdpClient, CdpClientImpl, CdpWebSocketConnection, NavigationWait};
use crate::config::SmokeConfig;
use crate::probe::{Predicate, TITLE_SCRIPT};
use crate::session::traits::{PageSession, SessionProvider};
use crate::Error;

/// Session provider backed by a Chrome debugging endpoint
#[derive(Debug)]
pub struct CdpSessionProvider {
    endpoint: DebugEndpoint,
    target_url: String,
    wait: NavigationWait,
}

impl CdpSessionProvider {
    /// Connect to the configured debugging endpoint
    ///
    /// Performs the version handshake up front so an unreachable or
    /// incompatible browser fails here, before any case runs.
    pub async fn connect(config: &SmokeConfig) -> Result<Self, Error> {
        let endpoint = DebugEndpoint::new(&config.cdp_endpoint)?;

        let info = endpoint.version().await?;
        info!(
            "Connected to {} (protocol {})",
            info.product, info.protocol_version
        );

        Ok(Self {
            endpoint,
            target_url: config.target_url.clone(),
            wait: NavigationWait {
                timeout_ms: config.navigation_timeout_ms,
                poll_interval_ms: config.poll_interval_ms,
            },
        })
    }

    async fn open_session(&self, target_id: &str, ws_url: &str) -> Result<CdpClientImpl, Error> {
        let connection = CdpWebSocketConnection::new(ws_url).await?;
        let client = CdpClientImpl::new(connection);

        client.enable_domain("Page").await?;
        client.enable_domain("Runtime").await?;

        let nav = self.client_navigate(&client).await?;
        if !nav {
            // The probes run against whatever did render; a slow third-party
            // page is not a setup failure.
            warn!("Page load wait exhausted for target {}", target_id);
        }

        Ok(client)
    }

    async fn client_navigate(&self, client: &CdpClientImpl) -> Result<bool, Error> {
        let result = client.navigate(&self.target_url, self.wait).await?;
        Ok(result.is_loaded)
    }
}

#[async_trait]
impl SessionProvider for CdpSessionProvider {
    async fn acquire(&self) -> Result<Box<dyn PageSession>, Error> {
        let target = self.endpoint.create_page_target("about:blank").await?;
        debug!("Acquired target {}", target.target_id);

        // A target that fails to come up must not leak a browser tab.
        let client = match self.open_session(&target.target_id, &target.ws_url).await {
            Ok(client) => client,
            Err(e) => {
                self.endpoint.close_target(&target.target_id).await;
                return Err(e);
            }
        };

        Ok(Box::new(CdpPageSession {
            id: Uuid::new_v4().to_string(),
            target_id: target.target_id,
            endpoint: self.endpoint.clone(),
            client,
        }))
    }
}

/// A live browser page attached over CDP
#[derive(Debug)]
pub struct CdpPageSession {
    id: String,
    target_id: String,
    endpoint: DebugEndpoint,
    client: CdpClientImpl,
}

#[async_trait]
impl PageSession for CdpPageSession {
    fn id(&self) -> &str {
        &self.id
    }

    async fn title(&self) -> Result<String, Error> {
        let result = self.client.evaluate(TITLE_SCRIPT, false).await?;
        result
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| Error::query_failed("document.title did not return a string"))
    }

    async fn count(&self, predicate: &Predicate) -> Result<usize, Error> {
        let script = predicate.count_script();
        let result = self.client.evaluate(&script, false).await?;
        result.as_count().ok_or_else(|| {
            Error::query_failed(format!(
                "count expression did not return a number for {}",
                predicate.describe()
            ))
        })
    }

    async fn release(&self) {
        debug!("Releasing session {} (target {})", self.id, self.target_id);

        if let Err(e) = self.client.connection().close().await {
            warn!("Session {} connection close failed: {}", self.id, e);
        }

        self.endpoint.close_target(&self.target_id).await;
    }
}
