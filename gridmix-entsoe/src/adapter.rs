#[cfg(feature = "test-adapters")]
use std::sync::Arc;

use async_trait::async_trait;
use gridmix_core::GridmixError;
use url::Url;

use crate::CONNECTOR_NAME;

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpReply {
    /// True for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// HTTP abstraction (so we can inject mocks in tests).
///
/// Non-2xx statuses are returned as replies, not errors: the API reports
/// "no data" through an acknowledgement document with a 4xx status.
#[async_trait]
pub trait EntsoeTransport: Send + Sync {
    /// Issue a GET for a fully built request URL.
    async fn get(&self, url: Url) -> Result<HttpReply, GridmixError>;
}

/// Production transport backed by `reqwest`.
///
/// `reqwest::Client` is `Clone + Send + Sync`, so no external locking is needed.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing client (custom timeouts, proxies, TLS).
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn map_reqwest_err(e: &reqwest::Error) -> GridmixError {
    if e.is_timeout() {
        GridmixError::provider_timeout(CONNECTOR_NAME, "fetch_chunk")
    } else if e.is_connect() {
        GridmixError::connector(CONNECTOR_NAME, format!("connection failed: {e}"))
    } else {
        GridmixError::connector(CONNECTOR_NAME, e.to_string())
    }
}

#[async_trait]
impl EntsoeTransport for ReqwestTransport {
    async fn get(&self, url: Url) -> Result<HttpReply, GridmixError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_reqwest_err(&e))?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| map_reqwest_err(&e))?;
        Ok(HttpReply { status, body })
    }
}

/* -------- Test-only lightweight adapter constructors ------- */

#[cfg(feature = "test-adapters")]
impl dyn EntsoeTransport {
    /// Build a transport from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn EntsoeTransport>
    where
        F: Send + Sync + 'static + Fn(Url) -> Result<HttpReply, GridmixError>,
    {
        struct FnTransport<F>(F);
        #[async_trait]
        impl<F> EntsoeTransport for FnTransport<F>
        where
            F: Send + Sync + 'static + Fn(Url) -> Result<HttpReply, GridmixError>,
        {
            async fn get(&self, url: Url) -> Result<HttpReply, GridmixError> {
                (self.0)(url)
            }
        }
        Arc::new(FnTransport(f))
    }
}
