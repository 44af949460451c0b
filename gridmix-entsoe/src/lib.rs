//! gridmix-entsoe
//!
//! Public connector that implements `SeriesSource` on top of the ENTSO-E
//! Transparency Platform REST API. Serves actual generation per production
//! type (A75) and cross-border physical flows (A11).
#![warn(missing_docs)]

/// Transport definitions and the production transport backed by `reqwest`.
pub mod adapter;
/// Query parameter construction.
pub mod params;
/// Market document parsing.
pub mod parse;

use std::fmt;
use std::sync::Arc;

use adapter::{EntsoeTransport, ReqwestTransport};
use async_trait::async_trait;
use gridmix_core::{GridmixError, Point, SeriesKey, SeriesSource, TimeWindow};
use url::Url;

/// Stable connector name used in errors and logs.
pub const CONNECTOR_NAME: &str = "gridmix-entsoe";
/// Environment variable holding the API security token.
pub const TOKEN_ENV: &str = "ENTSOE_API_KEY";
/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://web-api.tp.entsoe.eu/api";

/// Public connector type. Production users will construct with
/// `EntsoeConnector::from_env()`.
#[derive(Clone)]
pub struct EntsoeConnector {
    transport: Arc<dyn EntsoeTransport>,
    token: String,
    base_url: Url,
}

impl fmt::Debug for EntsoeConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntsoeConnector")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl EntsoeConnector {
    /// Build with an explicit security token and the default transport.
    ///
    /// # Errors
    /// Returns `GridmixError::Config` if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, GridmixError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(GridmixError::Config(format!(
                "empty ENTSO-E security token (set {TOKEN_ENV})"
            )));
        }
        let base_url = Url::parse(DEFAULT_BASE_URL)
            .map_err(|e| GridmixError::Config(format!("invalid base url: {e}")))?;
        Ok(Self {
            transport: Arc::new(ReqwestTransport::new()),
            token,
            base_url,
        })
    }

    /// Build from the `ENTSOE_API_KEY` environment variable.
    ///
    /// # Errors
    /// Returns `GridmixError::Config` if the variable is missing or empty.
    pub fn from_env() -> Result<Self, GridmixError> {
        Self::from_env_var(TOKEN_ENV)
    }

    /// Build from a token held in the environment variable `name`.
    ///
    /// # Errors
    /// Returns `GridmixError::Config` if the variable is missing or empty.
    pub fn from_env_var(name: &str) -> Result<Self, GridmixError> {
        match std::env::var(name) {
            Ok(token) if !token.trim().is_empty() => Self::new(token),
            _ => Err(GridmixError::Config(format!(
                "missing ENTSO-E security token: set {name}"
            ))),
        }
    }

    /// Replace the HTTP transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn EntsoeTransport>) -> Self {
        self.transport = transport;
        self
    }

    /// Point the connector at another endpoint (a proxy or a local mock server).
    ///
    /// # Errors
    /// Returns `GridmixError::Config` if `url` does not parse.
    pub fn with_base_url(mut self, url: &str) -> Result<Self, GridmixError> {
        self.base_url =
            Url::parse(url).map_err(|e| GridmixError::Config(format!("invalid base url {url}: {e}")))?;
        Ok(self)
    }

    /// Endpoint in use.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full request URL for one chunk of `key`.
    #[must_use]
    pub fn request_url(&self, key: SeriesKey, window: TimeWindow) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .extend_pairs(params::query_pairs(key, window, &self.token));
        url
    }
}

#[async_trait]
impl SeriesSource for EntsoeConnector {
    fn name(&self) -> &'static str {
        CONNECTOR_NAME
    }

    fn vendor(&self) -> &'static str {
        "ENTSO-E"
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gridmix_entsoe::fetch_chunk",
            skip(self, key, window),
            fields(key = %key, start = %window.start, end = %window.end),
        )
    )]
    async fn fetch_chunk(
        &self,
        key: SeriesKey,
        window: TimeWindow,
    ) -> Result<Vec<Point>, GridmixError> {
        let reply = self.transport.get(self.request_url(key, window)).await?;

        if let Some(ack) = parse::acknowledgement(&reply.body)? {
            if ack.is_no_data() {
                #[cfg(feature = "tracing")]
                tracing::debug!(key = %key, "no matching data");
                return Ok(Vec::new());
            }
            return Err(GridmixError::connector(CONNECTOR_NAME, ack.to_string()));
        }
        if !reply.is_success() {
            return Err(GridmixError::connector(
                CONNECTOR_NAME,
                format!("HTTP {} for {key} {window}", reply.status),
            ));
        }

        let points = parse::parse_points(key, &reply.body)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(key = %key, points = points.len(), "chunk parsed");
        Ok(points)
    }
}
