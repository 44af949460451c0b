use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the gridmix workspace.
///
/// This wraps configuration and validation failures, remote source failures,
/// cache I/O problems, and the shape errors raised while normalizing and
/// aligning series.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GridmixError {
    /// The workspace is not usable as configured (e.g. a missing API token).
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid input argument (window bounds, time pattern, builder values).
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A series arrived with a resolution coarser than the hourly target grid.
    #[error("resolution {resolution} is coarser than the {target} target")]
    Resolution {
        /// Offending resolution as reported by the source (e.g. "P1D").
        resolution: String,
        /// Target granularity label.
        target: String,
    },

    /// Bundle series do not share the same hourly index.
    #[error("index mismatch in {series} compared to {reference}")]
    IndexMismatch {
        /// Cache name of the misaligned series.
        series: String,
        /// Cache name of the reference series.
        reference: String,
    },

    /// Issues with the returned or expected data (malformed payload, missing fields).
    #[error("data issue: {0}")]
    Data(String),

    /// An individual source returned an error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Source name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Reading or writing a cache entry failed.
    #[error("cache entry {key}: {msg}")]
    Cache {
        /// Cache name of the entry.
        key: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A single chunk request exceeded the configured timeout.
    #[error("provider timed out: {capability} via {connector}")]
    ProviderTimeout {
        /// Source name that timed out.
        connector: String,
        /// Operation label (e.g. "fetch_chunk").
        capability: String,
    },

    /// The overall request exceeded the configured deadline.
    #[error("request timed out: {capability}")]
    RequestTimeout {
        /// Operation label for which the request timed out.
        capability: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl GridmixError {
    /// Helper: build an `InvalidArg` error.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArg(msg.into())
    }

    /// Helper: build a `Connector` error with the source name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Cache` error for a cache entry name.
    pub fn cache(key: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Cache {
            key: key.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            capability: capability.into(),
        }
    }

    /// Helper: build a `RequestTimeout` error.
    #[must_use]
    pub fn request_timeout(capability: impl Into<String>) -> Self {
        Self::RequestTimeout {
            capability: capability.into(),
        }
    }

    /// Returns true for errors raised before any I/O because the request or the
    /// environment itself is unusable.
    ///
    /// These carry actionable messages and should be shown to users verbatim.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidArg(_))
    }
}
