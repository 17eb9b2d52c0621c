//! Client for fetching hotel content from the Cupid API.
//!
//! This crate provides:
//! - [`CupidFetcher`] trait, the narrow fetch contract the sync consumes
//! - [`CupidClient`] production client backed by `reqwest`
//! - [`MockCupidClient`] mock client serving pre-registered responses
//! - [`CupidSource`] config enum for choosing between mock and live clients
//! - [`classify_status`] / [`classify_response`], mapping HTTP outcomes to
//!   success, client error, server error or unexpected
//!
//! ## Usage with CupidSource
//!
//! ```ignore
//! use cupid_client::{ClientConfig, CupidSource, MockResponse};
//! use std::collections::HashMap;
//!
//! // Development/testing: use canned responses
//! let mut responses = HashMap::new();
//! responses.insert("/v3.0/property/1641879".to_string(), MockResponse::ok(body));
//! let fetcher = CupidSource::mock(responses).into_fetcher()?;
//!
//! // Production: talk to the API
//! let fetcher = CupidSource::live("https://content-api.cupid.travel", ClientConfig::default())
//!     .into_fetcher()?;
//!
//! let body = fetcher.fetch(Method::GET, "/v3.0/property/1641879", &headers).await?;
//! ```

mod client;
mod mock;
mod status;

pub use client::{ClientConfig, CupidClient};
pub use mock::{MockCupidClient, MockResponse, RecordedRequest};
pub use status::{classify_response, classify_status, StatusClass};

pub use bytes::Bytes;
pub use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue};
pub use reqwest::Method;

use std::collections::HashMap;

use async_trait::async_trait;

/// Header the Cupid API echoes its correlation id in.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, thiserror::Error)]
pub enum CupidError {
    /// A 4xx or 5xx response.
    #[error("error: status={status} request_id={}", .request_id.as_deref().unwrap_or("-"))]
    Api {
        status: u16,
        request_id: Option<String>,
    },
    /// A status outside both the success and error taxonomies (1xx, 3xx, ...).
    #[error("unexpected status code: {0}")]
    UnexpectedStatus(u16),
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl CupidError {
    /// The HTTP status carried by the error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::UnexpectedStatus(status) => Some(*status),
            Self::Reqwest(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidBaseUrl(_) => None,
        }
    }

    /// The correlation id echoed by the API, if any.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Api { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if (400..500).contains(status))
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if (500..600).contains(status))
    }

    /// Whether a later attempt could succeed. Client errors never do.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { .. } => self.is_server_error(),
            Self::Reqwest(e) => e.is_timeout() || e.is_connect(),
            Self::UnexpectedStatus(_) | Self::InvalidBaseUrl(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CupidError>;

/// Trait for fetching raw payloads from the Cupid API.
///
/// Implementations return the body for 2xx responses and a classified
/// [`CupidError`] otherwise. The sync depends only on this trait, so tests
/// and local runs can substitute [`MockCupidClient`].
#[async_trait]
pub trait CupidFetcher: Send + Sync {
    /// Issue `method path` with the given headers and return the body.
    async fn fetch(&self, method: Method, path: &str, headers: &HeaderMap) -> Result<Bytes>;
}

/// Configuration for the Cupid data source.
#[derive(Debug, Clone)]
pub enum CupidSource {
    /// Use the mock client with pre-configured path → response mappings.
    Mock(HashMap<String, MockResponse>),

    /// Connect to the live API.
    Live {
        base_url: String,
        config: ClientConfig,
    },
}

impl CupidSource {
    pub fn mock(responses: HashMap<String, MockResponse>) -> Self {
        Self::Mock(responses)
    }

    pub fn live(base_url: impl Into<String>, config: ClientConfig) -> Self {
        Self::Live {
            base_url: base_url.into(),
            config,
        }
    }

    /// Create the appropriate [`CupidFetcher`] implementation.
    pub fn into_fetcher(self) -> Result<Box<dyn CupidFetcher>> {
        match self {
            Self::Mock(responses) => Ok(Box::new(MockCupidClient::with_responses(responses))),
            Self::Live { base_url, config } => {
                Ok(Box::new(CupidClient::with_config(&base_url, config)?))
            }
        }
    }
}
