//! Production client for the Cupid content API.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CONNECTION};
use reqwest::{Client as ReqwestClient, Method};
use tracing::debug;
use url::Url;

use crate::status::classify_response;
use crate::{CupidError, CupidFetcher, Result, REQUEST_ID_HEADER};

const DEFAULT_USER_AGENT: &str = "cupid-client/1.0";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Options for [`CupidClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub user_agent: String,
    /// Whole-request timeout enforced by the HTTP client.
    pub timeout: Duration,
    /// Send `Connection: close` and keep no idle connections.
    pub connection_close: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connection_close: false,
        }
    }
}

impl ClientConfig {
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connection_close(mut self, connection_close: bool) -> Self {
        self.connection_close = connection_close;
        self
    }
}

/// Production Cupid client.
///
/// # Example
///
/// ```ignore
/// use cupid_client::{CupidClient, CupidFetcher, HeaderMap, Method};
///
/// let client = CupidClient::new("https://content-api.cupid.travel")?;
/// let body = client.fetch(Method::GET, "/v3.0/property/1641879", &HeaderMap::new()).await?;
/// ```
pub struct CupidClient {
    base_url: Url,
    client: ReqwestClient,
    connection_close: bool,
}

impl CupidClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, ClientConfig::default())
    }

    pub fn with_config(base_url: &str, config: ClientConfig) -> Result<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(CupidError::InvalidBaseUrl("base URL is required".to_string()));
        }
        let base_url =
            Url::parse(trimmed).map_err(|e| CupidError::InvalidBaseUrl(format!("{trimmed}: {e}")))?;

        let mut builder = ReqwestClient::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout);
        if config.connection_close {
            builder = builder.pool_max_idle_per_host(0);
        }

        Ok(Self {
            base_url,
            client: builder.build()?,
            connection_close: config.connection_close,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URLs pass through untouched; anything else is appended to
    /// the base URL with exactly one slash between them.
    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

#[async_trait]
impl CupidFetcher for CupidClient {
    async fn fetch(&self, method: Method, path: &str, headers: &HeaderMap) -> Result<Bytes> {
        let url = self.url_for(path);

        let mut request = self.client.request(method.clone(), &url).headers(headers.clone());
        if self.connection_close {
            request = request.header(CONNECTION, HeaderValue::from_static("close"));
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        debug!(
            method = %method,
            url = %url,
            status,
            request_id = request_id.as_deref().unwrap_or(""),
            bytes = body.len(),
            "Cupid response"
        );

        classify_response(status, request_id, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let client = CupidClient::new("https://content-api.cupid.travel/").unwrap();
        assert_eq!(
            client.url_for("/v3.0/property/1"),
            "https://content-api.cupid.travel/v3.0/property/1"
        );
        assert_eq!(
            client.url_for("v3.0/property/1"),
            "https://content-api.cupid.travel/v3.0/property/1"
        );
    }

    #[test]
    fn test_absolute_url_passthrough() {
        let client = CupidClient::new("https://content-api.cupid.travel").unwrap();
        assert_eq!(
            client.url_for("http://localhost:8080/v3.0/property/1"),
            "http://localhost:8080/v3.0/property/1"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            CupidClient::new("not a url"),
            Err(CupidError::InvalidBaseUrl(_))
        ));
        assert!(matches!(CupidClient::new(""), Err(CupidError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_config_builders() {
        let config = ClientConfig::default()
            .with_user_agent("cupid-data-sync/1.0")
            .with_timeout(Duration::from_secs(15))
            .with_connection_close(true);
        assert_eq!(config.user_agent, "cupid-data-sync/1.0");
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert!(config.connection_close);

        let defaults = ClientConfig::default();
        assert_eq!(defaults.user_agent, "cupid-client/1.0");
        assert_eq!(defaults.timeout, Duration::from_secs(10));
        assert!(!defaults.connection_close);
    }
}
