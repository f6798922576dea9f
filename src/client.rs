//! HTTP transport for the Prometheus API.
//!
//! A thin wrapper: joins an endpoint's path onto the configured base URL,
//! performs the GET, and decodes the JSON envelope. No retries, no caching.

use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::api::{Endpoint, InstantQuery, RangeQuery};
use crate::error::{PromtableError, Result};
use crate::response::QueryResponse;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for a Prometheus-compatible HTTP API.
#[derive(Debug, Clone)]
pub struct PromClient {
    base_url: Url,
    client: Client,
    token: Option<String>,
}

impl PromClient {
    /// Creates a client for the given base URL
    /// (e.g. `http://localhost:9090`).
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client with a custom request timeout.
    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| PromtableError::http(format!("Invalid base URL: {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PromtableError::http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            client,
            token: None,
        })
    }

    /// Attaches an authorization header value, passed through opaquely
    /// (the client never inspects it).
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Starts an instant query against this client's backend.
    pub fn query(&self, query: impl Into<String>) -> InstantQuery {
        InstantQuery::new(query)
    }

    /// Starts a range query against this client's backend.
    pub fn query_range(
        &self,
        query: impl Into<String>,
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
        step: impl Into<String>,
    ) -> RangeQuery {
        RangeQuery::new(query, start, end, step)
    }

    /// Resolves the full request URL for an endpoint.
    ///
    /// The endpoint's path is appended to the base URL as-is, so a path
    /// prefix on the base (e.g. Prometheus behind `/prom/`) is kept.
    pub fn request_url(&self, endpoint: &impl Endpoint) -> Result<Url> {
        let path = endpoint.path_and_query()?;
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}"))
            .map_err(|e| PromtableError::http(format!("Invalid request URL: {e}")))
    }

    /// Executes an endpoint's request and decodes the response envelope.
    ///
    /// Returns the envelope even when the server reports an error status;
    /// [`crate::flatten_response`] (or
    /// [`QueryResponse::success_data`]) surfaces that as an error.
    pub async fn execute(&self, endpoint: &impl Endpoint) -> Result<QueryResponse> {
        let url = self.request_url(endpoint)?;
        debug!(%url, "executing query");

        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, token.as_str());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                PromtableError::http("Request timed out")
            } else if e.is_connect() {
                PromtableError::http("Failed to connect to the metrics backend")
            } else {
                PromtableError::http(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PromtableError::http(format!("Failed to read response body: {e}")))?;

        // Prometheus answers 4xx/5xx with the same JSON envelope, so decode
        // first and only fall back to the HTTP status.
        match serde_json::from_str::<QueryResponse>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(PromtableError::api(format!(
                "server returned {status}: {body}"
            ))),
            Err(e) => Err(PromtableError::malformed(format!(
                "cannot decode response: {e}"
            ))),
        }
    }
}
