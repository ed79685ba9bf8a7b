//! HTTP client for the Google Generative Language API.
//!
//! This module provides [`PalmClient`], the entry point for talking to the
//! Generative Language REST surface (`v1beta2`). The client owns the base
//! URL, the API key, and the HTTP transport; every outgoing request carries
//! the key as the `key` query parameter.
//!
//! # Examples
//!
//! ```rust,no_run
//! use google_palm_core::client::PalmClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PalmClient::new("your-api-key")?;
//! let response = client.get("v1beta2/models").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Overriding the endpoint
//!
//! The production endpoint is fixed, but tests point the client at a mock
//! server:
//!
//! ```rust,no_run
//! use google_palm_core::client::PalmClient;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PalmClient::builder()
//!     .api_key("your-api-key")
//!     .endpoint("http://127.0.0.1:8080")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use crate::auth::ApiKey;
use crate::error::{PalmError, PalmResult};
use reqwest::Client as HttpClient;
use url::Url;

use std::time::Duration;

/// Production endpoint for the Generative Language API.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/";

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default read/response timeout (60 seconds).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// The client for the Google Generative Language API.
///
/// Holds immutable per-client configuration: the endpoint URL, the API key,
/// and the HTTP transport. It is cheaply cloneable and can be shared across
/// threads; no state is mutated between calls.
#[derive(Debug, Clone)]
pub struct PalmClient {
    pub(crate) http: HttpClient,
    pub(crate) endpoint: Url,
    pub(crate) api_key: ApiKey,
}

/// Builder for constructing a [`PalmClient`].
///
/// Use [`PalmClient::builder()`] to create a new builder.
#[derive(Debug, Default)]
pub struct PalmClientBuilder {
    api_key: Option<ApiKey>,
    endpoint: Option<String>,
    http_client: Option<HttpClient>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
}

impl PalmClient {
    /// Create a client for the production endpoint from an API key.
    ///
    /// Equivalent to `PalmClient::builder().api_key(key).build()`.
    pub fn new(api_key: impl Into<String>) -> PalmResult<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Create a new builder for configuring a `PalmClient`.
    pub fn builder() -> PalmClientBuilder {
        PalmClientBuilder::default()
    }

    /// Get the base endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build a full URL for an API path, with the `key` query parameter
    /// already attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined to the endpoint URL.
    pub fn url(&self, path: &str) -> PalmResult<Url> {
        let mut url = self
            .endpoint
            .join(path)
            .map_err(|e| PalmError::InvalidEndpoint(format!("failed to construct URL: {e}")))?;
        url.query_pairs_mut().append_pair("key", self.api_key.expose());
        Ok(url)
    }

    /// Send a GET request to the API.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails at the transport level or the
    /// server returns a non-2xx response.
    pub async fn get(&self, path: &str) -> PalmResult<reqwest::Response> {
        self.get_with_query(path, &[]).await
    }

    /// Send a GET request with additional query parameters.
    ///
    /// The `key` parameter is always attached; `query` holds any extra pairs
    /// (e.g. pagination parameters).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails at the transport level or the
    /// server returns a non-2xx response.
    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> PalmResult<reqwest::Response> {
        let mut url = self.url(path)?;
        for (name, value) in query {
            url.query_pairs_mut().append_pair(name, value);
        }

        tracing::debug!(%path, "sending GET request");
        let response = self.http.get(url).send().await?;
        Self::check_response(response).await
    }

    /// Send a POST request with a JSON body to the API.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, the request fails at the
    /// transport level, or the server returns a non-2xx response.
    pub async fn post<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> PalmResult<reqwest::Response> {
        let url = self.url(path)?;

        tracing::debug!(%path, "sending POST request");
        let response = self.http.post(url).json(body).send().await?;
        Self::check_response(response).await
    }

    /// Maximum length for error messages surfaced to callers.
    const MAX_ERROR_MESSAGE_LEN: usize = 1000;

    /// Redact the `key` query parameter from a message.
    ///
    /// The API key travels in the URL, so transport errors and echoed
    /// request URLs can leak it into error text and logs.
    pub(crate) fn sanitize_error_message(msg: &str) -> String {
        let mut result = msg.to_string();

        let mut search_start = 0;
        while search_start < result.len() {
            let Some(relative_pos) = result[search_start..].find("key=") else {
                break;
            };
            let key_pos = search_start + relative_pos;

            // Only redact an actual query parameter, not e.g. "monkey=".
            let at_boundary = key_pos == 0
                || matches!(result.as_bytes()[key_pos - 1], b'?' | b'&');
            if !at_boundary {
                search_start = key_pos + 4;
                continue;
            }

            let value_start = key_pos + 4;
            let value_end = result[value_start..]
                .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
                .map(|pos| value_start + pos)
                .unwrap_or(result.len());

            if value_end > value_start {
                result.replace_range(value_start..value_end, "[REDACTED]");
                search_start = value_start + 10; // "[REDACTED]" is 10 chars
            } else {
                search_start = value_start;
            }
        }

        result
    }

    /// Truncate a message if it exceeds the maximum length.
    /// Also sanitizes the API key before truncating.
    pub(crate) fn truncate_message(msg: &str) -> String {
        let sanitized = Self::sanitize_error_message(msg);

        if sanitized.len() > Self::MAX_ERROR_MESSAGE_LEN {
            // Back off to a char boundary so the cut never lands inside a
            // multi-byte UTF-8 sequence.
            let mut cut = Self::MAX_ERROR_MESSAGE_LEN;
            while !sanitized.is_char_boundary(cut) {
                cut -= 1;
            }
            format!("{}... (truncated)", &sanitized[..cut])
        } else {
            sanitized
        }
    }

    /// Check the response status and return an error if not successful.
    ///
    /// Non-2xx responses are converted into [`PalmError::Api`] when the body
    /// carries a Google error payload (`{"error": {"status", "message"}}`),
    /// otherwise [`PalmError::Http`] with the raw body.
    async fn check_response(response: reqwest::Response) -> PalmResult<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();

            if let Ok(error) = serde_json::from_str::<serde_json::Value>(&body) {
                if let Some(err_obj) = error.get("error") {
                    return Err(PalmError::Api {
                        status: err_obj
                            .get("status")
                            .and_then(|s| s.as_str())
                            .unwrap_or("UNKNOWN")
                            .to_string(),
                        message: Self::truncate_message(
                            err_obj
                                .get("message")
                                .and_then(|m| m.as_str())
                                .unwrap_or(&body),
                        ),
                    });
                }
            }

            Err(PalmError::Http {
                status,
                message: Self::truncate_message(&body),
            })
        }
    }
}

impl PalmClientBuilder {
    /// Set the API key sent as the `key` query parameter.
    ///
    /// If not set, the builder reads the `PALM_API_KEY` environment variable.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(ApiKey::new(api_key));
        self
    }

    /// Override the base endpoint URL.
    ///
    /// Defaults to [`DEFAULT_ENDPOINT`]. Mainly useful for pointing tests at
    /// a mock server.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set a custom HTTP client.
    ///
    /// Use this to configure proxies or other HTTP settings.
    ///
    /// **Note:** If you provide a custom HTTP client, any timeout
    /// configuration via [`connect_timeout`](Self::connect_timeout) or
    /// [`read_timeout`](Self::read_timeout) is ignored.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set the connection timeout.
    ///
    /// This is the maximum time allowed for establishing a connection to the
    /// server. Defaults to [`DEFAULT_CONNECT_TIMEOUT`].
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout.
    ///
    /// This is the maximum time allowed for the whole request/response cycle,
    /// including reading the body. Defaults to [`DEFAULT_READ_TIMEOUT`].
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Build the `PalmClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No API key is provided and `PALM_API_KEY` is not set
    /// - The endpoint URL is invalid
    pub fn build(self) -> PalmResult<PalmClient> {
        let http = self.http_client.unwrap_or_else(|| {
            let connect_timeout = self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
            let read_timeout = self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT);

            reqwest::Client::builder()
                .connect_timeout(connect_timeout)
                .timeout(read_timeout)
                .build()
                .expect("failed to build HTTP client")
        });

        let api_key = self.api_key.map(Ok).unwrap_or_else(ApiKey::from_env)?;

        let endpoint_str = self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(&endpoint_str)
            .map_err(|e| PalmError::InvalidEndpoint(format!("invalid endpoint URL: {e}")))?;

        Ok(PalmClient {
            http,
            endpoint,
            api_key,
        })
    }
}
