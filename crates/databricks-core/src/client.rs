//! HTTP client configuration and the shared request/response invocation.
//!
//! [`ApiClient`] implements the single contract every endpoint follows:
//! encode the input, send exactly one request, classify the status, then
//! decode the body or surface the failure.

use crate::error::{Error, Result};
use crate::transport::{HttpRequest, HttpResponse, SharedTransport};
use bytes::Bytes;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// User agent sent by the default transport
pub const DEFAULT_USER_AGENT: &str = concat!("databricks-rs/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration used to build the default transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection establishment timeout
    pub connect_timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable response compression
    pub enable_compression: bool,

    /// User agent header value
    pub user_agent: String,
}

impl HttpConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_compression: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }

    /// Override the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared invocation helper bound to a base URL and a transport.
///
/// Cloning is cheap: clones share the same transport.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    transport: SharedTransport,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create an invocation helper. `base_url` should end with `/`.
    #[must_use]
    pub fn new(base_url: Url, transport: SharedTransport) -> Self {
        Self {
            base_url,
            transport,
        }
    }

    /// Return the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return the transport.
    #[must_use]
    pub const fn transport(&self) -> &SharedTransport {
        &self.transport
    }

    /// Invoke an endpoint and decode its JSON response.
    ///
    /// An empty success body decodes to `R::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the body cannot be serialized,
    /// [`Error::Transport`] if no response was obtained, [`Error::Api`] for any
    /// status outside `200..=299` and [`Error::Decode`] if the success body does
    /// not match `R`.
    pub async fn invoke<B, R>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned + Default,
    {
        let response = self.send(method, path, query, body).await?;
        decode_json(path, &response.body)
    }

    /// GET with query parameters, decoding the JSON response.
    pub async fn get_json<R>(&self, path: &str, query: &[(&'static str, String)]) -> Result<R>
    where
        R: DeserializeOwned + Default,
    {
        self.invoke::<(), R>(Method::GET, path, query, None).await
    }

    /// POST a JSON body, decoding the JSON response.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned + Default,
    {
        self.invoke(Method::POST, path, &[], Some(body)).await
    }

    /// POST a JSON body to a mutation-only endpoint; any response body is ignored.
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.send(Method::POST, path, &[], Some(body))
            .await
            .map(|_| ())
    }

    /// GET returning the raw success body.
    pub async fn get_bytes(&self, path: &str, query: &[(&'static str, String)]) -> Result<Bytes> {
        self.send::<()>(Method::GET, path, query, None)
            .await
            .map(|response| response.body)
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<HttpResponse>
    where
        B: Serialize + Sync + ?Sized,
    {
        let request = self.build_request(method, path, query, body)?;
        debug!(method = %request.method, path = %path, "sending Databricks request");

        let response = self.transport.execute(request).await?;

        if !response.is_success() {
            warn!(status = response.status, path = %path, "Databricks request failed");
            return Err(Error::Api {
                status: response.status,
                body: response.text_lossy(),
            });
        }

        debug!(status = response.status, path = %path, "Databricks request succeeded");
        Ok(response)
    }

    fn build_request<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<HttpRequest>
    where
        B: Serialize + ?Sized,
    {
        let mut url = self.build_url(path)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
        }

        let mut request = HttpRequest::new(method, url);
        request
            .headers
            .insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(payload) = body {
            let raw = serde_json::to_vec(payload).map_err(|err| Error::Encode(err.to_string()))?;
            request
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            request.body = Some(Bytes::from(raw));
        }

        Ok(request)
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid path `{path}`: {err}")))
    }
}

fn decode_json<R>(path: &str, body: &[u8]) -> Result<R>
where
    R: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(R::default());
    }

    serde_json::from_slice(body)
        .map_err(|err| Error::Decode(format!("Failed to parse response for `{path}`: {err}")))
}
