//! Generic REST client
//!
//! Every service operation goes through this client. It handles:
//! - Base URL resolution for templated resource paths
//! - Session-token authentication with one re-login on 401
//! - Automatic retries with configurable backoff, idempotent methods only
//! - Client-side throttling
//! - Response mapping (2xx passes through, 4xx/5xx become typed errors)

use super::throttle::{Throttle, ThrottleConfig};
use crate::auth::SessionProvider;
use crate::error::{Error, Result};
use crate::poll::PollResponse;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff strategy for transport-level retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    /// Same delay between attempts
    Constant,
    /// Delay grows linearly with the attempt count
    Linear,
    /// Delay doubles with each attempt
    #[default]
    Exponential,
}

/// Configuration for the REST client
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Base URL for all relative resource paths
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries for idempotent requests
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff: Backoff,
    /// Throttle configuration; None disables client-side throttling
    pub throttle: Option<ThrottleConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
    /// Max idle pooled connections per host
    pub pool_size: usize,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
            backoff: Backoff::Exponential,
            throttle: Some(ThrottleConfig::default()),
            default_headers: HashMap::new(),
            user_agent: format!("meridian-sdk/{}", env!("CARGO_PKG_VERSION")),
            pool_size: 20,
        }
    }
}

impl RestConfig {
    /// Create a new config builder
    pub fn builder() -> RestConfigBuilder {
        RestConfigBuilder::default()
    }
}

/// Builder for REST client config
#[derive(Default)]
pub struct RestConfigBuilder {
    config: RestConfig,
}

impl RestConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff: Backoff, initial: Duration, max: Duration) -> Self {
        self.config.backoff = backoff;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set throttle config
    pub fn throttle(mut self, config: ThrottleConfig) -> Self {
        self.config.throttle = Some(config);
        self
    }

    /// Disable client-side throttling
    pub fn no_throttle(mut self) -> Self {
        self.config.throttle = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set connection pool size
    pub fn pool_size(mut self, size: usize) -> Self {
        self.config.pool_size = size;
        self
    }

    /// Build the config
    pub fn build(self) -> RestConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: HashMap<String, String>,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body (JSON)
    pub body: Option<Value>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
    /// Override max retries for this request
    pub max_retries: Option<u32>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set max retries
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }
}

struct Inner {
    client: Client,
    config: RestConfig,
    session: Option<SessionProvider>,
    throttle: Option<Throttle>,
}

/// REST client shared by all services of one [`crate::Meridian`] instance.
///
/// Cloning is cheap; clones share the connection pool, throttle and
/// session cache.
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<Inner>,
}

impl RestClient {
    /// Create a new REST client with the given configuration
    pub fn new(config: RestConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Create a client that authenticates through the given session provider
    pub fn with_session(config: RestConfig, session: SessionProvider) -> Result<Self> {
        Self::build(config, Some(session))
    }

    fn build(config: RestConfig, session: Option<SessionProvider>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .pool_max_idle_per_host(config.pool_size)
            .build()?;

        let throttle = config.throttle.as_ref().map(Throttle::new);

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                config,
                session,
                throttle,
            }),
        })
    }

    /// Get the underlying reqwest client
    pub fn http(&self) -> &Client {
        &self.inner.client
    }

    /// Session provider, if the client authenticates
    pub fn session(&self) -> Option<&SessionProvider> {
        self.inner.session.as_ref()
    }

    /// Make a GET request
    pub async fn get(&self, uri: &str) -> Result<Response> {
        self.request(Method::GET, uri, RequestConfig::default())
            .await
    }

    /// Make a GET request and parse the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, uri: &str) -> Result<T> {
        self.request_json(Method::GET, uri, RequestConfig::default())
            .await
    }

    /// Make a GET request with config and parse the JSON response
    pub async fn get_json_with_config<T: DeserializeOwned>(
        &self,
        uri: &str,
        config: RequestConfig,
    ) -> Result<T> {
        self.request_json(Method::GET, uri, config).await
    }

    /// Make a POST request
    pub async fn post(&self, uri: &str, body: Value) -> Result<Response> {
        self.request(Method::POST, uri, RequestConfig::default().json(body))
            .await
    }

    /// Make a POST request and parse the JSON response
    pub async fn post_json<T: DeserializeOwned>(&self, uri: &str, body: Value) -> Result<T> {
        self.request_json(Method::POST, uri, RequestConfig::default().json(body))
            .await
    }

    /// Make a PUT request
    pub async fn put(&self, uri: &str, body: Value) -> Result<Response> {
        self.request(Method::PUT, uri, RequestConfig::default().json(body))
            .await
    }

    /// Make a PUT request and parse the JSON response
    pub async fn put_json<T: DeserializeOwned>(&self, uri: &str, body: Value) -> Result<T> {
        self.request_json(Method::PUT, uri, RequestConfig::default().json(body))
            .await
    }

    /// Make a DELETE request
    pub async fn delete(&self, uri: &str) -> Result<Response> {
        self.request(Method::DELETE, uri, RequestConfig::default())
            .await
    }

    /// One polling step: GET the status URI and decode status, Location
    /// header and JSON body (null for empty bodies) for the poll layer.
    pub async fn poll(&self, uri: &str) -> Result<PollResponse> {
        let response = self.get(uri).await?;
        let status = response.status();
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let text = response.text().await.map_err(Error::Http)?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };
        Ok(PollResponse {
            status,
            location,
            body,
        })
    }

    /// Make a request and parse the JSON response
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        uri: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let response = self.request(method, uri, config).await?;
        let json: T = response.json().await.map_err(Error::Http)?;
        Ok(json)
    }

    /// Make a generic request
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        let full_url = self.resolve(uri);
        let max_retries = config.max_retries.unwrap_or(self.inner.config.max_retries);
        let timeout = config.timeout.unwrap_or(self.inner.config.timeout);
        let retryable_method = is_idempotent(&method);

        let mut last_error = None;
        let mut attempt = 0;
        let mut reauthed = false;

        while attempt <= max_retries {
            if let Some(ref throttle) = self.inner.throttle {
                throttle.acquire().await;
            }

            let mut req = self.inner.client.request(method.clone(), &full_url);

            for (key, value) in &self.inner.config.default_headers {
                req = req.header(key.as_str(), value.as_str());
            }
            for (key, value) in &config.headers {
                req = req.header(key.as_str(), value.as_str());
            }
            if !config.query.is_empty() {
                req = req.query(&config.query);
            }
            if let Some(ref body) = config.body {
                req = req.json(body);
            }
            req = req.timeout(timeout);

            if let Some(ref session) = self.inner.session {
                req = session.apply(req).await?;
            }

            match req.send().await {
                Ok(response) => {
                    let status = response.status();

                    // Stale session token: re-login once, then replay
                    if status == StatusCode::UNAUTHORIZED && !reauthed {
                        if let Some(ref session) = self.inner.session {
                            warn!("Session token rejected (401), re-authenticating");
                            session.invalidate().await;
                            reauthed = true;
                            continue;
                        }
                    }

                    // 429 replays any method, POST included: the server
                    // rejected the request before processing it
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = extract_retry_after(&response);
                        if attempt < max_retries {
                            warn!(
                                "Rate limited (429), attempt {}/{}, waiting {}s",
                                attempt + 1,
                                max_retries + 1,
                                retry_after
                            );
                            tokio::time::sleep(Duration::from_secs(retry_after)).await;
                            attempt += 1;
                            continue;
                        }
                        return Err(Error::RateLimited {
                            retry_after_seconds: retry_after,
                        });
                    }

                    // Server errors retry only for idempotent requests; a
                    // POST submits a job and must never be re-fired.
                    if status.is_server_error() && retryable_method && attempt < max_retries {
                        let delay = self.backoff_delay(attempt);
                        warn!(
                            "Request failed with {}, attempt {}/{}, retrying in {:?}",
                            status.as_u16(),
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        last_error = Some(Error::HttpStatus {
                            status: status.as_u16(),
                            body: String::new(),
                        });
                        continue;
                    }

                    if status.is_client_error() || status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(Error::HttpStatus {
                            status: status.as_u16(),
                            body,
                        });
                    }

                    debug!("Request succeeded: {} {}", method, full_url);
                    return Ok(response);
                }
                Err(e) => {
                    if e.is_timeout() {
                        if retryable_method && attempt < max_retries {
                            let delay = self.backoff_delay(attempt);
                            warn!(
                                "Request timeout, attempt {}/{}, retrying in {:?}",
                                attempt + 1,
                                max_retries + 1,
                                delay
                            );
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                            last_error = Some(Error::Timeout {
                                timeout_ms: timeout.as_millis() as u64,
                            });
                            continue;
                        }
                        return Err(Error::Timeout {
                            timeout_ms: timeout.as_millis() as u64,
                        });
                    }

                    if e.is_connect() && attempt < max_retries {
                        let delay = self.backoff_delay(attempt);
                        warn!(
                            "Connection error, attempt {}/{}, retrying in {:?}",
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        last_error = Some(Error::Http(e));
                        continue;
                    }

                    return Err(Error::Http(e));
                }
            }
        }

        Err(last_error.unwrap_or(Error::MaxRetriesExceeded { max_retries }))
    }

    /// Resolve a resource path against the configured base URL
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.inner.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }

    /// Backoff delay for a given attempt
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let config = &self.inner.config;
        let delay = match config.backoff {
            Backoff::Constant => config.initial_backoff,
            Backoff::Linear => config.initial_backoff * (attempt + 1),
            Backoff::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                config.initial_backoff * factor
            }
        };

        std::cmp::min(delay, config.max_backoff)
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("config", &self.inner.config)
            .field("has_session", &self.inner.session.is_some())
            .field("has_throttle", &self.inner.throttle.is_some())
            .finish_non_exhaustive()
    }
}

fn is_idempotent(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::PUT | Method::DELETE | Method::HEAD
    )
}

/// Extract retry-after header value
fn extract_retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(60)
}
