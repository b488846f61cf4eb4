//! SDK entry point
//!
//! [`Meridian`] wires the endpoint, credentials and settings into one
//! shared [`RestClient`] and hands out the typed services.

use crate::auth::{Credentials, SessionProvider};
use crate::error::{Error, Result};
use crate::rest::{RestClient, RestConfig};
use crate::service::{
    AccountService, ConnectorService, ExportImportService, MetadataService, PollCadence,
    ProjectService,
};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Path of the login handshake resource
const LOGIN_PATH: &str = "/api/account/login";

/// A validated platform endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Parse and validate an endpoint URL; only http(s) is accepted
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::validation(format!(
                "endpoint scheme must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(Error::validation("endpoint has no host"));
        }
        Ok(Self { url })
    }

    /// The endpoint as a string, without trailing slash
    pub fn as_str(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }

    /// Absolute URL of the login handshake resource
    pub fn login_url(&self) -> String {
        format!("{}{LOGIN_PATH}", self.as_str())
    }
}

/// Client-wide settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Initial delay between job polls
    pub poll_interval: Duration,
    /// Cap for the linearly growing poll delay
    pub max_poll_interval: Duration,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum retries for idempotent requests
    pub max_retries: u32,
    /// Max idle pooled connections per host
    pub pool_size: usize,
    /// Override the default user agent
    pub user_agent: Option<String>,
    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            pool_size: 20,
            user_agent: None,
            headers: HashMap::new(),
        }
    }
}

impl Settings {
    /// Create a settings builder
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }
}

/// Builder for [`Settings`]
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    /// Poll cadence: initial delay and its cap
    pub fn poll_interval(mut self, interval: Duration, max_interval: Duration) -> Self {
        self.settings.poll_interval = interval;
        self.settings.max_poll_interval = max_interval;
        self
    }

    /// Request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Maximum retries for idempotent requests
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.settings.max_retries = retries;
        self
    }

    /// Max idle pooled connections per host
    pub fn pool_size(mut self, size: usize) -> Self {
        self.settings.pool_size = size;
        self
    }

    /// Override the default user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.settings.user_agent = Some(agent.into());
        self
    }

    /// Add a header sent with every request
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.headers.insert(key.into(), value.into());
        self
    }

    /// Build the settings
    pub fn build(self) -> Settings {
        self.settings
    }
}

/// Entry point to the platform: one authenticated client plus accessors
/// for each service.
#[derive(Debug, Clone)]
pub struct Meridian {
    client: RestClient,
    projects: ProjectService,
    metadata: MetadataService,
    connectors: ConnectorService,
    exports: ExportImportService,
    accounts: AccountService,
}

impl Meridian {
    /// Connect with default settings
    pub fn connect(endpoint: Endpoint, credentials: Credentials) -> Result<Self> {
        Self::connect_with_settings(endpoint, credentials, Settings::default())
    }

    /// Connect with explicit settings.
    ///
    /// No network call happens here; the login handshake runs lazily on
    /// the first authenticated request.
    pub fn connect_with_settings(
        endpoint: Endpoint,
        credentials: Credentials,
        settings: Settings,
    ) -> Result<Self> {
        let mut config = RestConfig::builder()
            .base_url(endpoint.as_str())
            .timeout(settings.timeout)
            .max_retries(settings.max_retries)
            .pool_size(settings.pool_size);
        if let Some(agent) = &settings.user_agent {
            config = config.user_agent(agent);
        }
        for (key, value) in &settings.headers {
            config = config.header(key, value);
        }

        let session_http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        let session = SessionProvider::new(credentials, endpoint.login_url(), session_http);
        let client = RestClient::with_session(config.build(), session)?;

        Ok(Self::from_client(
            client,
            PollCadence {
                interval: settings.poll_interval,
                max_interval: settings.max_poll_interval,
            },
        ))
    }

    fn from_client(client: RestClient, cadence: PollCadence) -> Self {
        Self {
            projects: ProjectService::new(client.clone(), cadence),
            metadata: MetadataService::new(client.clone()),
            connectors: ConnectorService::new(client.clone(), cadence),
            exports: ExportImportService::new(client.clone(), cadence),
            accounts: AccountService::new(client.clone()),
            client,
        }
    }

    /// Project lifecycle, membership and validation
    pub fn projects(&self) -> &ProjectService {
        &self.projects
    }

    /// Metadata objects and queries
    pub fn metadata(&self) -> &MetadataService {
        &self.metadata
    }

    /// Connector integrations and process runs
    pub fn connectors(&self) -> &ConnectorService {
        &self.connectors
    }

    /// Partial metadata export/import
    pub fn exports(&self) -> &ExportImportService {
        &self.exports
    }

    /// Accounts and session teardown
    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    /// The shared REST client
    pub fn rest_client(&self) -> &RestClient {
        &self.client
    }

    /// End the server-side session
    pub async fn logout(&self) -> Result<()> {
        self.accounts.logout().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_validation() {
        let endpoint = Endpoint::new("https://analytics.example.com").unwrap();
        assert_eq!(endpoint.as_str(), "https://analytics.example.com");
        assert_eq!(
            endpoint.login_url(),
            "https://analytics.example.com/api/account/login"
        );

        assert!(matches!(
            Endpoint::new("ftp://analytics.example.com").unwrap_err(),
            Error::Validation { .. }
        ));
        assert!(Endpoint::new("not a url").is_err());
    }

    #[test]
    fn test_settings_builder() {
        let settings = Settings::builder()
            .poll_interval(Duration::from_millis(200), Duration::from_secs(2))
            .timeout(Duration::from_secs(10))
            .max_retries(1)
            .pool_size(5)
            .user_agent("acme-tooling/1.0")
            .header("X-Request-Source", "ci")
            .build();

        assert_eq!(settings.poll_interval, Duration::from_millis(200));
        assert_eq!(settings.max_retries, 1);
        assert_eq!(settings.user_agent.as_deref(), Some("acme-tooling/1.0"));
        assert_eq!(settings.headers.get("X-Request-Source").unwrap(), "ci");
    }

    #[test]
    fn test_connect_builds_all_services() {
        let endpoint = Endpoint::new("https://analytics.example.com").unwrap();
        let sdk = Meridian::connect(endpoint, Credentials::token("api-token")).unwrap();

        // Accessors exist and share one client
        let _ = sdk.projects();
        let _ = sdk.metadata();
        let _ = sdk.connectors();
        let _ = sdk.exports();
        let _ = sdk.accounts();
        assert!(sdk.rest_client().session().is_some());
    }
}
