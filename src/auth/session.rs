//! Session-token authentication
//!
//! The platform authenticates every request with a session token obtained
//! through a login handshake. The token is fetched lazily on the first
//! request, cached, and refreshed when it expires or the server rejects it.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Header carrying the session token on every authenticated request
pub const SESSION_TOKEN_HEADER: &str = "X-MDN-SessionToken";

/// How the SDK authenticates against the platform
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Login + password handshake against the account login resource
    LoginPassword {
        /// Account login (email)
        login: String,
        /// Account password
        password: String,
    },
    /// A pre-issued API token used directly as the session token
    Token(String),
}

impl Credentials {
    /// Login/password credentials
    pub fn login_password(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self::LoginPassword {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Static API token credentials
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(token.into())
    }
}

/// Cached session token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The session token value
    pub token: String,
    /// When the token expires; None means it does not expire
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        Self {
            token,
            expires_at: Some(Utc::now() + chrono::Duration::seconds(seconds)),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() + chrono::Duration::seconds(30) >= expires_at,
            None => false,
        }
    }
}

/// Provides session tokens for the REST client.
///
/// Cloning is cheap; clones share the token cache.
#[derive(Clone)]
pub struct SessionProvider {
    credentials: Credentials,
    login_url: String,
    cached: Arc<RwLock<Option<CachedToken>>>,
    http: Client,
}

impl SessionProvider {
    /// Create a provider performing the handshake against `login_url`
    pub fn new(credentials: Credentials, login_url: impl Into<String>, http: Client) -> Self {
        Self {
            credentials,
            login_url: login_url.into(),
            cached: Arc::new(RwLock::new(None)),
            http,
        }
    }

    /// Apply the session token header to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.current_token().await?;
        Ok(req.header(SESSION_TOKEN_HEADER, token))
    }

    /// Get a valid session token, logging in if necessary
    pub async fn current_token(&self) -> Result<String> {
        if let Credentials::Token(token) = &self.credentials {
            return Ok(token.clone());
        }

        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached.write().await;

        // Another task may have logged in while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.login().await?;
        let token = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token)
    }

    /// Drop the cached token; the next request logs in again
    pub async fn invalidate(&self) {
        let mut cached = self.cached.write().await;
        *cached = None;
    }

    /// End the server-side session and drop the cached token.
    ///
    /// No-op for static API tokens.
    pub async fn logout(&self) -> Result<()> {
        if matches!(self.credentials, Credentials::Token(_)) {
            return Ok(());
        }

        let token = {
            let cached = self.cached.read().await;
            cached.as_ref().map(|t| t.token.clone())
        };

        if let Some(token) = token {
            let response = self
                .http
                .delete(&self.login_url)
                .header(SESSION_TOKEN_HEADER, token)
                .send()
                .await
                .map_err(Error::Http)?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Auth {
                    message: format!("Logout failed with status {status}: {body}"),
                });
            }
        }

        self.invalidate().await;
        Ok(())
    }

    /// Perform the login handshake
    async fn login(&self) -> Result<CachedToken> {
        let Credentials::LoginPassword { login, password } = &self.credentials else {
            return Err(Error::auth("Login handshake requires login/password"));
        };

        debug!("Logging in to {}", self.login_url);

        let response = self
            .http
            .post(&self.login_url)
            .json(&serde_json::json!({
                "login": { "login": login, "password": password }
            }))
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth {
                message: format!("Login failed with status {status}: {body}"),
            });
        }

        let body: LoginResponse = response.json().await.map_err(Error::Http)?;
        let session = body.session;

        Ok(match session.expires_in {
            Some(seconds) => CachedToken::expires_in(session.token, seconds),
            None => CachedToken::new(session.token, None),
        })
    }
}

impl std::fmt::Debug for SessionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionProvider")
            .field("login_url", &self.login_url)
            .finish_non_exhaustive()
    }
}

/// Login handshake response
#[derive(Debug, Deserialize)]
struct LoginResponse {
    session: SessionBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionBody {
    token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    #[allow(dead_code)]
    profile: Option<String>,
}
