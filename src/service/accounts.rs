//! Account service

use crate::error::{Error, Result};
use crate::model::{Account, CURRENT_ACCOUNT_ID};
use crate::rest::RestClient;
use crate::validate::not_empty;

/// Service for platform accounts and session teardown
#[derive(Debug, Clone)]
pub struct AccountService {
    client: RestClient,
}

impl AccountService {
    pub(crate) fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Account of the current session
    pub async fn current(&self) -> Result<Account> {
        self.account_by_id(CURRENT_ACCOUNT_ID).await
    }

    /// Account by id
    pub async fn account_by_id(&self, id: &str) -> Result<Account> {
        let id = not_empty(id, "id")?;
        self.client
            .get_json(&format!("/api/account/profile/{id}"))
            .await
            .map_err(|e| {
                if e.is_not_found_status() {
                    Error::AccountNotFound { id: id.to_string() }
                } else {
                    e
                }
            })
    }

    /// End the server-side session; no-op for unauthenticated clients
    /// and static API tokens
    pub async fn logout(&self) -> Result<()> {
        match self.client.session() {
            Some(session) => session.logout().await,
            None => Ok(()),
        }
    }
}
