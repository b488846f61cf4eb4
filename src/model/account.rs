//! Account resources

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Path segment addressing the account of the current session
pub const CURRENT_ACCOUNT_ID: &str = "current";

/// A platform account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Account id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Login (email)
    pub login: String,
    /// Given name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// When the account was created
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// When the account was last updated
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
}
