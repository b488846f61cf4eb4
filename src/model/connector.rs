//! Connector integrations and their process executions

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Supported source connectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorId {
    /// Zendesk ticketing
    Zendesk,
    /// Salesforce CRM
    Salesforce,
    /// HubSpot marketing
    Hubspot,
}

impl ConnectorId {
    /// Path segment used in connector resource URIs
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zendesk => "zendesk",
            Self::Salesforce => "salesforce",
            Self::Hubspot => "hubspot",
        }
    }
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings of one connector type.
///
/// Creating an integration takes the settings object; the connector is
/// derived from the settings type, never passed separately.
pub trait ConnectorSettings: Serialize + DeserializeOwned {
    /// Which connector these settings configure
    const CONNECTOR: ConnectorId;
}

/// Zendesk connector settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZendeskSettings {
    /// Base URL of the Zendesk instance
    pub api_url: String,
}

impl ZendeskSettings {
    /// Settings pointing at the given Zendesk instance
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }
}

impl ConnectorSettings for ZendeskSettings {
    const CONNECTOR: ConnectorId = ConnectorId::Zendesk;
}

/// Salesforce connector settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesforceSettings {
    /// Salesforce instance URL
    pub instance_url: String,
    /// Integration user name
    pub user: String,
}

impl ConnectorSettings for SalesforceSettings {
    const CONNECTOR: ConnectorId = ConnectorId::Salesforce;
}

/// A connector integration attached to a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    /// Project template the integration populates
    pub project_template: String,
    /// Whether scheduled synchronization is active
    #[serde(default = "default_true")]
    pub active: bool,
    /// Integration URI, assigned by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Integration {
    /// Integration request for the given project template
    pub fn new(project_template: impl Into<String>) -> Self {
        Self {
            project_template: project_template.into(),
            active: true,
            uri: None,
        }
    }
}

/// Request to start one synchronization run of an integration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProcessExecution {
    /// Only load data changed since the last run
    #[serde(default)]
    pub incremental: bool,
}

impl ProcessExecution {
    /// Full synchronization run
    pub fn full() -> Self {
        Self { incremental: false }
    }

    /// Incremental synchronization run
    pub fn incremental() -> Self {
        Self { incremental: true }
    }
}

/// Status code of a connector process
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessState {
    /// State code (SCHEDULED, DOWNLOADING, SYNCHRONIZED, ERROR, USER_ERROR, ...)
    pub code: String,
    /// Optional detail token
    #[serde(default)]
    pub detail: Option<String>,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
}

/// Terminal success code of a connector process
pub const PROCESS_SYNCHRONIZED: &str = "SYNCHRONIZED";
/// Terminal platform-failure code of a connector process
pub const PROCESS_ERROR: &str = "ERROR";
/// Terminal user-failure code of a connector process
pub const PROCESS_USER_ERROR: &str = "USER_ERROR";

/// Status of one connector process run
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessStatus {
    /// Current state
    pub status: ProcessState,
    /// When the run started
    #[serde(default)]
    pub started: Option<DateTime<Utc>>,
    /// When the run finished
    #[serde(default)]
    pub finished: Option<DateTime<Utc>>,
    /// Link-rel to URI map; "self" addresses this run
    #[serde(default)]
    pub links: HashMap<String, String>,
}

impl ProcessStatus {
    /// URI of this process run
    pub fn self_link(&self) -> Option<&str> {
        self.links.get("self").map(String::as_str)
    }

    /// True once the run will not change state again
    pub fn is_finished(&self) -> bool {
        matches!(
            self.status.code.as_str(),
            PROCESS_SYNCHRONIZED | PROCESS_ERROR | PROCESS_USER_ERROR
        )
    }

    /// True for terminal failure
    pub fn is_failed(&self) -> bool {
        matches!(
            self.status.code.as_str(),
            PROCESS_ERROR | PROCESS_USER_ERROR
        )
    }

    /// Messages describing a failed run
    pub fn failure_messages(&self) -> Vec<String> {
        [&self.status.detail, &self.status.description]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: &str) -> ProcessStatus {
        serde_json::from_value(serde_json::json!({
            "status": { "code": code },
            "links": { "self": "/api/projects/p1/connectors/zendesk/integration/processes/run1" }
        }))
        .unwrap()
    }

    #[test]
    fn test_process_terminal_states() {
        assert!(status("SYNCHRONIZED").is_finished());
        assert!(!status("SYNCHRONIZED").is_failed());

        assert!(status("ERROR").is_finished());
        assert!(status("ERROR").is_failed());
        assert!(status("USER_ERROR").is_failed());

        assert!(!status("SCHEDULED").is_finished());
        assert!(!status("DOWNLOADING").is_finished());
    }

    #[test]
    fn test_self_link() {
        assert_eq!(
            status("SCHEDULED").self_link(),
            Some("/api/projects/p1/connectors/zendesk/integration/processes/run1")
        );
    }

    #[test]
    fn test_failure_messages() {
        let status: ProcessStatus = serde_json::from_value(serde_json::json!({
            "status": {
                "code": "ERROR",
                "detail": "sync.lockbox",
                "description": "credentials expired"
            }
        }))
        .unwrap();

        let messages = status.failure_messages();
        assert_eq!(messages, vec!["sync.lockbox", "credentials expired"]);
    }

    #[test]
    fn test_connector_id_path_segment() {
        assert_eq!(ConnectorId::Zendesk.as_str(), "zendesk");
        assert_eq!(ConnectorId::Salesforce.to_string(), "salesforce");
        assert_eq!(ZendeskSettings::CONNECTOR, ConnectorId::Zendesk);
    }
}
