//! Project resources: projects, users, roles, invitations, validation

use serde::{Deserialize, Serialize};

/// Lifecycle state of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectState {
    /// Being provisioned after creation
    Preparing,
    /// Loading initial data
    Loading,
    /// Ready for use
    Enabled,
    /// Temporarily disabled
    Disabled,
    /// Scheduled for deletion
    Deleted,
    /// Archived, read-only
    Archived,
    /// Any state this SDK version does not know
    #[serde(other)]
    Other,
}

/// An analytics project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project URI, assigned by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Project id, assigned by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Human-readable title
    pub title: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Authorization token consumed at creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    /// Lifecycle state, absent in creation requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ProjectState>,
}

impl Project {
    /// New project creation request
    pub fn new(title: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            uri: None,
            id: None,
            title: title.into(),
            summary: None,
            auth_token: Some(auth_token.into()),
            state: None,
        }
    }

    /// True while the server is still provisioning the project
    pub fn is_preparing(&self) -> bool {
        matches!(
            self.state,
            Some(ProjectState::Preparing | ProjectState::Loading) | None
        )
    }

    /// True once the project is ready for use
    pub fn is_enabled(&self) -> bool {
        matches!(self.state, Some(ProjectState::Enabled))
    }
}

/// A role within a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Role URI; set when fetched by URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Stable role identifier (e.g. "adminRole")
    pub identifier: String,
    /// Human-readable title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// List of role URIs within a project
#[derive(Debug, Clone, Deserialize)]
pub struct RoleUris {
    /// URIs of all roles in the project
    pub roles: Vec<String>,
}

/// A user's membership in a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Membership URI within the project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Account id of the member
    pub account_id: String,
    /// Account login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    /// URIs of the roles held in the project
    #[serde(default)]
    pub roles: Vec<String>,
    /// Whether the membership is active
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Membership update request for an account with the given role URIs
    pub fn new(account_id: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            uri: None,
            account_id: account_id.into(),
            login: None,
            roles,
            enabled: true,
        }
    }
}

/// Result of a project users update
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersUpdateResult {
    /// Account ids updated successfully
    #[serde(default)]
    pub successful: Vec<String>,
    /// Account ids that failed to update
    #[serde(default)]
    pub failed: Vec<String>,
}

/// Invitation of an email address into a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    /// Invitee email
    pub email: String,
    /// Role URI granted on acceptance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Invitation {
    /// Invitation for the given email
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: None,
        }
    }

    /// Invitation granting the given role URI
    pub fn with_role(email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: Some(role.into()),
        }
    }
}

/// URIs of created invitations
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedInvitations {
    /// One URI per created invitation
    #[serde(default)]
    pub uris: Vec<String>,
}

/// Validation types available for a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationTypes {
    /// Validation type identifiers (e.g. "metric_filter", "ldm")
    #[serde(default)]
    pub validations: Vec<String>,
}

/// One issue found by project validation
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationIssue {
    /// Which validation produced the issue
    pub category: String,
    /// Human-readable description
    pub message: String,
}

/// Final report of a project validation run
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResults {
    /// True if any validation reported an error
    #[serde(default)]
    pub error_found: bool,
    /// Individual findings
    #[serde(default)]
    pub results: Vec<ValidationIssue>,
}
