//! Data-transfer objects for the platform's REST resources
//!
//! All types (de)serialize the platform's JSON wire format with serde.
//! Server-assigned fields are optional and skipped in requests.

pub mod account;
pub mod connector;
pub mod export;
pub mod metadata;
pub mod project;
pub mod task;

pub use account::{Account, CURRENT_ACCOUNT_ID};
pub use connector::{
    ConnectorId, ConnectorSettings, Integration, ProcessExecution, ProcessState, ProcessStatus,
    SalesforceSettings, ZendeskSettings,
};
pub use export::{ExportArtifact, ExportToken, PartialExport, PartialImport};
pub use metadata::{
    Entry, IdentifierAndUri, IdentifierQuery, IdentifiersAndUris, MdObject, Metric, QueryResult,
    Report, Restriction, Usage, Usages, UsedByQuery,
};
pub use project::{
    CreatedInvitations, Invitation, Project, ProjectState, Role, RoleUris, User, UsersUpdateResult,
    ValidationIssue, ValidationResults, ValidationTypes,
};
pub use task::{AsyncTask, TaskState, TaskStatus, UriResponse};
