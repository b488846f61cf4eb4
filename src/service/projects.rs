//! Project service: projects, users, roles, invitations, validation

use super::PollCadence;
use crate::error::{Error, Result};
use crate::model::{
    CreatedInvitations, Invitation, Project, Role, RoleUris, UriResponse, User,
    UsersUpdateResult, ValidationResults, ValidationTypes,
};
use crate::paging::{collect_all, Page, PagedItems};
use crate::poll::{FutureResult, JsonPollHandler};
use crate::rest::{RequestConfig, RestClient};
use crate::validate::not_empty;
use serde_json::json;
use tracing::debug;

/// Service for project lifecycle, membership and validation
#[derive(Debug, Clone)]
pub struct ProjectService {
    client: RestClient,
    cadence: PollCadence,
}

impl ProjectService {
    pub(crate) fn new(client: RestClient, cadence: PollCadence) -> Self {
        Self { client, cadence }
    }

    /// All projects visible to the given account
    pub async fn list_projects(&self, account_id: &str) -> Result<Vec<Project>> {
        let account_id = not_empty(account_id, "account_id")?;
        collect_all(
            &self.client,
            format!("/api/account/profile/{account_id}/projects"),
        )
        .await
    }

    /// Create a project.
    ///
    /// The server provisions the project asynchronously; the returned
    /// job polls the project resource until it leaves the preparing
    /// states, then requires it to be enabled.
    pub async fn create_project(&self, project: &Project) -> Result<FutureResult<Project>> {
        not_empty(&project.title, "project.title")?;
        crate::validate::not_empty_opt(project.auth_token.as_deref(), "project.auth_token")?;

        let created: UriResponse = self
            .client
            .post_json("/api/projects", serde_json::to_value(project)?)
            .await?;
        debug!(uri = %created.uri, "Project accepted");

        let handler = JsonPollHandler::new(
            "project creation",
            |project: &Project| !project.is_preparing(),
            |project: Project| {
                if project.is_enabled() {
                    Ok(project)
                } else {
                    Err(Error::task_failed(
                        "project creation",
                        vec![format!("project ended in state {:?}", project.state)],
                    ))
                }
            },
        )
        .map_transport_error({
            let uri = created.uri.clone();
            move |e| {
                if e.is_not_found_status() {
                    Error::ProjectNotFound { uri: uri.clone() }
                } else {
                    e
                }
            }
        });

        Ok(self.cadence.future(self.client.clone(), created.uri, handler))
    }

    /// Project by id
    pub async fn project_by_id(&self, id: &str) -> Result<Project> {
        let id = not_empty(id, "id")?;
        self.project_by_uri(&format!("/api/projects/{id}")).await
    }

    /// Project by URI
    pub async fn project_by_uri(&self, uri: &str) -> Result<Project> {
        let uri = not_empty(uri, "uri")?;
        self.client.get_json(uri).await.map_err(|e| {
            if e.is_not_found_status() {
                Error::ProjectNotFound {
                    uri: uri.to_string(),
                }
            } else {
                e
            }
        })
    }

    /// Delete a project
    pub async fn delete_project(&self, project: &Project) -> Result<()> {
        let uri = project
            .uri
            .as_deref()
            .ok_or_else(|| Error::validation("project has no uri"))?;
        self.client.delete(uri).await?;
        Ok(())
    }

    /// Validation types the platform can run against a project
    pub async fn available_validations(&self, project_id: &str) -> Result<ValidationTypes> {
        let project_id = not_empty(project_id, "project_id")?;
        self.client
            .get_json(&format!("/api/md/{project_id}/validate"))
            .await
    }

    /// Run the given validations against a project.
    ///
    /// The status resource may move mid-run; polling follows the
    /// `Location` header. The terminal 200 body is the validation
    /// report itself.
    pub async fn validate_project(
        &self,
        project_id: &str,
        validations: &ValidationTypes,
    ) -> Result<FutureResult<ValidationResults>> {
        let project_id = not_empty(project_id, "project_id")?;

        let task: UriResponse = self
            .client
            .post_json(
                &format!("/api/md/{project_id}/validate"),
                serde_json::to_value(validations)?,
            )
            .await?;

        let handler = JsonPollHandler::new(
            "project validation",
            |_: &ValidationResults| true,
            Ok,
        );
        Ok(self.cadence.future(self.client.clone(), task.uri, handler))
    }

    /// All users of a project
    pub async fn list_users(&self, project_id: &str) -> Result<Vec<User>> {
        let project_id = not_empty(project_id, "project_id")?;
        collect_all(&self.client, format!("/api/projects/{project_id}/users")).await
    }

    /// One page of a project's users
    pub async fn list_users_page(
        &self,
        project_id: &str,
        page: Page,
    ) -> Result<PagedItems<User>> {
        let project_id = not_empty(project_id, "project_id")?;
        self.client
            .get_json_with_config(
                &format!("/api/projects/{project_id}/users"),
                page.apply(RequestConfig::new()),
            )
            .await
    }

    /// One user's membership in a project
    pub async fn user_in_project(&self, project_id: &str, account_id: &str) -> Result<User> {
        let project_id = not_empty(project_id, "project_id")?;
        let account_id = not_empty(account_id, "account_id")?;
        self.client
            .get_json(&format!("/api/projects/{project_id}/users/{account_id}"))
            .await
            .map_err(|e| {
                if e.is_not_found_status() {
                    Error::UserNotInProject {
                        account_id: account_id.to_string(),
                    }
                } else {
                    e
                }
            })
    }

    /// Add an account to a project with the given roles
    pub async fn add_user(&self, project_id: &str, user: &User) -> Result<()> {
        let project_id = not_empty(project_id, "project_id")?;
        not_empty(&user.account_id, "user.account_id")?;
        self.client
            .post(
                &format!("/api/projects/{project_id}/users"),
                serde_json::to_value(user)?,
            )
            .await?;
        Ok(())
    }

    /// Update memberships in bulk.
    ///
    /// The server applies updates independently; any failed account id
    /// turns the whole call into an error naming the failures.
    pub async fn update_users(&self, project_id: &str, users: &[User]) -> Result<()> {
        let project_id = not_empty(project_id, "project_id")?;
        crate::validate::non_empty_slice(users, "users")?;

        let result: UsersUpdateResult = self
            .client
            .post_json(
                &format!("/api/projects/{project_id}/users"),
                json!({ "users": users }),
            )
            .await?;

        if result.failed.is_empty() {
            Ok(())
        } else {
            Err(Error::task_failed("project users update", result.failed))
        }
    }

    /// All roles defined in a project
    pub async fn roles(&self, project_id: &str) -> Result<Vec<Role>> {
        let project_id = not_empty(project_id, "project_id")?;
        let uris: RoleUris = self
            .client
            .get_json(&format!("/api/projects/{project_id}/roles"))
            .await?;

        let mut roles = Vec::with_capacity(uris.roles.len());
        for uri in &uris.roles {
            roles.push(self.role_by_uri(uri).await?);
        }
        Ok(roles)
    }

    /// Role by URI
    pub async fn role_by_uri(&self, uri: &str) -> Result<Role> {
        let uri = not_empty(uri, "uri")?;
        let mut role: Role = self.client.get_json(uri).await.map_err(|e| {
            if e.is_not_found_status() {
                Error::RoleNotFound {
                    uri: uri.to_string(),
                }
            } else {
                e
            }
        })?;
        // The role document does not echo its own URI
        role.uri.get_or_insert_with(|| uri.to_string());
        Ok(role)
    }

    /// Invite an email address into a project
    pub async fn invite(
        &self,
        project_id: &str,
        invitation: &Invitation,
    ) -> Result<CreatedInvitations> {
        let project_id = not_empty(project_id, "project_id")?;
        not_empty(&invitation.email, "invitation.email")?;
        self.client
            .post_json(
                &format!("/api/projects/{project_id}/invitations"),
                json!({ "invitations": [invitation] }),
            )
            .await
    }
}
