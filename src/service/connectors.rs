//! Connector service: integrations, settings, process execution

use super::PollCadence;
use crate::error::{Error, Result};
use crate::model::{
    ConnectorId, ConnectorSettings, Integration, ProcessExecution, ProcessStatus, UriResponse,
};
use crate::poll::{FutureResult, JsonPollHandler};
use crate::rest::RestClient;
use crate::validate::not_empty;
use tracing::debug;

/// Service for connector integrations and their synchronization runs
#[derive(Debug, Clone)]
pub struct ConnectorService {
    client: RestClient,
    cadence: PollCadence,
}

fn integration_uri(project_id: &str, connector: ConnectorId) -> String {
    format!("/api/projects/{project_id}/connectors/{connector}/integration")
}

fn map_integration_404(e: Error, connector: ConnectorId) -> Error {
    if e.is_not_found_status() {
        Error::IntegrationNotFound {
            connector: connector.as_str().to_string(),
        }
    } else {
        e
    }
}

impl ConnectorService {
    pub(crate) fn new(client: RestClient, cadence: PollCadence) -> Self {
        Self { client, cadence }
    }

    /// Create an integration; the connector is derived from the
    /// settings type, then the settings are stored against it.
    pub async fn create_integration<S: ConnectorSettings>(
        &self,
        project_id: &str,
        integration: &Integration,
        settings: &S,
    ) -> Result<Integration> {
        let project_id = not_empty(project_id, "project_id")?;
        not_empty(&integration.project_template, "integration.project_template")?;

        let created: Integration = self
            .client
            .post_json(
                &integration_uri(project_id, S::CONNECTOR),
                serde_json::to_value(integration)?,
            )
            .await?;
        self.update_settings(project_id, settings).await?;
        Ok(created)
    }

    /// Integration of the given connector in a project
    pub async fn integration(
        &self,
        project_id: &str,
        connector: ConnectorId,
    ) -> Result<Integration> {
        let project_id = not_empty(project_id, "project_id")?;
        self.client
            .get_json(&integration_uri(project_id, connector))
            .await
            .map_err(|e| map_integration_404(e, connector))
    }

    /// Replace an integration
    pub async fn update_integration(
        &self,
        project_id: &str,
        connector: ConnectorId,
        integration: &Integration,
    ) -> Result<Integration> {
        let project_id = not_empty(project_id, "project_id")?;
        self.client
            .put_json(
                &integration_uri(project_id, connector),
                serde_json::to_value(integration)?,
            )
            .await
            .map_err(|e| map_integration_404(e, connector))
    }

    /// Settings of the given connector in a project
    pub async fn settings<S: ConnectorSettings>(&self, project_id: &str) -> Result<S> {
        let project_id = not_empty(project_id, "project_id")?;
        self.client
            .get_json(&format!(
                "{}/settings",
                integration_uri(project_id, S::CONNECTOR)
            ))
            .await
            .map_err(|e| map_integration_404(e, S::CONNECTOR))
    }

    /// Replace the settings of the given connector in a project
    pub async fn update_settings<S: ConnectorSettings>(
        &self,
        project_id: &str,
        settings: &S,
    ) -> Result<()> {
        let project_id = not_empty(project_id, "project_id")?;
        self.client
            .put(
                &format!("{}/settings", integration_uri(project_id, S::CONNECTOR)),
                serde_json::to_value(settings)?,
            )
            .await
            .map_err(|e| map_integration_404(e, S::CONNECTOR))?;
        Ok(())
    }

    /// Start one synchronization run and return the job tracking it.
    ///
    /// The run finishes as `SYNCHRONIZED`, or fails with the server's
    /// detail and description as the task-failure messages.
    pub async fn execute_process(
        &self,
        project_id: &str,
        connector: ConnectorId,
        execution: &ProcessExecution,
    ) -> Result<FutureResult<ProcessStatus>> {
        let project_id = not_empty(project_id, "project_id")?;

        let accepted: UriResponse = self
            .client
            .post_json(
                &format!("{}/processes", integration_uri(project_id, connector)),
                serde_json::to_value(execution)?,
            )
            .await?;
        debug!(connector = %connector, uri = %accepted.uri, "Process run accepted");

        Ok(self.process_future(connector, accepted.uri))
    }

    /// Job tracking an already-running process
    pub async fn process_status(
        &self,
        project_id: &str,
        connector: ConnectorId,
        process_id: &str,
    ) -> Result<FutureResult<ProcessStatus>> {
        let project_id = not_empty(project_id, "project_id")?;
        let process_id = not_empty(process_id, "process_id")?;

        Ok(self.process_future(
            connector,
            format!(
                "{}/processes/{process_id}",
                integration_uri(project_id, connector)
            ),
        ))
    }

    fn process_future(
        &self,
        connector: ConnectorId,
        uri: impl Into<String>,
    ) -> FutureResult<ProcessStatus> {
        let operation = format!("{connector} process");
        let handler = JsonPollHandler::new(
            operation.clone(),
            |status: &ProcessStatus| status.is_finished(),
            move |status: ProcessStatus| {
                if status.is_failed() {
                    Err(Error::task_failed(operation, status.failure_messages()))
                } else {
                    Ok(status)
                }
            },
        )
        .map_transport_error(move |e| map_integration_404(e, connector));

        self.cadence.future(self.client.clone(), uri, handler)
    }
}
