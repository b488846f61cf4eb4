//! Partial metadata export/import service

use super::PollCadence;
use crate::error::Result;
use crate::model::{ExportArtifact, ExportToken, PartialExport, PartialImport, UriResponse};
use crate::poll::{FutureResult, TaskPollHandler};
use crate::rest::RestClient;
use crate::validate::{non_empty_slice, not_empty};
use tracing::debug;

/// Service moving metadata objects between projects via export tokens
#[derive(Debug, Clone)]
pub struct ExportImportService {
    client: RestClient,
    cadence: PollCadence,
}

impl ExportImportService {
    pub(crate) fn new(client: RestClient, cadence: PollCadence) -> Self {
        Self { client, cadence }
    }

    /// Export the given objects from a project.
    ///
    /// The token is issued at submission but only redeemable once the
    /// job finishes; the returned job resolves to it on success and
    /// surfaces the server's messages on failure.
    pub async fn partial_export(
        &self,
        project_id: &str,
        export: &PartialExport,
    ) -> Result<FutureResult<ExportToken>> {
        let project_id = not_empty(project_id, "project_id")?;
        non_empty_slice(&export.uris, "export.uris")?;

        let artifact: ExportArtifact = self
            .client
            .post_json(
                &format!("/api/md/{project_id}/maintenance/partialmdexport"),
                serde_json::to_value(export)?,
            )
            .await?;
        debug!(status_uri = %artifact.status_uri, "Partial export accepted");

        let token = ExportToken {
            token: artifact.token,
            import_attribute_properties: export.export_attribute_properties,
        };
        let handler =
            TaskPollHandler::new("partial metadata export", move |_| Ok(token));
        Ok(self
            .cadence
            .future(self.client.clone(), artifact.status_uri, handler))
    }

    /// Import a previously exported token into a project
    pub async fn partial_import(
        &self,
        project_id: &str,
        import: &PartialImport,
    ) -> Result<FutureResult<()>> {
        let project_id = not_empty(project_id, "project_id")?;
        not_empty(&import.token, "import.token")?;

        let accepted: UriResponse = self
            .client
            .post_json(
                &format!("/api/md/{project_id}/maintenance/partialmdimport"),
                serde_json::to_value(import)?,
            )
            .await?;
        debug!(status_uri = %accepted.uri, "Partial import accepted");

        Ok(self.cadence.future(
            self.client.clone(),
            accepted.uri,
            TaskPollHandler::unit("partial metadata import"),
        ))
    }
}
