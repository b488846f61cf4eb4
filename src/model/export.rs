//! Partial metadata export/import resources

use serde::{Deserialize, Serialize};

/// Request to export a set of metadata objects from a project
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialExport {
    /// URIs of the objects to export
    pub uris: Vec<String>,
    /// Make the token redeemable in any data center
    pub cross_data_center_export: bool,
    /// Include attribute properties so they can be cloned on import
    pub export_attribute_properties: bool,
}

impl PartialExport {
    /// Export request for the given object URIs
    pub fn new(uris: Vec<String>) -> Self {
        Self {
            uris,
            cross_data_center_export: false,
            export_attribute_properties: false,
        }
    }

    /// Make the token redeemable in any data center
    #[must_use]
    pub fn cross_data_center(mut self) -> Self {
        self.cross_data_center_export = true;
        self
    }

    /// Include attribute properties
    #[must_use]
    pub fn with_attribute_properties(mut self) -> Self {
        self.export_attribute_properties = true;
        self
    }
}

/// Response to an export submission: the token plus the task to poll
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportArtifact {
    /// Token identifying the export once the task completes
    pub token: String,
    /// Status URI of the export task
    pub status_uri: String,
}

/// Token identifying a completed partial export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportToken {
    /// The export token
    pub token: String,
    /// Whether the export carries attribute properties
    #[serde(default)]
    pub import_attribute_properties: bool,
}

impl ExportToken {
    /// Token without attribute properties
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            import_attribute_properties: false,
        }
    }
}

/// Request to import a partial export into a project
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialImport {
    /// Token identifying the export
    pub token: String,
    /// Overwrite newer objects without checking modification time
    pub overwrite_newer: bool,
    /// Update names/descriptions of related model objects
    pub update_ldm_objects: bool,
    /// Clone attribute properties carried by the export
    pub import_attribute_properties: bool,
}

impl PartialImport {
    /// Import request for the given export token
    pub fn new(token: &ExportToken) -> Self {
        Self {
            token: token.token.clone(),
            overwrite_newer: false,
            update_ldm_objects: false,
            import_attribute_properties: token.import_attribute_properties,
        }
    }

    /// Overwrite newer objects
    #[must_use]
    pub fn overwrite_newer(mut self) -> Self {
        self.overwrite_newer = true;
        self
    }

    /// Update related model objects
    #[must_use]
    pub fn update_ldm_objects(mut self) -> Self {
        self.update_ldm_objects = true;
        self
    }
}
