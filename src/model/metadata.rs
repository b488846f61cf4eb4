//! Metadata objects: metrics, reports, query entries, restrictions

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A typed metadata object addressable within a project.
///
/// `CATEGORY` is the query category segment of the object
/// (`/api/md/{project}/query/{category}`).
pub trait MdObject: Serialize + DeserializeOwned {
    /// Query category of this object type
    const CATEGORY: &'static str;

    /// Object URI, present once the object exists server-side
    fn uri(&self) -> Option<&str>;
}

/// A metric defined by an analytical expression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    /// Object URI, assigned by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Stable identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Human-readable title
    pub title: String,
    /// Analytical expression
    pub expression: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Metric {
    /// New metric creation request
    pub fn new(title: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            uri: None,
            identifier: None,
            title: title.into(),
            expression: expression.into(),
            summary: None,
        }
    }
}

impl MdObject for Metric {
    const CATEGORY: &'static str = "metric";

    fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }
}

/// A report over one or more definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Object URI, assigned by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Stable identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Human-readable title
    pub title: String,
    /// URIs of the report definitions
    #[serde(default)]
    pub definitions: Vec<String>,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl MdObject for Report {
    const CATEGORY: &'static str = "report";

    fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }
}

/// One entry in a metadata query result
#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    /// URI of the referenced object
    pub link: String,
    /// Title of the referenced object
    #[serde(default)]
    pub title: Option<String>,
    /// Identifier of the referenced object
    #[serde(default)]
    pub identifier: Option<String>,
    /// Summary of the referenced object
    #[serde(default)]
    pub summary: Option<String>,
    /// Category of the referenced object
    #[serde(default)]
    pub category: Option<String>,
}

/// Result of a metadata category query
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResult {
    /// Matching entries
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// A search restriction applied client-side to query entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restriction {
    /// Match by stable identifier
    Identifier(String),
    /// Match by title
    Title(String),
    /// Match by summary
    Summary(String),
}

impl Restriction {
    /// Match by identifier
    pub fn identifier(value: impl Into<String>) -> Self {
        Self::Identifier(value.into())
    }

    /// Match by title
    pub fn title(value: impl Into<String>) -> Self {
        Self::Title(value.into())
    }

    /// Match by summary
    pub fn summary(value: impl Into<String>) -> Self {
        Self::Summary(value.into())
    }

    /// Does the entry satisfy this restriction?
    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            Self::Identifier(value) => entry.identifier.as_deref() == Some(value),
            Self::Title(value) => entry.title.as_deref() == Some(value),
            Self::Summary(value) => entry.summary.as_deref() == Some(value),
        }
    }
}

/// Identifier-to-URI mapping request
#[derive(Debug, Clone, Serialize)]
pub struct IdentifierQuery {
    /// Identifiers to resolve
    pub identifiers: Vec<String>,
}

/// One resolved identifier
#[derive(Debug, Clone, Deserialize)]
pub struct IdentifierAndUri {
    /// The queried identifier
    pub identifier: String,
    /// Resolved object URI
    pub uri: String,
}

/// Identifier-to-URI mapping response
#[derive(Debug, Clone, Deserialize)]
pub struct IdentifiersAndUris {
    /// Resolved pairs; unresolvable identifiers are absent
    #[serde(default)]
    pub identifiers: Vec<IdentifierAndUri>,
}

/// Usage query request: which objects use the given ones
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsedByQuery {
    /// URIs of the objects to look up
    pub uris: Vec<String>,
    /// Only report nearest users instead of the transitive closure
    pub nearest: bool,
}

/// Usage of one queried object
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    /// URI of the queried object
    pub uri: String,
    /// Objects using it
    #[serde(default)]
    pub used_by: Vec<Entry>,
}

/// Usage query response
#[derive(Debug, Clone, Deserialize)]
pub struct Usages {
    /// One usage record per queried URI
    #[serde(default)]
    pub usages: Vec<Usage>,
}
