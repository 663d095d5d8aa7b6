// SPDX-License-Identifier: MIT OR Apache-2.0
//! The serializable graph document: the unit exported and imported as a
//! whole.

use crate::comment::Comment;
use crate::edge::Edge;
use crate::node::GraphNode;
use serde::{Deserialize, Serialize};

/// Schema version written by this build
pub const SCHEMA_VERSION: u32 = 2;

/// Oldest schema version import still accepts
pub const MIN_SCHEMA_VERSION: u32 = 1;

/// Document metadata; unknown keys survive a round-trip verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Stable document identity across import/export cycles
    #[serde(
        rename = "projectId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub project_id: Option<String>,
    /// Keys this build does not understand, preserved as-is
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A complete serialized graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument {
    /// Format version, gated on import
    pub schema_version: u32,
    /// Document display name
    pub name: String,
    /// Nodes in document order
    pub nodes: Vec<GraphNode>,
    /// Edges in document order
    pub edges: Vec<Edge>,
    /// Canvas comments
    #[serde(
        default,
        deserialize_with = "lenient_comments",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub comments: Vec<Comment>,
    /// Project identity and passthrough keys
    #[serde(default, skip_serializing_if = "metadata_is_empty")]
    pub metadata: DocumentMetadata,
    /// Unix seconds of the last export
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
}

fn metadata_is_empty(metadata: &DocumentMetadata) -> bool {
    metadata.project_id.is_none() && metadata.extra.is_empty()
}

/// Comments that parse but carry neither anchor are dropped, not fatal.
fn lenient_comments<'de, D>(deserializer: D) -> Result<Vec<Comment>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect())
}

impl GraphDocument {
    /// Create an empty document at the current schema version
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            comments: Vec::new(),
            metadata: DocumentMetadata::default(),
            updated_at: None,
        }
    }

    /// Parse a document from JSON, rejecting unsupported versions.
    ///
    /// This is the one boundary where a failure surfaces to the caller:
    /// malformed external data is a genuine error rather than a UI race.
    pub fn from_json(input: &str) -> Result<Self, DocumentError> {
        let doc: Self = serde_json::from_str(input)?;
        if doc.schema_version < MIN_SCHEMA_VERSION || doc.schema_version > SCHEMA_VERSION {
            return Err(DocumentError::UnsupportedVersion(doc.schema_version));
        }
        Ok(doc)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Error importing or exporting a document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Unparseable JSON
    #[error("Malformed graph document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Version this build does not understand
    #[error("Unsupported schema version: {0}")]
    UnsupportedVersion(u32),
}
