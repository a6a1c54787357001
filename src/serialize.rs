//! Versioned import/export of the whole diagram.
//!
//! The portable representation is a `*.diagram.json` envelope:
//! `{version, exportedAt, nodes, edges}`. Export strips transient state
//! (the `selected` flag never serializes). Import is destructive — the
//! live graph is replaced wholesale, never merged — and fails fast before
//! touching the store, so a rejected document leaves the graph unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::layout;
use crate::models::{Edge, Node};
use crate::sanitize;
use crate::store::GraphStore;

/// The file format version this build writes and expects.
pub const FILE_VERSION: u32 = 1;

fn default_version() -> u32 {
    FILE_VERSION
}

/// The on-disk envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramFile {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "Utc::now")]
    pub exported_at: DateTime<Utc>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// What an import found, for the caller to surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub version: u32,
    /// The document's version differs from [`FILE_VERSION`]. The import
    /// proceeded anyway; the caller decides whether to warn the user.
    pub version_mismatch: bool,
    pub nodes: usize,
    pub edges: usize,
}

/// Build the export envelope from the current graph.
pub fn export(store: &GraphStore) -> DiagramFile {
    DiagramFile {
        version: FILE_VERSION,
        exported_at: Utc::now(),
        nodes: store.nodes().to_vec(),
        edges: store.edges().to_vec(),
    }
}

/// Export as a pretty-printed JSON document.
pub fn export_json(store: &GraphStore) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&export(store))
}

/// Parse `json`, sanitize every node's annotation bag and every edge label
/// override, replace the live graph, and run a full layout pass so derived
/// heights match the imported structure no matter what the file claimed.
///
/// Fails with [`GraphError::MalformedImport`] — before any state change —
/// when the document is not JSON, not an object, or its `nodes`/`edges`
/// are not lists. An unknown version is not an error; it is flagged in the
/// returned [`ImportReport`].
pub fn import(store: &mut GraphStore, json: &str) -> Result<ImportReport, GraphError> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| GraphError::MalformedImport(format!("invalid JSON: {e}")))?;

    let Some(object) = value.as_object() else {
        return Err(GraphError::MalformedImport(
            "document is not an object".to_string(),
        ));
    };
    for field in ["nodes", "edges"] {
        if !object.get(field).is_some_and(serde_json::Value::is_array) {
            return Err(GraphError::MalformedImport(format!(
                "missing {field} list"
            )));
        }
    }

    let file: DiagramFile = serde_json::from_value(value)
        .map_err(|e| GraphError::MalformedImport(format!("could not parse document: {e}")))?;

    let version_mismatch = file.version != FILE_VERSION;
    if version_mismatch {
        tracing::warn!(
            found = file.version,
            expected = FILE_VERSION,
            "diagram file version differs, loading anyway"
        );
    }

    let mut nodes = file.nodes;
    for node in &mut nodes {
        sanitize::sanitize_node_data(&mut node.data);
    }
    let mut edges = file.edges;
    for edge in &mut edges {
        if let Some(data) = &mut edge.data {
            if let Some(label) = data.label.take() {
                let cleaned = sanitize::sanitize_label(&label);
                if !cleaned.is_empty() {
                    data.label = Some(cleaned);
                }
            }
        }
    }

    let report = ImportReport {
        version: file.version,
        version_mismatch,
        nodes: nodes.len(),
        edges: edges.len(),
    };
    store.replace(nodes, edges);
    layout::layout_all(store);
    tracing::debug!(nodes = report.nodes, edges = report.edges, "imported diagram");
    Ok(report)
}
