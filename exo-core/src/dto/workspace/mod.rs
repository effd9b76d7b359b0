//! Workspace DTOs

use serde::{Deserialize, Serialize};

use crate::domain::workspace::WorkspaceDescription;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeWorkspaceResponse {
    pub description: WorkspaceDescription,
}

/// Request to apply a manifest to a workspace
///
/// All fields are optional; an empty request applies the manifest found at
/// the workspace root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apply {
    /// One of `exo`, `compose` or `procfile`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Manifest path, possibly relative to the workspace root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_path: Option<String>,
    /// Inline manifest contents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,
}
