//! Kernel DTOs

use serde::{Deserialize, Serialize};

use crate::domain::workspace::WorkspaceDescription;

/// Request to register a new workspace rooted at a directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkspace {
    pub root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkspaceResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeWorkspacesResponse {
    pub workspaces: Vec<WorkspaceDescription>,
}
