//! Workspace domain types

use serde::{Deserialize, Serialize};

/// A workspace registered with the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceDescription {
    pub id: String,
    /// Absolute path of the directory the workspace manages
    pub root: String,
}
