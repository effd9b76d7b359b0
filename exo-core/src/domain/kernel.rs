//! Kernel domain types

use serde::{Deserialize, Serialize};

/// Version information reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Version currently running
    pub installed: String,
    /// Latest published version, when the service could determine it
    #[serde(default)]
    pub latest: Option<String>,
    /// Whether `installed` is the latest version
    pub current: bool,
}
