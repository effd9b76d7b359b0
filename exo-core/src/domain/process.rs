//! Process domain types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Runtime view of a process component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDescription {
    pub id: String,
    pub name: String,
    pub running: bool,
}

/// Launch specification of a process component
///
/// Sent to the service as JSON text inside the `spec` field of a
/// `create-component` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    pub program: String,
    #[serde(default)]
    pub arguments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<HashMap<String, String>>,
}
