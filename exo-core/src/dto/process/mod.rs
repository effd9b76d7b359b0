//! Process DTOs

use serde::{Deserialize, Serialize};

use crate::domain::process::ProcessDescription;

/// Component type tag for process components
pub const PROCESS_COMPONENT_TYPE: &str = "process";

/// Request to create a component
///
/// `spec` is the JSON encoding of the component's spec, sent as a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComponent {
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: String,
    pub spec: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComponentResponse {
    pub id: String,
}

/// Reference to a component by name or id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRef {
    #[serde(rename = "ref")]
    pub reference: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeProcessesResponse {
    pub processes: Vec<ProcessDescription>,
}
