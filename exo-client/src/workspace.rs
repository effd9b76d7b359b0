//! Workspace endpoints
//!
//! Every call carries the workspace id as the `id` query parameter.

use async_trait::async_trait;
use exo_core::domain::log::LogDescription;
use exo_core::domain::process::{ProcessDescription, ProcessSpec};
use exo_core::domain::workspace::WorkspaceDescription;
use exo_core::dto::log::{
    DescribeLogs, DescribeLogsResponse, GetEvents, GetEventsResponse, Pagination,
};
use exo_core::dto::process::{
    ComponentRef, CreateComponent, CreateComponentResponse, DescribeProcessesResponse,
    PROCESS_COMPONENT_TYPE,
};
use exo_core::dto::workspace::{Apply, DescribeWorkspaceResponse};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::RpcClient;
use crate::error::Result;
use crate::logs::EventSource;

/// Client for `/workspace/*` methods of one workspace
#[derive(Debug, Clone)]
pub struct WorkspaceClient {
    rpc: RpcClient,
    id: String,
}

impl WorkspaceClient {
    pub(crate) fn new(rpc: RpcClient, id: impl Into<String>) -> Self {
        Self { rpc, id: id.into() }
    }

    /// Id of the workspace this client is bound to
    pub fn id(&self) -> &str {
        &self.id
    }

    async fn invoke<T: DeserializeOwned>(&self, method: &str, body: Option<Value>) -> Result<T> {
        let path = format!("/workspace/{}", method);
        self.rpc
            .invoke(&path, &[("id", self.id.as_str())], body.as_ref())
            .await
    }

    async fn invoke_ref(&self, method: &str, reference: &str) -> Result<()> {
        let body = serde_json::to_value(ComponentRef {
            reference: reference.to_string(),
        })?;
        let _: Value = self.invoke(method, Some(body)).await?;
        Ok(())
    }

    // =============================================================================
    // Workspace
    // =============================================================================

    pub async fn describe(&self) -> Result<WorkspaceDescription> {
        let response: DescribeWorkspaceResponse = self.invoke("describe", Some(json!({}))).await?;
        Ok(response.description)
    }

    /// Apply a manifest to the workspace
    pub async fn apply(&self, req: Apply) -> Result<()> {
        let _: Value = self.invoke("apply", Some(serde_json::to_value(req)?)).await?;
        Ok(())
    }

    // =============================================================================
    // Processes
    // =============================================================================

    pub async fn describe_processes(&self) -> Result<Vec<ProcessDescription>> {
        let response: DescribeProcessesResponse = self.invoke("describe-processes", None).await?;
        Ok(response.processes)
    }

    /// Create a process component
    ///
    /// # Returns
    /// The id of the new component
    pub async fn create_process(
        &self,
        name: impl Into<String>,
        spec: &ProcessSpec,
    ) -> Result<String> {
        let req = CreateComponent {
            name: name.into(),
            component_type: PROCESS_COMPONENT_TYPE.to_string(),
            spec: serde_json::to_string(spec)?,
        };
        let response: CreateComponentResponse = self
            .invoke("create-component", Some(serde_json::to_value(req)?))
            .await?;
        Ok(response.id)
    }

    pub async fn start_process(&self, reference: &str) -> Result<()> {
        self.invoke_ref("start-component", reference).await
    }

    pub async fn stop_process(&self, reference: &str) -> Result<()> {
        self.invoke_ref("stop-component", reference).await
    }

    pub async fn restart_process(&self, reference: &str) -> Result<()> {
        self.invoke_ref("restart-component", reference).await
    }

    /// Dispose a component and wait for its record to be deleted
    pub async fn delete_component(&self, reference: &str) -> Result<()> {
        self.invoke_ref("delete-component", reference).await
    }

    /// Re-read the runtime state of every component
    pub async fn refresh_all_processes(&self) -> Result<()> {
        let _: Value = self.invoke("refresh-all-components", None).await?;
        Ok(())
    }

    // =============================================================================
    // Logs
    // =============================================================================

    /// Describe the logs of the given component refs (all logs when empty)
    pub async fn describe_logs(&self, refs: Vec<String>) -> Result<Vec<LogDescription>> {
        let body = serde_json::to_value(DescribeLogs { refs })?;
        let response: DescribeLogsResponse = self.invoke("describe-logs", Some(body)).await?;
        Ok(response.logs)
    }

    /// Fetch one page of events from `logs`
    ///
    /// The returned cursor is the input cursor of the next incremental fetch.
    pub async fn get_events(
        &self,
        logs: Vec<String>,
        pagination: Option<Pagination>,
    ) -> Result<GetEventsResponse> {
        let body = serde_json::to_value(GetEvents { logs, pagination })?;
        self.invoke("get-events", Some(body)).await
    }
}

#[async_trait]
impl EventSource for WorkspaceClient {
    async fn get_events(
        &self,
        logs: Vec<String>,
        pagination: Option<Pagination>,
    ) -> Result<GetEventsResponse> {
        WorkspaceClient::get_events(self, logs, pagination).await
    }
}
