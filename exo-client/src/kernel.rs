//! Kernel endpoints
//!
//! Operations that are not scoped to any workspace.

use exo_core::domain::kernel::VersionInfo;
use exo_core::domain::workspace::WorkspaceDescription;
use exo_core::dto::kernel::{CreateWorkspace, CreateWorkspaceResponse, DescribeWorkspacesResponse};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::RpcClient;
use crate::error::Result;

/// Client for `/kernel/*` methods
#[derive(Debug, Clone)]
pub struct KernelClient {
    rpc: RpcClient,
}

impl KernelClient {
    pub(crate) fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }

    /// Transport this client sends through
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    async fn invoke<T: DeserializeOwned>(&self, method: &str, body: Value) -> Result<T> {
        let path = format!("/kernel/{}", method);
        self.rpc.invoke(&path, &[], Some(&body)).await
    }

    // =============================================================================
    // Workspaces
    // =============================================================================

    /// List every workspace known to the service
    pub async fn describe_workspaces(&self) -> Result<Vec<WorkspaceDescription>> {
        let response: DescribeWorkspacesResponse =
            self.invoke("describe-workspaces", json!({})).await?;
        Ok(response.workspaces)
    }

    /// Register a workspace rooted at `root`
    ///
    /// # Returns
    /// The id of the new workspace
    ///
    /// # Example
    /// ```no_run
    /// # use exo_client::RpcClient;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = RpcClient::new("http://localhost:4000/_exo");
    /// let id = client.kernel().create_workspace("/home/me/project").await?;
    /// let processes = client.workspace(id).describe_processes().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_workspace(&self, root: impl Into<String>) -> Result<String> {
        let body = serde_json::to_value(CreateWorkspace { root: root.into() })?;
        let response: CreateWorkspaceResponse = self.invoke("create-workspace", body).await?;
        Ok(response.id)
    }

    // =============================================================================
    // Service
    // =============================================================================

    pub async fn get_version(&self) -> Result<VersionInfo> {
        self.invoke("get-version", json!({})).await
    }

    /// Ask the service to upgrade itself to the latest version
    pub async fn upgrade(&self) -> Result<()> {
        let _: Value = self.invoke("upgrade", json!({})).await?;
        Ok(())
    }
}
