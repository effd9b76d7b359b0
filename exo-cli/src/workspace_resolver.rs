//! Workspace resolver module
//!
//! Picks the workspace a command operates on: either the one named by
//! `--workspace` (full id or unambiguous prefix) or the one rooted at the
//! current directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use exo_client::{RpcClient, WorkspaceClient};
use exo_core::domain::workspace::WorkspaceDescription;

use crate::config::Config;

/// Resolve the workspace selected by `config`
///
/// # Errors
/// Returns an error if:
/// - No workspace matches the id prefix or the current directory
/// - Multiple workspaces match the prefix (ambiguous)
/// - API call fails
pub async fn resolve_workspace(client: &RpcClient, config: &Config) -> Result<WorkspaceClient> {
    let workspaces = client
        .kernel()
        .describe_workspaces()
        .await
        .context("Failed to fetch workspaces for resolution")?;

    let id = match &config.workspace {
        Some(prefix) => match_prefix(&workspaces, prefix)?,
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            match_root(&workspaces, &cwd)?
        }
    };

    Ok(client.workspace(id))
}

fn match_prefix(workspaces: &[WorkspaceDescription], prefix: &str) -> Result<String> {
    if let Some(exact) = workspaces.iter().find(|w| w.id == prefix) {
        return Ok(exact.id.clone());
    }

    let matches: Vec<_> = workspaces
        .iter()
        .filter(|w| w.id.starts_with(prefix))
        .collect();

    match matches.len() {
        0 => Err(anyhow!("No workspace found with ID starting with '{}'", prefix)),
        1 => Ok(matches[0].id.clone()),
        _ => {
            let ids: Vec<&str> = matches.iter().map(|w| w.id.as_str()).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple workspaces: {}",
                prefix,
                ids.join(", ")
            ))
        }
    }
}

fn match_root(workspaces: &[WorkspaceDescription], dir: &Path) -> Result<String> {
    let dir = normalize(dir);
    workspaces
        .iter()
        .find(|w| normalize(Path::new(&w.root)) == dir)
        .map(|w| w.id.clone())
        .ok_or_else(|| {
            anyhow!(
                "No workspace rooted at {}; create one with `exo workspace create .` or pass --workspace",
                dir.display()
            )
        })
}

fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
