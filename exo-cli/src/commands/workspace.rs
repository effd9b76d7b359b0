//! Workspace command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use exo_client::RpcClient;
use exo_core::domain::workspace::WorkspaceDescription;

use crate::config::Config;
use crate::workspace_resolver::resolve_workspace;

/// Workspace subcommands
#[derive(Subcommand)]
pub enum WorkspaceCommands {
    /// List all workspaces
    #[command(alias = "ls")]
    List,
    /// Register a workspace rooted at a directory
    Create {
        /// Root directory of the workspace
        root: String,
    },
    /// Describe the selected workspace
    Describe,
}

/// Handle workspace commands
pub async fn handle_workspace_command(
    command: WorkspaceCommands,
    client: &RpcClient,
    config: &Config,
) -> Result<()> {
    match command {
        WorkspaceCommands::List => list_workspaces(client).await,
        WorkspaceCommands::Create { root } => create_workspace(client, &root).await,
        WorkspaceCommands::Describe => {
            let workspace = resolve_workspace(client, config).await?;
            let description = workspace.describe().await?;
            print_workspace(&description);
            Ok(())
        }
    }
}

async fn list_workspaces(client: &RpcClient) -> Result<()> {
    let workspaces = client.kernel().describe_workspaces().await?;

    if workspaces.is_empty() {
        println!("{}", "No workspaces found.".yellow());
    } else {
        println!(
            "{}",
            format!("Found {} workspace(s):", workspaces.len()).bold()
        );
        println!();
        for workspace in &workspaces {
            print_workspace(workspace);
        }
    }

    Ok(())
}

async fn create_workspace(client: &RpcClient, root: &str) -> Result<()> {
    // The service resolves paths on its side; send an absolute one.
    let root = std::path::Path::new(root)
        .canonicalize()
        .with_context(|| format!("Failed to resolve workspace root '{}'", root))?;

    let id = client
        .kernel()
        .create_workspace(root.display().to_string())
        .await?;

    println!("{} Created workspace {}", "✓".green(), id.cyan());
    Ok(())
}

fn print_workspace(workspace: &WorkspaceDescription) {
    println!("  {} Workspace {}", "▸".cyan(), workspace.id.bold());
    println!("    Root: {}", workspace.root.dimmed());
    println!();
}
