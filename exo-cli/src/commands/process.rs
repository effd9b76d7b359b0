//! Process command handlers
//!
//! Handles listing, creating and controlling the processes of a workspace.

use std::collections::HashMap;

use anyhow::{Result, anyhow};
use clap::Subcommand;
use colored::*;
use exo_client::{RpcClient, WorkspaceClient};
use exo_core::domain::process::{ProcessDescription, ProcessSpec};

use crate::config::Config;
use crate::workspace_resolver::resolve_workspace;

/// Process subcommands
#[derive(Subcommand)]
pub enum ProcessCommands {
    /// List processes in the workspace
    #[command(alias = "ps")]
    List,
    /// Create a process
    Create {
        /// Process name
        name: String,
        /// Working directory, relative to the workspace root
        #[arg(long)]
        directory: Option<String>,
        /// Environment variable as KEY=VALUE (repeatable)
        #[arg(long = "env", short = 'e')]
        environment: Vec<String>,
        /// Program followed by its arguments
        #[arg(required = true, last = true)]
        command: Vec<String>,
    },
    /// Start a process
    Start { reference: String },
    /// Stop a process
    Stop { reference: String },
    /// Restart a process
    Restart { reference: String },
    /// Delete a process
    #[command(alias = "rm")]
    Delete { reference: String },
    /// Re-read the state of every process
    Refresh,
}

/// Handle process commands
pub async fn handle_process_command(
    command: ProcessCommands,
    client: &RpcClient,
    config: &Config,
) -> Result<()> {
    let workspace = resolve_workspace(client, config).await?;

    match command {
        ProcessCommands::List => list_processes(&workspace).await,
        ProcessCommands::Create {
            name,
            directory,
            environment,
            command,
        } => {
            let spec = build_spec(directory, &environment, command)?;
            let id = workspace.create_process(&name, &spec).await?;
            println!("{} Created process {} ({})", "✓".green(), name.bold(), id.dimmed());
            Ok(())
        }
        ProcessCommands::Start { reference } => {
            workspace.start_process(&reference).await?;
            println!("{} Started {}", "✓".green(), reference.bold());
            Ok(())
        }
        ProcessCommands::Stop { reference } => {
            workspace.stop_process(&reference).await?;
            println!("{} Stopped {}", "✓".green(), reference.bold());
            Ok(())
        }
        ProcessCommands::Restart { reference } => {
            workspace.restart_process(&reference).await?;
            println!("{} Restarted {}", "✓".green(), reference.bold());
            Ok(())
        }
        ProcessCommands::Delete { reference } => {
            workspace.delete_component(&reference).await?;
            println!("{} Deleted {}", "✓".green(), reference.bold());
            Ok(())
        }
        ProcessCommands::Refresh => {
            workspace.refresh_all_processes().await?;
            println!("{} Refreshed all processes", "✓".green());
            Ok(())
        }
    }
}

async fn list_processes(workspace: &WorkspaceClient) -> Result<()> {
    let processes = workspace.describe_processes().await?;

    if processes.is_empty() {
        println!("{}", "No processes found.".yellow());
    } else {
        for process in &processes {
            print_process(process);
        }
    }

    Ok(())
}

fn print_process(process: &ProcessDescription) {
    let status = if process.running {
        "running".green()
    } else {
        "stopped".dimmed()
    };
    println!("  {:<24} {:<10} {}", process.name.bold(), status, process.id.dimmed());
}

/// Build a process spec from command-line parts
fn build_spec(
    directory: Option<String>,
    environment: &[String],
    command: Vec<String>,
) -> Result<ProcessSpec> {
    let mut command = command.into_iter();
    let program = command
        .next()
        .ok_or_else(|| anyhow!("A program to run is required"))?;

    let environment = if environment.is_empty() {
        None
    } else {
        let mut vars = HashMap::new();
        for pair in environment {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                anyhow!("Invalid environment variable '{}': expected KEY=VALUE", pair)
            })?;
            vars.insert(key.to_string(), value.to_string());
        }
        Some(vars)
    };

    Ok(ProcessSpec {
        directory,
        program,
        arguments: command.collect(),
        environment,
    })
}
