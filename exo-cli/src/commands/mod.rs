//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod kernel;
mod logs;
mod process;
mod workspace;

pub use process::ProcessCommands;
pub use workspace::WorkspaceCommands;

use anyhow::Result;
use clap::Subcommand;
use exo_client::RpcClient;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the version of the service
    Version,
    /// Upgrade the service to the latest version
    Upgrade,
    /// Workspace management
    Workspace {
        #[command(subcommand)]
        command: WorkspaceCommands,
    },
    /// Process management
    Process {
        #[command(subcommand)]
        command: ProcessCommands,
    },
    /// Print process logs
    ///
    /// If log names are given, only events from those logs are shown.
    Logs {
        /// Log names (e.g. `web:out`)
        logs: Vec<String>,

        /// Keep polling for new events until interrupted
        #[arg(short, long)]
        follow: bool,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let client = RpcClient::from_config(&config.client_config())?;

    match command {
        Commands::Version => kernel::print_version(&client).await,
        Commands::Upgrade => kernel::upgrade(&client).await,
        Commands::Workspace { command } => {
            workspace::handle_workspace_command(command, &client, config).await
        }
        Commands::Process { command } => {
            process::handle_process_command(command, &client, config).await
        }
        Commands::Logs { logs, follow } => logs::tail_logs(&client, config, logs, follow).await,
    }
}
