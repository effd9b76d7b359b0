//! Exo CLI
//!
//! Command-line interface for the exo workspace service.

mod commands;
mod config;
mod workspace_resolver;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "exo")]
#[command(about = "Exo workspace and process manager CLI", long_about = None)]
struct Cli {
    /// Workspace service URL
    #[arg(long, env = "EXO_URL", default_value = exo_client::DEFAULT_BASE_URL)]
    url: String,

    /// Workspace ID or unambiguous prefix (defaults to the workspace rooted at the current directory)
    #[arg(long, short, env = "EXO_WORKSPACE")]
    workspace: Option<String>,

    /// Maximum number of log events kept in memory
    #[arg(long, env = "EXO_LOG_BUFFER_SIZE", default_value_t = exo_client::DEFAULT_LOG_BUFFER_SIZE)]
    log_buffer_size: usize,

    /// Milliseconds between log fetches when following
    #[arg(long, default_value_t = 250)]
    poll_interval_ms: u64,

    /// Request timeout in seconds
    #[arg(long, env = "EXO_TIMEOUT")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exo=info,exo_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        url: cli.url,
        workspace: cli.workspace,
        log_buffer_size: cli.log_buffer_size,
        poll_interval: Duration::from_millis(cli.poll_interval_ms),
        timeout: cli.timeout_secs.map(Duration::from_secs),
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
