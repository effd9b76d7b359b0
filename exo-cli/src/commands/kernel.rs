//! Kernel command handlers

use anyhow::Result;
use colored::*;
use exo_client::RpcClient;

/// Print installed and latest service versions
pub async fn print_version(client: &RpcClient) -> Result<()> {
    let version = client.kernel().get_version().await?;

    println!("{}", version.installed);
    match version.latest {
        Some(latest) if !version.current => {
            println!(
                "{}",
                format!("A newer version is available: {} (run `exo upgrade`)", latest).yellow()
            );
        }
        _ => {}
    }

    Ok(())
}

/// Ask the service to upgrade itself
pub async fn upgrade(client: &RpcClient) -> Result<()> {
    client.kernel().upgrade().await?;
    println!("{}", "✓ Upgrade requested".green());
    Ok(())
}
