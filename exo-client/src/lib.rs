//! Exo HTTP Client
//!
//! A typed client for the exo workspace service, plus the state containers a
//! UI needs to drive views from it.
//!
//! - [`RpcClient`]: the JSON-RPC transport (`POST <base>/<group>/<method>`)
//! - [`KernelClient`] / [`WorkspaceClient`]: the typed operation catalogue
//! - [`RemoteData`]: the lifecycle of a value that arrives asynchronously
//! - [`LogsStore`]: an observable, bounded buffer of log events fetched
//!   incrementally by cursor
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use exo_client::{LogsStore, RpcClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = RpcClient::new("http://localhost:4000/_exo");
//!     let workspace = client.workspace("ws_123");
//!
//!     let store = LogsStore::new(Arc::new(workspace));
//!     store.set_log_visibility("web:out", true).await?;
//!
//!     if let Some(events) = store.snapshot().events.data() {
//!         for event in events {
//!             println!("{} {}", event.log, event.message);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
mod kernel;
pub mod logs;
pub mod remote_data;
mod rpc;
mod workspace;

// Re-export commonly used types
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ClientError, Result, response_to_error};
pub use kernel::KernelClient;
pub use logs::{DEFAULT_LOG_BUFFER_SIZE, EventSource, LogsSnapshot, LogsStore};
pub use remote_data::RemoteData;
pub use rpc::{RpcClient, build_url};
pub use workspace::WorkspaceClient;
