//! Data Transfer Objects for the RPC surface
//!
//! Request bodies and response envelopes for the kernel and workspace
//! methods. Most responses wrap a single field (`{"workspaces": [...]}`);
//! the client unwraps them before handing results to callers.

pub mod kernel;
pub mod log;
pub mod process;
pub mod workspace;
