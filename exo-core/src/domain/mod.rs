//! Core domain types
//!
//! These types mirror the records the workspace service returns. They carry
//! structure only; every behavior lives in the client crate.

pub mod kernel;
pub mod log;
pub mod process;
pub mod workspace;
