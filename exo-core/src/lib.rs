//! Exo Core
//!
//! Wire types shared by every consumer of the exo workspace service.
//!
//! This crate contains:
//! - Domain types: the entities the service describes (workspaces, processes, log events)
//! - DTOs: request and response envelopes of each RPC method

pub mod domain;
pub mod dto;
