//! Log domain types

use serde::{Deserialize, Serialize};

/// A single event read from a process log
///
/// Events are ordered by arrival; the client only ever concatenates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub id: String,
    /// Name of the log this event was written to (e.g. `web:out`)
    pub log: String,
    /// Time the event was written, as sent by the service
    ///
    /// Kept verbatim: a page is never rejected over its timestamp format.
    pub timestamp: String,
    pub message: String,
}

/// Summary of a log known to a workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogDescription {
    pub name: String,
    pub last_event_at: Option<String>,
}
