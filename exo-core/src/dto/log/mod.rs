//! Log DTOs

use serde::{Deserialize, Serialize};

use crate::domain::log::{LogDescription, LogEvent};

/// Pagination mode of a `get-events` request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    /// Events strictly after `cursor`, or from the beginning when it is null
    #[default]
    AfterCursor,
}

/// Pagination descriptor for `get-events`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(rename = "type")]
    pub kind: PageKind,
    /// Server-issued cursor; `None` reads from the start of the logs
    pub cursor: Option<String>,
    /// Page size hint before the cursor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<u32>,
    /// Page size hint after the cursor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<u32>,
}

impl Pagination {
    /// Pagination reading every event after `cursor`
    pub fn after_cursor(cursor: Option<String>) -> Self {
        Self {
            kind: PageKind::AfterCursor,
            cursor,
            prev: None,
            next: None,
        }
    }
}

/// Request body of `get-events`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetEvents {
    pub logs: Vec<String>,
    #[serde(flatten)]
    pub pagination: Option<Pagination>,
}

/// One page of events
///
/// `cursor` must be passed back to fetch the events that follow this page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetEventsResponse {
    pub events: Vec<LogEvent>,
    pub cursor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeLogs {
    pub refs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeLogsResponse {
    pub logs: Vec<LogDescription>,
}
