//! Lifecycle of a value fetched from the service
//!
//! [`RemoteData`] replaces the usual `loading`/`error`/`data` flag soup with
//! a single tag. Serialized, it has the shape `{"stage": "...", ...}` so a
//! snapshot can be handed to a UI as-is.

use serde::{Deserialize, Serialize};

/// A value that arrives asynchronously
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "lowercase")]
pub enum RemoteData<T> {
    /// No request has been issued yet
    #[default]
    Idle,
    /// A request is in flight and there is no previous value
    Pending,
    /// The most recent request failed
    Error { message: String },
    /// The most recent request completed; `data` is authoritative
    Success { data: T },
    /// A request is in flight while the previous `data` is still shown
    Refetching { data: T },
}

impl<T> RemoteData<T> {
    pub fn not_requested() -> Self {
        Self::Idle
    }

    pub fn pending_request() -> Self {
        Self::Pending
    }

    pub fn error_response(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn success_response(data: T) -> Self {
        Self::Success { data }
    }

    pub fn refetching_response(prev: T) -> Self {
        Self::Refetching { data: prev }
    }

    /// Name of the active tag, as serialized
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Error { .. } => "error",
            Self::Success { .. } => "success",
            Self::Refetching { .. } => "refetching",
        }
    }

    /// `true` for `Success` and `Refetching`
    pub fn has_data(&self) -> bool {
        match self {
            Self::Success { .. } | Self::Refetching { .. } => true,
            Self::Idle | Self::Pending | Self::Error { .. } => false,
        }
    }

    /// `true` while a result is still expected: `Idle`, `Pending` and `Refetching`
    ///
    /// `Refetching` is both unresolved and has data.
    pub fn is_unresolved(&self) -> bool {
        match self {
            Self::Idle | Self::Pending | Self::Refetching { .. } => true,
            Self::Error { .. } | Self::Success { .. } => false,
        }
    }

    /// `true` for `Error` and `Success`
    pub fn is_resolved(&self) -> bool {
        !self.is_unresolved()
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } | Self::Refetching { data } => Some(data),
            Self::Idle | Self::Pending | Self::Error { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success { data } | Self::Refetching { data } => Some(data),
            Self::Idle | Self::Pending | Self::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message),
            _ => None,
        }
    }
}
